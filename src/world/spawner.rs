//! Enemy spawner triggers.

use bevy::math::Vec3;
use tracing::info;

use crate::actors::ActorId;
use crate::capabilities::Presentation;
use crate::timers::TimerPurpose;
use crate::weapon::spread::random_point_in_circle;

use super::{Actor, CombatWorld};

impl<P: Presentation> CombatWorld<P> {
    /// A player walked into the spawner volume. Only the first overlap counts.
    pub fn player_enter_spawner(&mut self, spawner: ActorId, player: ActorId) -> bool {
        if self.player(player).is_none() {
            return false;
        }
        let triggered = match self.actors.get_mut(spawner) {
            Some(Actor::Spawner(s)) => s.trigger(player),
            _ => false,
        };
        if !triggered {
            return false;
        }
        info!(?spawner, ?player, "spawner triggered");
        self.spawn_wave(spawner);
        true
    }

    /// Release one enemy at a random point inside the spawner radius and
    /// schedule the next one while the count is not reached.
    pub(super) fn spawn_wave(&mut self, spawner: ActorId) -> Option<ActorId> {
        let settings = match self.actors.get(spawner) {
            Some(Actor::Spawner(s)) if !s.is_active() && s.wants_more() => s.clone(),
            _ => return None,
        };
        let offset = random_point_in_circle(settings.radius, &mut self.rng);
        let position = settings.centre() + Vec3::new(offset.x, offset.y, 0.0);
        let enemy = self.spawn_enemy(position);
        if settings.aggressive {
            if let Some(target) = settings.target() {
                self.with_enemy(enemy, |e, _| e.enter_agro_sphere(target));
            }
        }
        if let Some(Actor::Spawner(s)) = self.actors.get_mut(spawner) {
            s.record_spawn();
            if s.wants_more() {
                self.timers
                    .schedule(spawner, TimerPurpose::SpawnWave, s.interval);
            }
        }
        Some(enemy)
    }
}
