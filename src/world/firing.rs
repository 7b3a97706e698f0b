//! Fire resolution and the player's input surface.
//!
//! A shot runs in three traces' worth of steps: the crosshair ray from the
//! camera (perturbed by spread), the muzzle ray toward wherever that landed,
//! then bullet-hit routing for whatever the muzzle ray struck. Bows skip the
//! muzzle trace and launch a projectile instead.

use bevy::math::{Vec2, Vec3};
use tracing::trace;

use crate::actors::ActorId;
use crate::capabilities::{HitResult, ParticleKind, Presentation, RayTracer};
use crate::constants::*;
use crate::damage::ShotProfile;
use crate::player::{FireStart, ShotPlan};
use crate::timers::TimerPurpose;
use crate::weapon::spread::random_point_in_circle;
use crate::weapon::{AmmoType, FireMode};

use super::{Actor, CombatWorld, Projectile};

impl<P: Presentation> CombatWorld<P> {
    // =========================================================================
    // Trigger
    // =========================================================================

    pub fn press_fire(&mut self, player: ActorId, tracer: &dyn RayTracer) -> bool {
        let held = self.with_player(player, |p, _| {
            if p.input_enabled() {
                p.fire_held = true;
            }
            p.fire_held
        });
        held == Some(true) && self.fire(player, tracer)
    }

    pub fn release_fire(&mut self, player: ActorId) {
        self.with_player(player, |p, _| p.fire_held = false);
    }

    /// Fire one round. Returns true if a shot actually left the weapon.
    pub fn fire(&mut self, player: ActorId, tracer: &dyn RayTracer) -> bool {
        let Some(FireStart::Shot(plan)) = self.with_player(player, |p, ctx| p.begin_fire(player, ctx))
        else {
            return false;
        };
        let direction = self.spread_direction(&plan);
        let blocks = |id: ActorId, actor: &Actor| id != player && actor.collision_enabled();
        let beam_end =
            match self.trace_filtered(tracer, plan.eye, direction, CROSSHAIR_TRACE_DISTANCE, blocks) {
                Some(hit) => hit.location,
                None => plan.eye + direction * CROSSHAIR_TRACE_DISTANCE,
            };
        self.presentation
            .spawn_particles_at(plan.muzzle, ParticleKind::Muzzle);

        let to_target = beam_end - plan.muzzle;
        match plan.mode {
            FireMode::HitScan => {
                let reach = to_target.length() * MUZZLE_TRACE_EXTENSION;
                match self.trace_filtered(tracer, plan.muzzle, to_target, reach, blocks) {
                    Some(hit) => self.route_bullet_hit(&hit, plan.profile, Some(player)),
                    None => trace!(?player, "shot hit nothing"),
                }
            }
            FireMode::Projectile => {
                self.spawn_projectile(player, plan.profile, plan.muzzle, to_target, tracer);
            }
        }
        true
    }

    /// First hit along the ray whose actor `blocks` accepts. Hits on anything
    /// else are stepped past and the trace resumes with the remaining length.
    /// Hits on static geometry or unknown actors always block.
    fn trace_filtered(
        &self,
        tracer: &dyn RayTracer,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        blocks: impl Fn(ActorId, &Actor) -> bool,
    ) -> Option<HitResult> {
        let direction = direction.normalize_or_zero();
        let mut from = origin;
        let mut remaining = max_distance;
        for _ in 0..MAX_TRACE_PASSES {
            let hit = tracer.trace_ray(from, direction, remaining)?;
            let passable = hit
                .actor
                .and_then(|id| self.actors.get(id).map(|actor| !blocks(id, actor)))
                .unwrap_or(false);
            if !passable {
                return Some(hit);
            }
            let step = (hit.location - from).dot(direction).max(0.0) + TRACE_SKIP_DISTANCE;
            remaining -= step;
            if remaining <= 0.0 {
                return None;
            }
            from += direction * step;
        }
        None
    }

    /// Crosshair ray direction with a random offset at the trace distance.
    fn spread_direction(&mut self, plan: &ShotPlan) -> Vec3 {
        if plan.direction == Vec3::ZERO {
            return Vec3::ZERO;
        }
        let offset: Vec2 = random_point_in_circle(plan.spread_radius, &mut self.rng);
        let (right, up) = plan.direction.any_orthonormal_pair();
        let end = plan.direction * CROSSHAIR_TRACE_DISTANCE + right * offset.x + up * offset.y;
        end.normalize_or_zero()
    }

    // =========================================================================
    // Projectiles
    // =========================================================================

    /// Launch an arrow. Anything overlapping it at the muzzle is struck at once,
    /// in which case the returned handle is already stale.
    pub fn spawn_projectile(
        &mut self,
        owner: ActorId,
        profile: ShotProfile,
        position: Vec3,
        direction: Vec3,
        tracer: &dyn RayTracer,
    ) -> ActorId {
        let projectile = Projectile::new(owner, profile, position, direction);
        let id = self.insert(Actor::Projectile(projectile));
        self.timers
            .schedule(id, TimerPurpose::Expire, PROJECTILE_LIFESPAN);
        self.sweep_projectile(id, PROJECTILE_SPAWN_SWEEP, tracer, false);
        id
    }

    /// Sweep every projectile along this tick's segment and resolve the first hit.
    pub(super) fn advance_projectiles(&mut self, dt: f32, tracer: &dyn RayTracer) {
        let in_flight: Vec<(ActorId, f32)> = self
            .actors
            .iter()
            .filter_map(|(id, actor)| match actor {
                Actor::Projectile(p) => Some((id, p.sweep(dt).1)),
                _ => None,
            })
            .collect();

        for (id, length) in in_flight {
            self.sweep_projectile(id, length, tracer, true);
        }
    }

    /// Trace `length` ahead of a projectile, skipping its owner, other projectiles
    /// and dead characters. A hit is resolved and consumes the projectile; a miss
    /// moves it forward when `advance` is set. Returns true on a hit.
    fn sweep_projectile(
        &mut self,
        id: ActorId,
        length: f32,
        tracer: &dyn RayTracer,
        advance: bool,
    ) -> bool {
        let projectile = match self.actors.get(id) {
            Some(Actor::Projectile(p)) => *p,
            _ => return false,
        };
        let direction = projectile.velocity.normalize_or_zero();
        let owner = projectile.owner;
        let hit = self.trace_filtered(tracer, projectile.position, direction, length, |other, actor| {
            other != owner && actor.collision_enabled() && !matches!(actor, Actor::Projectile(_))
        });
        match hit {
            Some(hit) => {
                self.route_bullet_hit(&hit, projectile.profile, Some(owner));
                self.despawn(id);
                true
            }
            None => {
                if advance {
                    if let Some(Actor::Projectile(p)) = self.actors.get_mut(id) {
                        p.position += direction * length;
                    }
                }
                false
            }
        }
    }

    // =========================================================================
    // Player input
    // =========================================================================

    pub fn reload(&mut self, player: ActorId) -> bool {
        self.with_player(player, |p, ctx| p.start_reload(player, ctx))
            .unwrap_or(false)
    }

    /// Reload montage finished early; chains into the next shot if the trigger is held.
    pub fn finish_reload(&mut self, player: ActorId, tracer: &dyn RayTracer) {
        if self.with_player(player, |p, ctx| p.finish_reload(player, ctx)) == Some(true) {
            self.fire(player, tracer);
        }
    }

    pub fn dodge(&mut self, player: ActorId) -> bool {
        self.with_player(player, |p, ctx| p.dodge(player, ctx))
            .unwrap_or(false)
    }

    pub fn finish_dodge(&mut self, player: ActorId) {
        self.with_player(player, |p, ctx| p.finish_dodge(player, ctx));
    }

    pub fn toggle_sprint(&mut self, player: ActorId) -> bool {
        self.with_player(player, |p, ctx| p.toggle_sprint(player, ctx))
            .unwrap_or(false)
    }

    pub fn set_move_input(&mut self, player: ActorId, input: Vec2) {
        self.with_player(player, |p, ctx| p.set_move_input(player, input, ctx));
    }

    pub fn set_aiming(&mut self, player: ActorId, aiming: bool) {
        self.with_player(player, |p, _| p.set_aiming(aiming));
    }

    pub fn set_falling(&mut self, player: ActorId, falling: bool) {
        self.with_player(player, |p, _| p.falling = falling);
    }

    pub fn set_aim_direction(&mut self, player: ActorId, direction: Vec3) {
        self.with_player(player, |p, _| p.aim_direction = direction);
    }

    pub fn switch_to_slot(&mut self, player: ActorId, slot: usize) -> bool {
        self.with_player(player, |p, ctx| p.switch_to_slot(player, slot, ctx))
            .unwrap_or(false)
    }

    pub fn next_weapon(&mut self, player: ActorId) -> bool {
        self.with_player(player, |p, ctx| p.next_weapon(player, ctx))
            .unwrap_or(false)
    }

    /// Equip montage grab notify.
    pub fn grab_weapon(&mut self, player: ActorId) -> Option<(usize, usize)> {
        self.with_player(player, |p, ctx| p.grab_weapon(player, ctx))
            .flatten()
    }

    pub fn finish_equipping(&mut self, player: ActorId) {
        self.with_player(player, |p, ctx| p.finish_equipping(player, ctx));
    }

    pub fn pickup_ammo(&mut self, player: ActorId, ammo_type: AmmoType, amount: u32) {
        self.with_player(player, |p, ctx| p.pickup_ammo(player, ammo_type, amount, ctx));
    }
}
