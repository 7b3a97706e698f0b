//! The combat world: actor registry, timer dispatch and cross-actor routing.
//!
//! Actors never hold references to each other. Every interaction goes
//! through a `CombatWorld` method addressed by `ActorId`, and a single hit
//! is fully resolved (weak spot, health, balance, stagger) before the call
//! returns. `tick` runs per-actor updates, moves projectiles, then drains
//! elapsed timers one at a time.

pub mod damage;
pub mod firing;
pub mod objects;
pub mod spawner;

use bevy::math::Vec3;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, trace};

use crate::actors::{ActorArena, ActorId};
use crate::capabilities::{Presentation, RayTracer, RecordingPresentation};
use crate::config::CombatConfig;
use crate::constants::WEAPON_DROP_FALL_TIME;
use crate::context::CombatContext;
use crate::damage::{BulletHitKind, Damageable};
use crate::error::CombatResult;
use crate::enemy::Enemy;
use crate::events::{CombatEvent, SpawnKind};
use crate::health::HealthPool;
use crate::player::PlayerCharacter;
use crate::rarity::ItemRarity;
use crate::timers::{TimerKey, TimerPurpose, TimerQueue};
use crate::weapon::{Weapon, WeaponKind};

pub use objects::{DroppedWeapon, Explosive, Projectile, Spawner};

/// One registry slot. Characters are boxed to keep the enum small.
#[derive(Debug, Clone)]
pub enum Actor {
    Player(Box<PlayerCharacter>),
    Enemy(Box<Enemy>),
    DroppedWeapon(DroppedWeapon),
    Explosive(Explosive),
    Projectile(Projectile),
    Spawner(Spawner),
}

impl Actor {
    pub fn bullet_hit_kind(&self) -> BulletHitKind {
        match self {
            Actor::Enemy(_) => BulletHitKind::Enemy,
            Actor::Explosive(_) => BulletHitKind::Explosive,
            _ => BulletHitKind::Generic,
        }
    }

    pub fn spawn_kind(&self) -> SpawnKind {
        match self {
            Actor::Player(_) => SpawnKind::Player,
            Actor::Enemy(_) => SpawnKind::Enemy,
            Actor::DroppedWeapon(_) => SpawnKind::DroppedWeapon,
            Actor::Explosive(_) => SpawnKind::Explosive,
            Actor::Projectile(_) => SpawnKind::Projectile,
            Actor::Spawner(_) => SpawnKind::Spawner,
        }
    }

    pub fn position(&self) -> Vec3 {
        match self {
            Actor::Player(p) => p.position,
            Actor::Enemy(e) => e.position,
            Actor::DroppedWeapon(d) => d.position,
            Actor::Explosive(e) => e.position,
            Actor::Projectile(p) => p.position,
            Actor::Spawner(s) => s.centre(),
        }
    }

    /// Dead characters stop blocking traces.
    pub fn collision_enabled(&self) -> bool {
        match self {
            Actor::Player(p) => p.collision_enabled(),
            Actor::Enemy(e) => e.collision_enabled(),
            _ => true,
        }
    }

    pub fn health(&self) -> Option<&HealthPool> {
        match self {
            Actor::Player(p) => Some(&p.health),
            Actor::Enemy(e) => Some(&e.health),
            _ => None,
        }
    }

    pub fn as_damageable_mut(&mut self) -> Option<&mut dyn Damageable> {
        match self {
            Actor::Player(p) => Some(&mut **p as &mut dyn Damageable),
            Actor::Enemy(e) => Some(&mut **e as &mut dyn Damageable),
            _ => None,
        }
    }
}

pub struct CombatWorld<P: Presentation = RecordingPresentation> {
    actors: ActorArena<Actor>,
    timers: TimerQueue,
    rng: Xoshiro256PlusPlus,
    events: Vec<CombatEvent>,
    presentation: P,
    config: CombatConfig,
}

impl CombatWorld {
    pub fn new(config: CombatConfig) -> Self {
        Self::with_presentation(config, RecordingPresentation::default())
    }
}

impl Default for CombatWorld {
    fn default() -> Self {
        Self::new(CombatConfig::default())
    }
}

impl<P: Presentation> CombatWorld<P> {
    pub fn with_presentation(config: CombatConfig, presentation: P) -> Self {
        Self {
            actors: ActorArena::new(),
            timers: TimerQueue::new(),
            rng: Xoshiro256PlusPlus::seed_from_u64(config.seed),
            events: Vec::new(),
            presentation,
            config,
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Replace the tuning. Applies to actors spawned afterwards.
    pub fn set_config(&mut self, config: CombatConfig) {
        self.config = config;
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn actors(&self) -> &ActorArena<Actor> {
        &self.actors
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Split the registry from the services actors run against.
    fn parts(&mut self) -> (&mut ActorArena<Actor>, CombatContext<'_>) {
        (
            &mut self.actors,
            CombatContext {
                timers: &mut self.timers,
                rng: &mut self.rng,
                events: &mut self.events,
                presentation: &mut self.presentation,
                config: &self.config,
            },
        )
    }

    pub(crate) fn with_player<R>(
        &mut self,
        id: ActorId,
        f: impl FnOnce(&mut PlayerCharacter, &mut CombatContext<'_>) -> R,
    ) -> Option<R> {
        let (actors, mut ctx) = self.parts();
        match actors.get_mut(id) {
            Some(Actor::Player(player)) => Some(f(&mut **player, &mut ctx)),
            _ => None,
        }
    }

    pub(crate) fn with_enemy<R>(
        &mut self,
        id: ActorId,
        f: impl FnOnce(&mut Enemy, &mut CombatContext<'_>) -> R,
    ) -> Option<R> {
        let (actors, mut ctx) = self.parts();
        match actors.get_mut(id) {
            Some(Actor::Enemy(enemy)) => Some(f(&mut **enemy, &mut ctx)),
            _ => None,
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn try_actor(&self, id: ActorId) -> CombatResult<&Actor> {
        self.actors.try_get(id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains(id)
    }

    pub fn player(&self, id: ActorId) -> Option<&PlayerCharacter> {
        match self.actors.get(id) {
            Some(Actor::Player(p)) => Some(&**p),
            _ => None,
        }
    }

    pub fn player_mut(&mut self, id: ActorId) -> Option<&mut PlayerCharacter> {
        match self.actors.get_mut(id) {
            Some(Actor::Player(p)) => Some(&mut **p),
            _ => None,
        }
    }

    pub fn enemy(&self, id: ActorId) -> Option<&Enemy> {
        match self.actors.get(id) {
            Some(Actor::Enemy(e)) => Some(&**e),
            _ => None,
        }
    }

    pub fn enemy_mut(&mut self, id: ActorId) -> Option<&mut Enemy> {
        match self.actors.get_mut(id) {
            Some(Actor::Enemy(e)) => Some(&mut **e),
            _ => None,
        }
    }

    pub fn dropped_weapon(&self, id: ActorId) -> Option<&DroppedWeapon> {
        match self.actors.get(id) {
            Some(Actor::DroppedWeapon(d)) => Some(d),
            _ => None,
        }
    }

    pub fn spawner(&self, id: ActorId) -> Option<&Spawner> {
        match self.actors.get(id) {
            Some(Actor::Spawner(s)) => Some(s),
            _ => None,
        }
    }

    pub fn enemy_ids(&self) -> Vec<ActorId> {
        self.actors
            .iter()
            .filter(|(_, a)| matches!(a, Actor::Enemy(_)))
            .map(|(id, _)| id)
            .collect()
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    fn insert(&mut self, actor: Actor) -> ActorId {
        let kind = actor.spawn_kind();
        let location = actor.position();
        let id = self.actors.insert(actor);
        debug!(?id, ?kind, "spawned");
        self.events.push(CombatEvent::Spawned {
            actor: id,
            kind,
            location,
        });
        id
    }

    pub fn spawn_player(&mut self, position: Vec3) -> ActorId {
        let player = PlayerCharacter::new(&self.config.player, position);
        self.insert(Actor::Player(Box::new(player)))
    }

    pub fn spawn_enemy(&mut self, position: Vec3) -> ActorId {
        let enemy = Enemy::new(&self.config.enemy, self.config.balance_reset, position);
        self.insert(Actor::Enemy(Box::new(enemy)))
    }

    pub fn spawn_explosive(&mut self, position: Vec3) -> ActorId {
        let explosive = Explosive::new(&self.config.explosive, position);
        self.insert(Actor::Explosive(explosive))
    }

    pub fn spawn_spawner(&mut self, position: Vec3) -> ActorId {
        let spawner = Spawner::new(&self.config.spawner, position);
        self.insert(Actor::Spawner(spawner))
    }

    /// Place a weapon of `kind` in the world, ready to be picked up.
    pub fn spawn_weapon_pickup(
        &mut self,
        kind: WeaponKind,
        rarity: ItemRarity,
        position: Vec3,
    ) -> Option<ActorId> {
        let weapon = self.config.build_weapon(kind, rarity)?;
        Some(self.insert(Actor::DroppedWeapon(DroppedWeapon::placed(weapon, position))))
    }

    /// Remove an actor and everything it has scheduled.
    pub fn despawn(&mut self, id: ActorId) -> bool {
        self.remove_actor(id).is_some()
    }

    fn remove_actor(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.actors.remove(id)?;
        self.timers.cancel_actor(id);
        self.events.push(CombatEvent::Despawned { actor: id });
        debug!(?id, "despawned");
        Some(actor)
    }

    // =========================================================================
    // Weapons in the world
    // =========================================================================

    /// Build a weapon and hand it straight to `player`.
    pub fn give_weapon(&mut self, player: ActorId, kind: WeaponKind, rarity: ItemRarity) -> bool {
        let Some(weapon) = self.config.build_weapon(kind, rarity) else {
            return false;
        };
        self.take_weapon(player, weapon)
    }

    /// Pick up a dropped weapon. Falling weapons cannot be picked up yet.
    pub fn pickup_weapon(&mut self, player: ActorId, item: ActorId) -> bool {
        if !self.player(player).is_some_and(|p| !p.is_dead()) {
            return false;
        }
        if !self.dropped_weapon(item).is_some_and(DroppedWeapon::can_pick_up) {
            trace!(?item, "pickup rejected");
            return false;
        }
        match self.remove_actor(item) {
            Some(Actor::DroppedWeapon(drop)) => self.take_weapon(player, drop.weapon),
            _ => false,
        }
    }

    fn take_weapon(&mut self, player: ActorId, weapon: Weapon) -> bool {
        if !self.player(player).is_some_and(|p| !p.is_dead()) {
            return false;
        }
        let displaced = self
            .with_player(player, |p, ctx| p.pickup_weapon(player, weapon, ctx))
            .flatten();
        if let Some(old) = displaced {
            self.throw_weapon(player, old);
        }
        true
    }

    /// Throw a swapped-out weapon into the world. It lands after a short fall.
    fn throw_weapon(&mut self, owner: ActorId, weapon: Weapon) -> ActorId {
        let position = self.actors.get(owner).map(Actor::position).unwrap_or_default();
        let item = self.insert(Actor::DroppedWeapon(DroppedWeapon::falling(weapon, position)));
        self.timers
            .schedule(item, TimerPurpose::DropSettle, WEAPON_DROP_FALL_TIME);
        self.events.push(CombatEvent::WeaponDropped { owner, item });
        item
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Advance the world by `dt` seconds.
    pub fn tick(&mut self, dt: f32, tracer: &dyn RayTracer) {
        {
            let (actors, mut ctx) = self.parts();
            for (id, actor) in actors.iter_mut() {
                match actor {
                    Actor::Player(player) => player.tick(id, dt, &mut ctx),
                    Actor::Enemy(enemy) => enemy.tick(dt),
                    _ => {}
                }
            }
        }
        self.advance_projectiles(dt, tracer);
        self.timers.advance(dt);
        while let Some(key) = self.timers.pop_expired() {
            self.on_timer(key, tracer);
        }
    }

    fn on_timer(&mut self, key: TimerKey, tracer: &dyn RayTracer) {
        let id = key.actor;
        trace!(?id, purpose = ?key.purpose, "timer elapsed");
        match key.purpose {
            TimerPurpose::FireRate => {
                if self.with_player(id, |p, ctx| p.fire_timer_elapsed(id, ctx)) == Some(true) {
                    self.fire(id, tracer);
                }
            }
            TimerPurpose::Reload => {
                if self.with_player(id, |p, ctx| p.finish_reload(id, ctx)) == Some(true) {
                    self.fire(id, tracer);
                }
            }
            TimerPurpose::EquipGrab => {
                self.with_player(id, |p, ctx| p.grab_weapon(id, ctx));
            }
            TimerPurpose::EquipFinish => {
                self.with_player(id, |p, ctx| p.finish_equipping(id, ctx));
            }
            TimerPurpose::Dodge => {
                self.with_player(id, |p, ctx| p.finish_dodge(id, ctx));
            }
            TimerPurpose::DodgeCooldown => {
                self.with_player(id, |p, _| p.reset_dodge());
            }
            TimerPurpose::Invulnerability => {
                self.with_player(id, |p, _| p.end_invulnerability());
            }
            TimerPurpose::Stagger => self.end_stagger(id),
            TimerPurpose::AttackCooldown => {
                self.with_enemy(id, |e, _| e.reset_can_attack());
            }
            TimerPurpose::EnemyAction => {
                self.with_enemy(id, |e, ctx| e.finish_enemy_action(id, ctx));
            }
            TimerPurpose::DropSettle => {
                if let Some(Actor::DroppedWeapon(drop)) = self.actors.get_mut(id) {
                    drop.settle();
                }
            }
            TimerPurpose::SpawnWave => {
                self.spawn_wave(id);
            }
            TimerPurpose::Expire => {
                self.despawn(id);
            }
        }
    }

    /// Stagger montage finished, for a player or an enemy.
    pub fn end_stagger(&mut self, actor: ActorId) {
        let (actors, mut ctx) = self.parts();
        match actors.get_mut(actor) {
            Some(Actor::Player(p)) => p.end_stagger(actor, &mut ctx),
            Some(Actor::Enemy(e)) => e.end_stagger(actor, &mut ctx),
            _ => {}
        }
    }
}
