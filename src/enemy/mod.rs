//! Enemy state machine and the blackboard contract read by the external AI driver.
//!
//! The behaviour tree itself lives outside the core. It reads `Target`,
//! `InAttackRange`, `CanAttack`, `EnemyState`, `Dead` and `Staggered` from
//! the enemy's blackboard and calls back into `attack_player`,
//! `rush_attack_start` and `rush_attack_end`.

pub mod state;

use bevy::math::Vec3;
use rand::Rng;
use tracing::{debug, info, trace};

use crate::actors::ActorId;
use crate::balance::{BalanceMeter, BalanceOutcome, BalanceResetPolicy};
use crate::blackboard::{Blackboard, BlackboardKey};
use crate::capabilities::{AnimationCue, Montage};
use crate::config::EnemyTuning;
use crate::constants::*;
use crate::context::CombatContext;
use crate::damage::{DamageTaken, Damageable};
use crate::events::CombatEvent;
use crate::health::HealthPool;
use crate::timers::TimerPurpose;

pub use state::EnemyState;

pub const ATTACK_SECTIONS: [&str; 4] = ["AttackL", "AttackR", "AttackLFast", "AttackRFast"];
pub const RUSH_ATTACK_SECTION: &str = "RushAttack";

#[derive(Debug, Clone)]
pub struct Enemy {
    state: EnemyState,
    pub health: HealthPool,
    pub balance: BalanceMeter,
    pub blackboard: Blackboard,
    can_attack: bool,
    in_attack_range: bool,
    pub weakspot_bone: String,
    pub attack_damage: f32,
    pub position: Vec3,
    base_speed: f32,
    walk_speed: f32,
    collision_enabled: bool,
}

impl Enemy {
    pub fn new(tuning: &EnemyTuning, reset_policy: BalanceResetPolicy, position: Vec3) -> Self {
        let mut blackboard = Blackboard::default();
        blackboard.set_bool(BlackboardKey::CanAttack, true);
        blackboard.set_bool(BlackboardKey::InAttackRange, false);
        blackboard.set_enum(BlackboardKey::EnemyState, EnemyState::Unoccupied.as_byte());
        Self {
            state: EnemyState::Unoccupied,
            health: HealthPool::new(tuning.max_health),
            balance: BalanceMeter::new(tuning.max_balance, tuning.balance_recovery_rate, reset_policy),
            blackboard,
            can_attack: true,
            in_attack_range: false,
            weakspot_bone: tuning.weakspot_bone.clone(),
            attack_damage: tuning.attack_damage,
            position,
            base_speed: tuning.base_speed,
            walk_speed: tuning.base_speed,
            collision_enabled: true,
        }
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }

    pub fn can_attack(&self) -> bool {
        self.can_attack
    }

    pub fn in_attack_range(&self) -> bool {
        self.in_attack_range
    }

    pub fn target(&self) -> Option<ActorId> {
        self.blackboard.get_actor(BlackboardKey::Target)
    }

    pub fn walk_speed(&self) -> f32 {
        self.walk_speed
    }

    pub fn collision_enabled(&self) -> bool {
        self.collision_enabled
    }

    fn set_state(&mut self, next: EnemyState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "enemy state");
        }
        self.state = next;
        self.blackboard.set_enum(BlackboardKey::EnemyState, next.as_byte());
        self.blackboard
            .set_bool(BlackboardKey::Staggered, next == EnemyState::Staggered);
    }

    // =========================================================================
    // Aggro volumes
    // =========================================================================

    pub fn enter_agro_sphere(&mut self, player: ActorId) {
        if self.is_dead() {
            return;
        }
        self.blackboard.set_actor(BlackboardKey::Target, Some(player));
    }

    pub fn enter_combat_range(&mut self) {
        self.in_attack_range = true;
        self.blackboard.set_bool(BlackboardKey::InAttackRange, true);
    }

    pub fn exit_combat_range(&mut self) {
        self.in_attack_range = false;
        self.blackboard.set_bool(BlackboardKey::InAttackRange, false);
    }

    // =========================================================================
    // Attacks
    // =========================================================================

    /// Random normal or fast left/right swing; always the rush swing while rushing.
    pub fn attack_section<R: Rng>(&self, rng: &mut R) -> &'static str {
        if self.state == EnemyState::Rushing {
            return RUSH_ATTACK_SECTION;
        }
        ATTACK_SECTIONS[rng.gen_range(0..ATTACK_SECTIONS.len())]
    }

    /// Swing at the target. `section` overrides the random choice.
    pub fn attack_player(&mut self, id: ActorId, section: Option<&str>, ctx: &mut CombatContext) -> bool {
        if self.is_dead() || !self.can_attack || !self.in_attack_range {
            trace!(?id, can_attack = self.can_attack, in_range = self.in_attack_range, "attack rejected");
            return false;
        }
        if matches!(self.state, EnemyState::Staggered | EnemyState::Roaring) {
            return false;
        }
        let section = match section {
            Some(s) => s.to_string(),
            None => self.attack_section(&mut *ctx.rng).to_string(),
        };
        ctx.play(id, AnimationCue::new(Montage::EnemyAttack, section, 1.0));
        self.can_attack = false;
        self.blackboard.set_bool(BlackboardKey::CanAttack, false);
        let tuning = &ctx.config.enemy;
        let (wait, duration) = (tuning.attack_wait, tuning.attack_duration);
        ctx.schedule(id, TimerPurpose::AttackCooldown, wait);
        if self.state == EnemyState::Unoccupied {
            self.set_state(EnemyState::Attacking);
            ctx.schedule(id, TimerPurpose::EnemyAction, duration);
        }
        true
    }

    pub fn reset_can_attack(&mut self) {
        if self.is_dead() {
            return;
        }
        self.can_attack = true;
        self.blackboard.set_bool(BlackboardKey::CanAttack, true);
    }

    pub fn rush_attack_start(&mut self, id: ActorId, ctx: &mut CombatContext) -> bool {
        if self.is_dead() || self.state == EnemyState::Staggered {
            return false;
        }
        ctx.cancel(id, TimerPurpose::EnemyAction);
        self.set_state(EnemyState::Rushing);
        self.walk_speed = self.base_speed * ctx.config.enemy.rush_multiplier;
        true
    }

    pub fn rush_attack_end(&mut self) {
        if self.state != EnemyState::Rushing {
            return;
        }
        self.set_state(EnemyState::Unoccupied);
        self.walk_speed = self.base_speed;
    }

    // =========================================================================
    // Reactions
    // =========================================================================

    /// Balance broke. Blocked while rushing, roaring, already staggered or dead.
    pub fn stagger(&mut self, id: ActorId, ctx: &mut CombatContext) -> bool {
        if self.state.blocks_stagger() {
            return false;
        }
        ctx.cancel(id, TimerPurpose::EnemyAction);
        self.set_state(EnemyState::Staggered);
        ctx.play(id, AnimationCue::new(Montage::EnemyStagger, "HitReactFront", ENEMY_STAGGER_RATE));
        ctx.schedule(id, TimerPurpose::Stagger, ctx.config.enemy.stagger_duration);
        ctx.emit(CombatEvent::Stagger { actor: id });
        info!(?id, "enemy staggered");
        true
    }

    pub fn end_stagger(&mut self, id: ActorId, ctx: &mut CombatContext) {
        if self.state != EnemyState::Staggered {
            return;
        }
        ctx.cancel(id, TimerPurpose::Stagger);
        self.balance.on_stagger_recovered();
        self.set_state(EnemyState::Unoccupied);
    }

    pub fn rage_roar(&mut self, id: ActorId, chance: f32, ctx: &mut CombatContext) -> bool {
        if self.state != EnemyState::Unoccupied || !ctx.roll(chance) {
            return false;
        }
        self.set_state(EnemyState::Roaring);
        ctx.play(id, AnimationCue::new(Montage::EnemyRoar, "Roar", 1.0));
        ctx.schedule(id, TimerPurpose::EnemyAction, ctx.config.enemy.roar_duration);
        true
    }

    pub fn dodge(&mut self, id: ActorId, chance: f32, ctx: &mut CombatContext) -> bool {
        if self.state != EnemyState::Unoccupied || !ctx.roll(chance) {
            return false;
        }
        self.set_state(EnemyState::Dodging);
        let section = if ctx.rng.gen_bool(0.5) { "DodgeL" } else { "DodgeR" };
        ctx.play(id, AnimationCue::new(Montage::EnemyDodge, section, ENEMY_DODGE_RATE));
        ctx.schedule(id, TimerPurpose::EnemyAction, ctx.config.enemy.dodge_duration);
        true
    }

    pub fn taunt(&mut self, id: ActorId, ctx: &mut CombatContext) -> bool {
        if self.is_dead() || self.state == EnemyState::Staggered {
            return false;
        }
        self.set_state(EnemyState::Taunting);
        ctx.play(id, AnimationCue::new(Montage::EnemyTaunt, "BackScratch", ENEMY_TAUNT_RATE));
        ctx.schedule(id, TimerPurpose::EnemyAction, ctx.config.enemy.taunt_duration);
        true
    }

    /// Attack, roar, dodge and taunt montages all end here.
    pub fn finish_enemy_action(&mut self, id: ActorId, ctx: &mut CombatContext) {
        if !self.state.is_transient_action() {
            return;
        }
        ctx.cancel(id, TimerPurpose::EnemyAction);
        self.set_state(EnemyState::Unoccupied);
    }

    /// Reactions after a hit has been resolved against this enemy.
    pub fn on_damaged(&mut self, id: ActorId, killed: bool, ctx: &mut CombatContext) {
        if killed {
            self.die(id, ctx);
            return;
        }
        let tuning = &ctx.config.enemy;
        let (react, dodge, roar) = (tuning.hit_react_chance, tuning.dodge_chance, tuning.roar_chance);
        if self.can_attack && self.state == EnemyState::Unoccupied && ctx.roll(react) {
            ctx.play(id, AnimationCue::new(Montage::EnemyHit, "HitFront", 1.0));
        }
        self.dodge(id, dodge, ctx);
        self.rage_roar(id, roar, ctx);
    }

    pub fn die(&mut self, id: ActorId, ctx: &mut CombatContext) {
        if self.is_dead() {
            return;
        }
        self.set_state(EnemyState::Dead);
        self.blackboard.set_bool(BlackboardKey::Dead, true);
        self.collision_enabled = false;
        self.walk_speed = 0.0;
        ctx.timers.cancel_actor(id);
        ctx.play(id, AnimationCue::new(Montage::EnemyDeath, "DeathA", 1.0));
        ctx.schedule(id, TimerPurpose::Expire, ENEMY_CORPSE_LIFESPAN);
        ctx.emit(CombatEvent::Death { actor: id });
        info!(?id, "enemy died");
    }

    pub fn tick(&mut self, dt: f32) {
        if self.is_dead() {
            return;
        }
        self.health.tick(dt);
        if self.state == EnemyState::Unoccupied {
            self.balance.tick(dt);
        }
    }
}

impl Damageable for Enemy {
    fn weakspot_bone(&self) -> &str {
        &self.weakspot_bone
    }

    fn can_take_damage(&self) -> bool {
        !self.is_dead() && !self.health.is_dead()
    }

    fn take_damage(&mut self, amount: f32, instigator: Option<ActorId>) -> DamageTaken {
        if let Some(instigator) = instigator {
            self.blackboard.set_actor(BlackboardKey::Target, Some(instigator));
        }
        let was_dead = self.health.is_dead();
        let applied = self.health.apply_damage(amount);
        DamageTaken {
            applied,
            killed: !was_dead && self.health.is_dead(),
        }
    }

    fn take_balance_damage(&mut self, amount: f32) -> BalanceOutcome {
        self.balance
            .apply_balance_damage(amount, !self.state.blocks_stagger())
    }
}
