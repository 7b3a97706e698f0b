//! Player character: combat state machine, stamina, inventory and aim feedback.
//!
//! Every transition takes the actor's own id and a `CombatContext`, so timers,
//! montages and events go through the world without the character holding
//! references to it. Shots are split in two: `begin_fire` runs the guards and
//! the shooter-side effects, and the world resolves the returned `ShotPlan`.

pub mod dodge;
pub mod inventory;
pub mod stamina;
pub mod state;

use bevy::math::{Vec2, Vec3};
use rand::Rng;
use tracing::{debug, info, trace};

use crate::actors::ActorId;
use crate::balance::BalanceOutcome;
use crate::capabilities::{AnimationCue, Montage};
use crate::config::PlayerTuning;
use crate::context::CombatContext;
use crate::damage::{DamageTaken, Damageable, ShotProfile};
use crate::events::CombatEvent;
use crate::health::HealthPool;
use crate::timers::TimerPurpose;
use crate::weapon::spread::spread_radius;
use crate::weapon::{AmmoType, CrosshairSpread, FireMode, Recoil, Weapon};

pub use dodge::DodgeDirection;
pub use inventory::{AmmoPool, WeaponInventory};
pub use stamina::StaminaPool;
pub use state::CombatState;

const DEATH_SECTIONS: [&str; 3] = ["DeathA", "DeathB", "DeathC"];

/// What the world needs to resolve one shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotPlan {
    pub profile: ShotProfile,
    pub spread_radius: f32,
    pub mode: FireMode,
    /// Crosshair trace start
    pub eye: Vec3,
    pub muzzle: Vec3,
    pub direction: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireStart {
    Rejected,
    /// Magazine was empty; a reload started instead
    Reloading,
    Shot(ShotPlan),
}

#[derive(Debug, Clone)]
pub struct PlayerCharacter {
    state: CombatState,
    pub health: HealthPool,
    pub stamina: StaminaPool,
    pub inventory: WeaponInventory,
    pub ammo: AmmoPool,
    pub recoil: Recoil,
    pub crosshair: CrosshairSpread,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Camera forward; shots leave along it
    pub aim_direction: Vec3,
    pub aiming: bool,
    pub fire_held: bool,
    pub falling: bool,
    move_input: Vec2,
    invulnerable: bool,
    dodge_ready: bool,
    input_enabled: bool,
    collision_enabled: bool,
    walk_speed: f32,
    /// Camera relative to the muzzle; the crosshair trace starts here
    pub camera_offset: Vec3,
    /// (pitch, yaw) recoil offset produced by the last tick
    pub recoil_offset: Vec2,
}

impl PlayerCharacter {
    pub fn new(tuning: &PlayerTuning, position: Vec3) -> Self {
        Self {
            state: CombatState::Unoccupied,
            health: HealthPool::new(tuning.max_health)
                .with_regen(tuning.health_regen_rate, tuning.health_regen_cooldown),
            stamina: StaminaPool::from_tuning(tuning),
            inventory: WeaponInventory::default(),
            ammo: AmmoPool::from_pairs(&tuning.starting_ammo),
            recoil: Recoil::new(tuning.recoil_amount, tuning.recoil_camera_speed),
            crosshair: CrosshairSpread::default(),
            position,
            velocity: Vec3::ZERO,
            aim_direction: Vec3::X,
            aiming: false,
            fire_held: false,
            falling: false,
            move_input: Vec2::ZERO,
            invulnerable: false,
            dodge_ready: true,
            input_enabled: true,
            collision_enabled: true,
            walk_speed: tuning.base_speed,
            camera_offset: Vec3::ZERO,
            recoil_offset: Vec2::ZERO,
        }
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state.is_dead()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    pub fn dodge_ready(&self) -> bool {
        self.dodge_ready
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn collision_enabled(&self) -> bool {
        self.collision_enabled
    }

    pub fn walk_speed(&self) -> f32 {
        self.walk_speed
    }

    pub fn move_input(&self) -> Vec2 {
        self.move_input
    }

    pub fn equipped_weapon(&self) -> Option<&Weapon> {
        self.inventory.equipped()
    }

    pub fn carried_ammo(&self, ammo_type: AmmoType) -> u32 {
        self.ammo.get(ammo_type)
    }

    /// Drop everything the current action has in flight.
    fn interrupt_actions(&mut self, id: ActorId, ctx: &mut CombatContext) {
        for purpose in [
            TimerPurpose::FireRate,
            TimerPurpose::Reload,
            TimerPurpose::EquipGrab,
            TimerPurpose::EquipFinish,
        ] {
            ctx.cancel(id, purpose);
        }
        self.inventory.cancel_exchange();
    }

    fn set_state(&mut self, next: CombatState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "player state");
            self.state = next;
        }
    }

    pub fn set_move_input(&mut self, id: ActorId, input: Vec2, ctx: &mut CombatContext) {
        if !self.input_enabled {
            return;
        }
        self.move_input = input;
        if self.state == CombatState::Sprinting && input.y < crate::constants::SPRINT_FORWARD_THRESHOLD {
            self.end_sprint(id, ctx);
        }
    }

    pub fn set_aiming(&mut self, aiming: bool) {
        if self.input_enabled {
            self.aiming = aiming;
        }
    }

    // =========================================================================
    // Firing
    // =========================================================================

    /// Shooter-side half of a shot. Spends the round, kicks the camera and
    /// arms the fire-rate timer; the caller traces and resolves the plan.
    pub fn begin_fire(&mut self, id: ActorId, ctx: &mut CombatContext) -> FireStart {
        if !self.input_enabled || self.state != CombatState::Unoccupied || self.falling {
            trace!(state = ?self.state, falling = self.falling, "fire rejected");
            return FireStart::Rejected;
        }
        let Some(weapon) = self.inventory.equipped() else {
            return FireStart::Rejected;
        };
        if !weapon.has_ammo() {
            return if self.start_reload(id, ctx) {
                FireStart::Reloading
            } else {
                FireStart::Rejected
            };
        }

        let aiming = self.aiming;
        let Some(weapon) = self.inventory.equipped_mut() else {
            return FireStart::Rejected;
        };
        let plan = ShotPlan {
            profile: ShotProfile::from(&*weapon),
            spread_radius: spread_radius(weapon.accuracy, aiming),
            mode: weapon.fire_mode,
            eye: self.position + self.camera_offset,
            muzzle: self.position,
            direction: self.aim_direction.normalize_or_zero(),
        };
        let stability = weapon.stability;
        let interval = weapon.fire_interval();
        weapon.consume_ammo();
        let ammo_left = weapon.ammo();

        let montage = if aiming { Montage::AimFire } else { Montage::HipFire };
        ctx.play(id, AnimationCue::new(montage, "StartFire", 1.0));
        self.recoil.trigger(stability, aiming, &mut *ctx.rng);
        self.crosshair.on_shot();
        self.set_state(CombatState::FireTimerInProgress);
        ctx.schedule(id, TimerPurpose::FireRate, interval);
        ctx.emit(CombatEvent::ShotFired {
            shooter: id,
            ammo_left,
        });
        FireStart::Shot(plan)
    }

    /// Fire-rate timer elapsed. Returns true when the trigger is still held
    /// on an automatic weapon with rounds left, so the caller fires again.
    pub fn fire_timer_elapsed(&mut self, id: ActorId, ctx: &mut CombatContext) -> bool {
        if self.state == CombatState::FireTimerInProgress {
            self.set_state(CombatState::Unoccupied);
        }
        if self.state != CombatState::Unoccupied {
            return false;
        }
        let Some(weapon) = self.inventory.equipped() else {
            return false;
        };
        if weapon.has_ammo() {
            self.fire_held && weapon.automatic
        } else {
            self.start_reload(id, ctx);
            false
        }
    }

    // =========================================================================
    // Reload and ammo
    // =========================================================================

    pub fn can_reload(&self) -> bool {
        if self.state != CombatState::Unoccupied {
            return false;
        }
        let Some(weapon) = self.inventory.equipped() else {
            return false;
        };
        weapon.reloadable && !weapon.is_full() && self.ammo.get(weapon.ammo_type) > 0
    }

    pub fn start_reload(&mut self, id: ActorId, ctx: &mut CombatContext) -> bool {
        if !self.input_enabled || !self.can_reload() {
            trace!(state = ?self.state, "reload rejected");
            return false;
        }
        let Some(weapon) = self.inventory.equipped() else {
            return false;
        };
        let cue = AnimationCue::new(Montage::Reload, weapon.reload_section.clone(), weapon.reload_rate);
        self.set_state(CombatState::Reloading);
        ctx.play(id, cue);
        ctx.schedule(id, TimerPurpose::Reload, ctx.config.player.reload_duration);
        true
    }

    /// Reload montage finished: top up the magazine in one step.
    ///
    /// Returns true if the trigger is held on an automatic weapon.
    pub fn finish_reload(&mut self, id: ActorId, ctx: &mut CombatContext) -> bool {
        if self.state != CombatState::Reloading {
            return false;
        }
        ctx.cancel(id, TimerPurpose::Reload);
        self.set_state(CombatState::Unoccupied);
        let Some(weapon) = self.inventory.equipped_mut() else {
            return false;
        };
        let taken = self.ammo.take(weapon.ammo_type, weapon.room());
        weapon.load_rounds(taken);
        debug!(loaded = taken, magazine = weapon.ammo(), "reload complete");
        self.fire_held && weapon.automatic
    }

    pub fn pickup_ammo(&mut self, id: ActorId, ammo_type: AmmoType, amount: u32, ctx: &mut CombatContext) {
        if self.is_dead() {
            return;
        }
        self.ammo.add(ammo_type, amount);
        let Some(weapon) = self.inventory.equipped_mut() else {
            return;
        };
        if weapon.ammo_type != ammo_type {
            return;
        }
        if !weapon.reloadable {
            // bows draw straight from the quiver
            let taken = self.ammo.take(ammo_type, weapon.room());
            weapon.load_rounds(taken);
        } else if !weapon.has_ammo() {
            self.start_reload(id, ctx);
        }
    }

    // =========================================================================
    // Sprint and dodge
    // =========================================================================

    /// Sprint is a toggle.
    pub fn toggle_sprint(&mut self, id: ActorId, ctx: &mut CombatContext) -> bool {
        if !self.input_enabled {
            return false;
        }
        if self.state == CombatState::Sprinting {
            self.end_sprint(id, ctx);
            return true;
        }
        let tuning = &ctx.config.player;
        if !self.state.is_interruptible()
            || self.falling
            || self.stamina.current() < tuning.sprint_min_stamina
        {
            trace!(state = ?self.state, stamina = self.stamina.current(), "sprint rejected");
            return false;
        }
        let speed = tuning.base_speed * tuning.sprint_multiplier;
        self.interrupt_actions(id, ctx);
        self.set_state(CombatState::Sprinting);
        self.walk_speed = speed;
        true
    }

    pub fn end_sprint(&mut self, _id: ActorId, ctx: &mut CombatContext) {
        if self.state != CombatState::Sprinting {
            return;
        }
        self.set_state(CombatState::Unoccupied);
        self.walk_speed = ctx.config.player.base_speed;
    }

    pub fn dodge(&mut self, id: ActorId, ctx: &mut CombatContext) -> bool {
        let tuning = &ctx.config.player;
        let (cost, duration, cooldown, iframes) = (
            tuning.dodge_cost,
            tuning.dodge_duration,
            tuning.dodge_cooldown,
            tuning.dodge_iframes,
        );
        if !self.input_enabled
            || !self.state.is_interruptible()
            || self.falling
            || !self.dodge_ready
            || self.stamina.current() <= cost
        {
            trace!(state = ?self.state, ready = self.dodge_ready, "dodge rejected");
            return false;
        }
        self.interrupt_actions(id, ctx);
        self.set_state(CombatState::Dodging);
        let direction = DodgeDirection::from_input(self.move_input);
        ctx.play(id, AnimationCue::new(Montage::Dodge, direction.section(), 1.0));
        self.stamina.consume(cost);
        self.invulnerable = true;
        self.dodge_ready = false;
        ctx.schedule(id, TimerPurpose::Dodge, duration);
        ctx.schedule(id, TimerPurpose::DodgeCooldown, cooldown);
        ctx.schedule(id, TimerPurpose::Invulnerability, iframes);
        true
    }

    pub fn finish_dodge(&mut self, id: ActorId, ctx: &mut CombatContext) {
        if self.state != CombatState::Dodging {
            return;
        }
        ctx.cancel(id, TimerPurpose::Dodge);
        ctx.cancel(id, TimerPurpose::Invulnerability);
        self.invulnerable = false;
        self.set_state(CombatState::Unoccupied);
    }

    pub fn end_invulnerability(&mut self) {
        self.invulnerable = false;
    }

    pub fn reset_dodge(&mut self) {
        self.dodge_ready = true;
    }

    // =========================================================================
    // Hit reactions and death
    // =========================================================================

    pub fn stagger(&mut self, id: ActorId, ctx: &mut CombatContext) -> bool {
        if self.is_dead() {
            return false;
        }
        self.interrupt_actions(id, ctx);
        ctx.cancel(id, TimerPurpose::Dodge);
        self.set_state(CombatState::Staggered);
        ctx.play(
            id,
            AnimationCue::new(Montage::HitReact, "HitReactRight", crate::constants::PLAYER_STAGGER_RATE),
        );
        ctx.schedule(id, TimerPurpose::Stagger, ctx.config.player.stagger_duration);
        ctx.emit(CombatEvent::Stagger { actor: id });
        info!(?id, "player staggered");
        true
    }

    pub fn end_stagger(&mut self, id: ActorId, ctx: &mut CombatContext) {
        if self.state != CombatState::Staggered {
            return;
        }
        ctx.cancel(id, TimerPurpose::Stagger);
        self.set_state(CombatState::Unoccupied);
    }

    /// A melee hit landed; roll for a hit reaction.
    pub fn on_melee_hit(&mut self, id: ActorId, ctx: &mut CombatContext) -> bool {
        if self.is_dead() {
            return false;
        }
        let chance = ctx.config.player.hit_react_chance;
        ctx.roll(chance) && self.stagger(id, ctx)
    }

    pub fn die(&mut self, id: ActorId, ctx: &mut CombatContext) {
        if self.state == CombatState::Dead {
            return;
        }
        self.set_state(CombatState::Dead);
        self.aiming = false;
        self.fire_held = false;
        self.invulnerable = false;
        self.stamina.regen_enabled = false;
        self.input_enabled = false;
        self.collision_enabled = false;
        self.inventory.cancel_exchange();
        ctx.timers.cancel_actor(id);

        let section = DEATH_SECTIONS[ctx.rng.gen_range(0..DEATH_SECTIONS.len())];
        ctx.play(id, AnimationCue::new(Montage::Death, section, 1.0));
        ctx.emit(CombatEvent::Death { actor: id });
        info!(?id, section, "player died");
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Take a weapon. With a full inventory it replaces the equipped weapon,
    /// which is handed back to be thrown into the world.
    pub fn pickup_weapon(&mut self, id: ActorId, weapon: Weapon, ctx: &mut CombatContext) -> Option<Weapon> {
        if self.is_dead() {
            return Some(weapon);
        }
        let kind = weapon.kind;
        match self.inventory.add_weapon(weapon) {
            Ok(slot) => {
                if self.inventory.equipped_slot() == Some(slot) {
                    ctx.presentation.attach_actor(id, inventory::HAND_SOCKET);
                    ctx.emit(CombatEvent::WeaponEquipped { owner: id, kind, slot });
                } else if let Some(socket) = inventory::stow_socket(slot) {
                    ctx.presentation.attach_actor(id, socket);
                }
                None
            }
            Err(weapon) => {
                let dropped = self.inventory.swap_equipped(weapon);
                if let Some(slot) = self.inventory.equipped_slot() {
                    ctx.presentation.attach_actor(id, inventory::HAND_SOCKET);
                    ctx.emit(CombatEvent::WeaponEquipped { owner: id, kind, slot });
                }
                dropped
            }
        }
    }

    /// Start switching to `target`. The hand-off waits for the grab point.
    pub fn exchange(&mut self, id: ActorId, target: usize, ctx: &mut CombatContext) -> bool {
        if !self.input_enabled || !self.state.allows_exchange() {
            return false;
        }
        if !self.inventory.begin_exchange(target) {
            trace!(target, "weapon switch rejected");
            return false;
        }
        if self.state == CombatState::Reloading {
            ctx.cancel(id, TimerPurpose::Reload);
        }
        self.set_state(CombatState::Equipping);
        ctx.play(id, AnimationCue::new(Montage::Equip, "Equip", 1.0));
        let tuning = &ctx.config.player;
        let (grab, finish) = (tuning.equip_grab_delay, tuning.equip_duration);
        ctx.schedule(id, TimerPurpose::EquipGrab, grab);
        ctx.schedule(id, TimerPurpose::EquipFinish, finish);
        true
    }

    pub fn switch_to_slot(&mut self, id: ActorId, slot: usize, ctx: &mut CombatContext) -> bool {
        self.exchange(id, slot, ctx)
    }

    pub fn next_weapon(&mut self, id: ActorId, ctx: &mut CombatContext) -> bool {
        match self.inventory.next_slot() {
            Some(slot) => self.exchange(id, slot, ctx),
            None => false,
        }
    }

    /// Equip montage reached its grab point: stow the old weapon, draw the new one.
    pub fn grab_weapon(&mut self, id: ActorId, ctx: &mut CombatContext) -> Option<(usize, usize)> {
        if self.state != CombatState::Equipping {
            return None;
        }
        ctx.cancel(id, TimerPurpose::EquipGrab);
        let (previous, slot) = self.inventory.complete_exchange()?;
        if let Some(socket) = inventory::stow_socket(previous) {
            ctx.presentation.attach_actor(id, socket);
        }
        ctx.presentation.attach_actor(id, inventory::HAND_SOCKET);
        if let Some(weapon) = self.inventory.equipped() {
            ctx.emit(CombatEvent::WeaponEquipped {
                owner: id,
                kind: weapon.kind,
                slot,
            });
        }
        Some((previous, slot))
    }

    pub fn finish_equipping(&mut self, id: ActorId, ctx: &mut CombatContext) {
        if self.state != CombatState::Equipping {
            return;
        }
        if self.inventory.pending_slot().is_some() {
            self.grab_weapon(id, ctx);
        }
        ctx.cancel(id, TimerPurpose::EquipFinish);
        self.set_state(CombatState::Unoccupied);
    }

    // =========================================================================
    // Per-frame
    // =========================================================================

    pub fn tick(&mut self, id: ActorId, dt: f32, ctx: &mut CombatContext) {
        if self.is_dead() {
            return;
        }
        self.health.tick(dt);

        let tuning = &ctx.config.player;
        let (drain, base_speed, aim_speed) = (tuning.sprint_drain, tuning.base_speed, tuning.aim_speed);
        if self.state == CombatState::Sprinting {
            self.stamina.consume(drain * dt);
            if self.stamina.current() <= 0.0 {
                self.end_sprint(id, ctx);
            }
        }
        self.stamina.tick(dt);

        self.walk_speed = if self.state == CombatState::Sprinting {
            base_speed * ctx.config.player.sprint_multiplier
        } else if self.aiming {
            aim_speed
        } else {
            base_speed
        };

        let horizontal = Vec2::new(self.velocity.x, self.velocity.y).length();
        self.crosshair.update(dt, horizontal, self.falling, self.aiming);
        let (pitch, yaw) = self.recoil.tick(dt);
        self.recoil_offset = Vec2::new(pitch, yaw);
    }
}

impl Damageable for PlayerCharacter {
    fn weakspot_bone(&self) -> &str {
        ""
    }

    fn can_take_damage(&self) -> bool {
        !self.is_dead() && !self.invulnerable
    }

    fn take_damage(&mut self, amount: f32, _instigator: Option<ActorId>) -> DamageTaken {
        let was_dead = self.health.is_dead();
        let applied = self.health.apply_damage(amount);
        DamageTaken {
            applied,
            killed: !was_dead && self.health.is_dead(),
        }
    }

    fn take_balance_damage(&mut self, _amount: f32) -> BalanceOutcome {
        BalanceOutcome::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;
    use crate::rarity::ItemRarity;
    use crate::weapon::WeaponKind;

    struct Harness {
        inner: TestContext,
        id: ActorId,
    }

    impl std::ops::Deref for Harness {
        type Target = TestContext;
        fn deref(&self) -> &TestContext {
            &self.inner
        }
    }

    impl std::ops::DerefMut for Harness {
        fn deref_mut(&mut self) -> &mut TestContext {
            &mut self.inner
        }
    }

    impl Harness {
        fn new() -> Self {
            Self {
                inner: TestContext::new(),
                id: ActorId::from_bits(0),
            }
        }

        fn armed_player(&mut self, kind: WeaponKind) -> PlayerCharacter {
            let mut player = PlayerCharacter::new(&self.config.player, Vec3::ZERO);
            let weapon = self.config.build_weapon(kind, ItemRarity::Damaged).unwrap();
            let id = self.id;
            player.pickup_weapon(id, weapon, &mut self.ctx());
            player
        }
    }

    fn set_magazine(p: &mut PlayerCharacter, rounds: u32) {
        let weapon = p.inventory.equipped().unwrap().clone().with_ammo(rounds);
        *p.inventory.equipped_mut().unwrap() = weapon;
    }

    #[test]
    fn test_fire_spends_round_and_arms_timer() {
        let mut h = Harness::new();
        let mut p = h.armed_player(WeaponKind::SubmachineGun);
        let id = h.id;
        let start = p.begin_fire(id, &mut h.ctx());
        assert!(matches!(start, FireStart::Shot(_)));
        assert_eq!(p.state(), CombatState::FireTimerInProgress);
        assert_eq!(p.equipped_weapon().unwrap().ammo(), 29);
        assert!(h.timers.is_pending(id, TimerPurpose::FireRate));
        assert!(matches!(p.begin_fire(id, &mut h.ctx()), FireStart::Rejected));
    }

    #[test]
    fn test_fire_while_falling_rejected() {
        let mut h = Harness::new();
        let mut p = h.armed_player(WeaponKind::Pistol);
        p.falling = true;
        let id = h.id;
        assert!(matches!(p.begin_fire(id, &mut h.ctx()), FireStart::Rejected));
        assert_eq!(p.equipped_weapon().unwrap().ammo(), 12);
    }

    #[test]
    fn test_empty_fire_redirects_to_reload() {
        let mut h = Harness::new();
        let mut p = h.armed_player(WeaponKind::SubmachineGun);
        let id = h.id;
        set_magazine(&mut p, 0);
        assert_eq!(p.begin_fire(id, &mut h.ctx()), FireStart::Reloading);
        assert_eq!(p.state(), CombatState::Reloading);
    }

    #[test]
    fn test_reload_tops_up_from_pool() {
        let mut h = Harness::new();
        let mut p = h.armed_player(WeaponKind::SubmachineGun);
        let id = h.id;
        set_magazine(&mut p, 20);
        assert!(p.start_reload(id, &mut h.ctx()));
        p.finish_reload(id, &mut h.ctx());
        assert_eq!(p.equipped_weapon().unwrap().ammo(), 30);
        assert_eq!(p.carried_ammo(AmmoType::NineMillimeter), 75);
        assert!(!h.timers.is_pending(id, TimerPurpose::Reload));
    }

    #[test]
    fn test_dodge_consumes_stamina_and_grants_iframes() {
        let mut h = Harness::new();
        let mut p = h.armed_player(WeaponKind::Pistol);
        let id = h.id;
        p.set_move_input(id, Vec2::new(1.0, 1.0), &mut h.ctx());
        assert!(p.dodge(id, &mut h.ctx()));
        assert_eq!(p.state(), CombatState::Dodging);
        assert!(p.is_invulnerable());
        assert!(!p.can_take_damage());
        assert!((p.stamina.current() - 70.0).abs() < f32::EPSILON);
        assert_eq!(h.presentation.sections_for(id).last(), Some(&"DodgeFR"));
        assert!(!p.dodge(id, &mut h.ctx()), "already dodging");
        p.finish_dodge(id, &mut h.ctx());
        assert_eq!(p.state(), CombatState::Unoccupied);
        assert!(!p.dodge(id, &mut h.ctx()), "cooldown still running");
    }

    #[test]
    fn test_dodge_needs_more_than_cost() {
        let mut h = Harness::new();
        let mut p = h.armed_player(WeaponKind::Pistol);
        p.stamina.consume(70.0);
        let id = h.id;
        assert!(!p.dodge(id, &mut h.ctx()));
        assert_eq!(p.state(), CombatState::Unoccupied);
    }

    #[test]
    fn test_sprint_toggle_and_drain() {
        let mut h = Harness::new();
        let mut p = h.armed_player(WeaponKind::Pistol);
        let id = h.id;
        p.set_move_input(id, Vec2::new(0.0, 1.0), &mut h.ctx());
        assert!(p.toggle_sprint(id, &mut h.ctx()));
        assert_eq!(p.state(), CombatState::Sprinting);
        assert!((p.walk_speed() - 750.0).abs() < f32::EPSILON);
        p.tick(id, 2.0, &mut h.ctx());
        assert!((p.stamina.current() - 75.0).abs() < 1e-3);
        p.set_move_input(id, Vec2::new(0.0, 0.2), &mut h.ctx());
        assert_eq!(p.state(), CombatState::Unoccupied);
        assert!((p.walk_speed() - 500.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sprint_ends_when_stamina_runs_out() {
        let mut h = Harness::new();
        let mut p = h.armed_player(WeaponKind::Pistol);
        let id = h.id;
        assert!(p.toggle_sprint(id, &mut h.ctx()));
        p.tick(id, 10.0, &mut h.ctx());
        assert_eq!(p.stamina.current(), 0.0);
        assert_eq!(p.state(), CombatState::Unoccupied);
    }

    #[test]
    fn test_death_is_terminal() {
        let mut h = Harness::new();
        let mut p = h.armed_player(WeaponKind::Pistol);
        let id = h.id;
        p.aiming = true;
        p.fire_held = true;
        assert!(p.dodge(id, &mut h.ctx()));
        assert!(h.timers.pending_for(id) > 0);
        p.die(id, &mut h.ctx());
        assert_eq!(p.state(), CombatState::Dead);
        assert!(!p.aiming && !p.fire_held);
        assert!(!p.input_enabled() && !p.collision_enabled());
        assert_eq!(h.timers.pending_for(id), 0);
        assert!(!p.dodge(id, &mut h.ctx()));
        assert!(!p.stagger(id, &mut h.ctx()));
        let section = h.presentation.sections_for(id).last().copied().unwrap();
        assert!(DEATH_SECTIONS.contains(&section));
    }

    #[test]
    fn test_exchange_defers_hand_off() {
        let mut h = Harness::new();
        let mut p = h.armed_player(WeaponKind::SubmachineGun);
        let id = h.id;
        let pistol = h.config.build_weapon(WeaponKind::Pistol, ItemRarity::Common).unwrap();
        assert!(p.pickup_weapon(id, pistol, &mut h.ctx()).is_none());
        assert!(p.exchange(id, 1, &mut h.ctx()));
        assert_eq!(p.state(), CombatState::Equipping);
        assert_eq!(p.equipped_weapon().unwrap().kind, WeaponKind::SubmachineGun);
        assert!(!p.exchange(id, 1, &mut h.ctx()), "same pending target");
        assert_eq!(p.grab_weapon(id, &mut h.ctx()), Some((0, 1)));
        assert_eq!(p.equipped_weapon().unwrap().kind, WeaponKind::Pistol);
        p.finish_equipping(id, &mut h.ctx());
        assert_eq!(p.state(), CombatState::Unoccupied);
    }

    #[test]
    fn test_stagger_cancels_reload() {
        let mut h = Harness::new();
        let mut p = h.armed_player(WeaponKind::SubmachineGun);
        let id = h.id;
        set_magazine(&mut p, 3);
        assert!(p.start_reload(id, &mut h.ctx()));
        assert!(p.on_melee_hit(id, &mut h.ctx()));
        assert_eq!(p.state(), CombatState::Staggered);
        assert!(!h.timers.is_pending(id, TimerPurpose::Reload));
        p.finish_reload(id, &mut h.ctx());
        assert_eq!(p.equipped_weapon().unwrap().ammo(), 3, "discarded reload loads nothing");
        p.end_stagger(id, &mut h.ctx());
        assert_eq!(p.state(), CombatState::Unoccupied);
    }
}
