//! Centralized tuning constants for the shooter combat core.
//!
//! These are the defaults `CombatConfig` falls back to. Values that only
//! make sense inside one module (montage section names, compass tables)
//! stay in that module.

// =====================================================
// Health & Stamina
// =====================================================

/// Default max health for any damageable actor
pub const DEFAULT_MAX_HEALTH: f32 = 100.0;

/// Seconds after the last hit before health regeneration resumes
pub const DEFAULT_HEALTH_REGEN_COOLDOWN: f32 = 5.0;

/// Player health regenerated per second once the cooldown elapses
pub const PLAYER_HEALTH_REGEN_RATE: f32 = 10.0;

pub const PLAYER_MAX_STAMINA: f32 = 100.0;

/// Stamina regenerated per second
pub const PLAYER_STAMINA_REGEN_RATE: f32 = 20.0;

/// Seconds after stamina use before it starts regenerating
pub const PLAYER_STAMINA_REGEN_COOLDOWN: f32 = 3.0;

// =====================================================
// Player Movement
// =====================================================

pub const PLAYER_BASE_SPEED: f32 = 500.0;
pub const PLAYER_AIM_SPEED: f32 = 250.0;

/// Walk speed multiplier while sprinting
pub const SPRINT_SPEED_MULT: f32 = 1.5;

/// Minimum stamina required to start sprinting
pub const SPRINT_MIN_STAMINA: f32 = 15.0;

/// Stamina drained per second while sprinting
pub const SPRINT_STAMINA_DRAIN: f32 = 12.5;

/// Forward input below this ends a sprint
pub const SPRINT_FORWARD_THRESHOLD: f32 = 0.5;

// =====================================================
// Dodge
// =====================================================

/// Stamina consumed per dodge; a dodge also requires strictly more than this
pub const DODGE_STAMINA_COST: f32 = 30.0;

/// Seconds before another dodge is allowed
pub const DODGE_COOLDOWN: f32 = 1.5;

/// Dodge montage length (seconds) when no animation callback arrives first
pub const DODGE_DURATION: f32 = 0.6;

/// Invulnerability window granted on dodge entry
pub const DODGE_IFRAMES: f32 = 0.6;

// =====================================================
// Player Actions
// =====================================================

pub const RELOAD_DURATION: f32 = 1.2;
pub const RELOAD_MONTAGE_RATE: f32 = 1.2;
pub const EQUIP_DURATION: f32 = 0.5;

/// Delay into the equip montage at which the weapon hand-off happens
pub const EQUIP_GRAB_DELAY: f32 = 0.2;

pub const PLAYER_STAGGER_DURATION: f32 = 0.8;
pub const PLAYER_STAGGER_RATE: f32 = 1.25;

/// Chance an enemy melee hit staggers the player
pub const PLAYER_HIT_REACT_CHANCE: f32 = 1.0;

/// Starting carried ammo
pub const STARTING_9MM_AMMO: u32 = 85;
pub const STARTING_AR_AMMO: u32 = 150;

// =====================================================
// Recoil & Crosshair
// =====================================================

pub const RECOIL_AMOUNT: f32 = 0.8;

/// Speed the kick decays at; the recovery term chases at twice this
pub const RECOIL_CAMERA_SPEED: f32 = 5.0;

/// Hip-fire multipliers applied on top of the stability factor
pub const HIP_VERTICAL_RECOIL_MULT: f32 = 2.0;
pub const HIP_HORIZONTAL_RECOIL_MULT: f32 = 1.5;

/// Spread radius at accuracy 0 while aiming
pub const BASE_SPREAD_RADIUS: f32 = 80.0;

/// Hip-fire spread multiplier
pub const HIP_SPREAD_MULT: f32 = 2.0;

/// Crosshair ray length
pub const CROSSHAIR_TRACE_DISTANCE: f32 = 50_000.0;

/// Muzzle trace overshoot past the crosshair hit point
pub const MUZZLE_TRACE_EXTENSION: f32 = 1.25;

/// Step taken past a hit the trace ignores before tracing again
pub const TRACE_SKIP_DISTANCE: f32 = 1.0;

/// Ignored hits one trace may step past
pub const MAX_TRACE_PASSES: usize = 16;

/// Seconds the shooting factor stays raised after a shot
pub const SHOOT_TIME_DURATION: f32 = 0.09;

pub const CROSSHAIR_BASE: f32 = 0.5;
pub const CROSSHAIR_MAX_WALK_SPEED: f32 = 600.0;

// =====================================================
// Enemy
// =====================================================

pub const ENEMY_MAX_BALANCE: f32 = 100.0;

/// Balance regained per second while unoccupied (0 disables recovery)
pub const ENEMY_BALANCE_RECOVERY_RATE: f32 = 0.0;

pub const ENEMY_ATTACK_DAMAGE: f32 = 20.0;

/// Cooldown between enemy attacks
pub const ENEMY_ATTACK_WAIT: f32 = 1.0;

pub const ENEMY_ATTACK_DURATION: f32 = 0.9;
pub const ENEMY_STAGGER_DURATION: f32 = 1.5;
pub const ENEMY_STAGGER_RATE: f32 = 0.8;
pub const ENEMY_ROAR_DURATION: f32 = 2.0;
pub const ENEMY_DODGE_DURATION: f32 = 0.5;
pub const ENEMY_DODGE_RATE: f32 = 1.5;
pub const ENEMY_TAUNT_DURATION: f32 = 2.5;
pub const ENEMY_TAUNT_RATE: f32 = 1.15;
pub const ENEMY_BASE_SPEED: f32 = 400.0;

/// Seconds a dead enemy lingers before it is removed
pub const ENEMY_CORPSE_LIFESPAN: f32 = 10.0;

/// Speed multiplier while rushing
pub const RUSH_SPEED_MULT: f32 = 2.5;

/// Chance rolls after a non-lethal hit
pub const ENEMY_HIT_REACT_CHANCE: f32 = 0.33;
pub const ENEMY_DODGE_CHANCE: f32 = 0.06;
pub const ENEMY_ROAR_CHANCE: f32 = 0.015;

pub const DEFAULT_WEAKSPOT_BONE: &str = "head";

// =====================================================
// Items, Explosives, Projectiles, Spawners
// =====================================================

pub const INVENTORY_CAPACITY: usize = 4;

/// Damage scale per rarity star above the first
pub const RARITY_STAR_SCALE: f32 = 0.15;

/// Seconds a thrown weapon falls before it becomes a pickup
pub const WEAPON_DROP_FALL_TIME: f32 = 0.7;

pub const EXPLOSIVE_BASE_DAMAGE: f32 = 100.0;
pub const EXPLOSIVE_RADIUS: f32 = 500.0;

/// Inner (full damage) radius as a fraction of the outer radius
pub const EXPLOSIVE_INNER_FRACTION: f32 = 0.3;

/// Minimum damage at the outer radius as a fraction of base damage
pub const EXPLOSIVE_MIN_DAMAGE_FRACTION: f32 = 0.1;

pub const PROJECTILE_SPEED: f32 = 6500.0;
pub const PROJECTILE_LIFESPAN: f32 = 20.0;

/// Reach of the arrow's collision box, checked as it spawns
pub const PROJECTILE_SPAWN_SWEEP: f32 = 100.0;

pub const SPAWNER_COUNT: u32 = 1;
pub const SPAWNER_INTERVAL: f32 = 0.5;
pub const SPAWNER_RADIUS: f32 = 300.0;

/// Seed used when no config overrides it
pub const DEFAULT_SEED: u64 = 42;
