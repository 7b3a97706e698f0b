//! Tuning tables: player and enemy rows, weapon rows, rarity table.
//!
//! Loaded from RON or JSON by file extension. Every section has
//! `#[serde(default)]`, so a file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::balance::BalanceResetPolicy;
use crate::constants::*;
use crate::error::{CombatError, CombatResult};
use crate::rarity::{default_rarity_table, star_multiplier, ItemRarity, RarityRow};
use crate::weapon::{default_weapon_rows, AmmoType, Weapon, WeaponKind, WeaponRow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: f32,
    pub health_regen_rate: f32,
    pub health_regen_cooldown: f32,
    pub max_stamina: f32,
    pub stamina_regen_rate: f32,
    pub stamina_regen_cooldown: f32,
    pub base_speed: f32,
    pub aim_speed: f32,
    pub sprint_multiplier: f32,
    pub sprint_min_stamina: f32,
    pub sprint_drain: f32,
    pub dodge_cost: f32,
    pub dodge_cooldown: f32,
    pub dodge_duration: f32,
    pub dodge_iframes: f32,
    pub reload_duration: f32,
    pub equip_duration: f32,
    pub equip_grab_delay: f32,
    pub stagger_duration: f32,
    pub hit_react_chance: f32,
    pub recoil_amount: f32,
    pub recoil_camera_speed: f32,
    pub starting_ammo: Vec<(AmmoType, u32)>,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: DEFAULT_MAX_HEALTH,
            health_regen_rate: PLAYER_HEALTH_REGEN_RATE,
            health_regen_cooldown: DEFAULT_HEALTH_REGEN_COOLDOWN,
            max_stamina: PLAYER_MAX_STAMINA,
            stamina_regen_rate: PLAYER_STAMINA_REGEN_RATE,
            stamina_regen_cooldown: PLAYER_STAMINA_REGEN_COOLDOWN,
            base_speed: PLAYER_BASE_SPEED,
            aim_speed: PLAYER_AIM_SPEED,
            sprint_multiplier: SPRINT_SPEED_MULT,
            sprint_min_stamina: SPRINT_MIN_STAMINA,
            sprint_drain: SPRINT_STAMINA_DRAIN,
            dodge_cost: DODGE_STAMINA_COST,
            dodge_cooldown: DODGE_COOLDOWN,
            dodge_duration: DODGE_DURATION,
            dodge_iframes: DODGE_IFRAMES,
            reload_duration: RELOAD_DURATION,
            equip_duration: EQUIP_DURATION,
            equip_grab_delay: EQUIP_GRAB_DELAY,
            stagger_duration: PLAYER_STAGGER_DURATION,
            hit_react_chance: PLAYER_HIT_REACT_CHANCE,
            recoil_amount: RECOIL_AMOUNT,
            recoil_camera_speed: RECOIL_CAMERA_SPEED,
            starting_ammo: vec![
                (AmmoType::NineMillimeter, STARTING_9MM_AMMO),
                (AmmoType::AssaultRifle, STARTING_AR_AMMO),
            ],
        }
    }
}

/// Per-enemy stat row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub max_health: f32,
    pub max_balance: f32,
    pub balance_recovery_rate: f32,
    pub attack_damage: f32,
    pub attack_wait: f32,
    pub attack_duration: f32,
    pub stagger_duration: f32,
    pub roar_duration: f32,
    pub dodge_duration: f32,
    pub taunt_duration: f32,
    pub base_speed: f32,
    pub rush_multiplier: f32,
    pub hit_react_chance: f32,
    pub dodge_chance: f32,
    pub roar_chance: f32,
    pub weakspot_bone: String,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            max_health: DEFAULT_MAX_HEALTH,
            max_balance: ENEMY_MAX_BALANCE,
            balance_recovery_rate: ENEMY_BALANCE_RECOVERY_RATE,
            attack_damage: ENEMY_ATTACK_DAMAGE,
            attack_wait: ENEMY_ATTACK_WAIT,
            attack_duration: ENEMY_ATTACK_DURATION,
            stagger_duration: ENEMY_STAGGER_DURATION,
            roar_duration: ENEMY_ROAR_DURATION,
            dodge_duration: ENEMY_DODGE_DURATION,
            taunt_duration: ENEMY_TAUNT_DURATION,
            base_speed: ENEMY_BASE_SPEED,
            rush_multiplier: RUSH_SPEED_MULT,
            hit_react_chance: ENEMY_HIT_REACT_CHANCE,
            dodge_chance: ENEMY_DODGE_CHANCE,
            roar_chance: ENEMY_ROAR_CHANCE,
            weakspot_bone: DEFAULT_WEAKSPOT_BONE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosiveTuning {
    pub base_damage: f32,
    pub radius: f32,
}

impl Default for ExplosiveTuning {
    fn default() -> Self {
        Self {
            base_damage: EXPLOSIVE_BASE_DAMAGE,
            radius: EXPLOSIVE_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerTuning {
    pub count: u32,
    pub interval: f32,
    pub radius: f32,
    pub aggressive: bool,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            count: SPAWNER_COUNT,
            interval: SPAWNER_INTERVAL,
            radius: SPAWNER_RADIUS,
            aggressive: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub seed: u64,
    pub balance_reset: BalanceResetPolicy,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub explosive: ExplosiveTuning,
    pub spawner: SpawnerTuning,
    pub weapons: Vec<WeaponRow>,
    pub rarities: Vec<RarityRow>,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            balance_reset: BalanceResetPolicy::default(),
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            explosive: ExplosiveTuning::default(),
            spawner: SpawnerTuning::default(),
            weapons: default_weapon_rows(),
            rarities: default_rarity_table(),
        }
    }
}

impl CombatConfig {
    /// Load and validate a config file; `.ron` and `.json` are supported.
    pub fn load(path: impl AsRef<Path>) -> CombatResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::from_ron_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => return Err(CombatError::UnsupportedFormat(path.to_path_buf())),
        };
        config.validate()?;
        tracing::info!(?path, weapons = config.weapons.len(), "loaded combat config");
        Ok(config)
    }

    /// Like `load`, but a missing or invalid file falls back to the defaults
    /// with a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(?path, "using default tuning: {}", e);
            Self::default()
        })
    }

    pub fn from_ron_str(text: &str) -> CombatResult<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> CombatResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_ron_string(&self) -> String {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).unwrap_or_default()
    }

    pub fn validate(&self) -> CombatResult<()> {
        let invalid = |msg: String| Err(CombatError::InvalidConfig(msg));

        if self.player.max_health <= 0.0 || self.enemy.max_health <= 0.0 {
            return invalid("max health must be positive".into());
        }
        if self.player.max_stamina <= 0.0 {
            return invalid("player max stamina must be positive".into());
        }
        if self.enemy.max_balance <= 0.0 {
            return invalid("enemy max balance must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.player.hit_react_chance) {
            return invalid("player hit react chance must be within 0-1".into());
        }
        let mut seen = std::collections::HashSet::new();
        for row in &self.weapons {
            if !seen.insert(row.name.as_str()) {
                return invalid(format!("duplicate weapon row '{}'", row.name));
            }
            if row.magazine_capacity == 0 {
                return invalid(format!("{}: magazine capacity must be non-zero", row.name));
            }
            if row.fire_rate <= 0.0 {
                return invalid(format!("{}: fire rate must be positive", row.name));
            }
            if !(0.0..=100.0).contains(&row.accuracy) || !(0.0..=100.0).contains(&row.stability) {
                return invalid(format!("{}: accuracy and stability are 0-100", row.name));
            }
        }
        Ok(())
    }

    pub fn weapon_row(&self, kind: WeaponKind) -> Option<&WeaponRow> {
        self.weapons.iter().find(|r| r.kind == kind)
    }

    /// Damage scale for `rarity`, from the table when present.
    pub fn rarity_multiplier(&self, rarity: ItemRarity) -> f32 {
        self.rarities
            .iter()
            .find(|r| r.rarity == rarity)
            .map(RarityRow::multiplier)
            .unwrap_or_else(|| star_multiplier(rarity.stars()))
    }

    pub fn build_weapon(&self, kind: WeaponKind, rarity: ItemRarity) -> Option<Weapon> {
        self.weapon_row(kind)
            .map(|row| Weapon::from_row(row, self.rarity_multiplier(rarity), rarity))
    }
}
