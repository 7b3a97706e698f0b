//! Ranged weapons: stat rows, the per-instance `Weapon`, and magazine bookkeeping.
//!
//! A `Weapon` is a plain value. While carried it lives inside the player's
//! inventory; once thrown it moves into the world arena as a dropped item.

pub mod recoil;
pub mod spread;

use serde::{Deserialize, Serialize};

use crate::rarity::ItemRarity;

pub use recoil::Recoil;
pub use spread::{interp_to, CrosshairSpread};

/// Weapon families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    SubmachineGun,
    AssaultRifle,
    Pistol,
    Uzi,
    Ak47,
    BowAndArrow,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 6] = [
        WeaponKind::SubmachineGun,
        WeaponKind::AssaultRifle,
        WeaponKind::Pistol,
        WeaponKind::Uzi,
        WeaponKind::Ak47,
        WeaponKind::BowAndArrow,
    ];

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AmmoType {
    NineMillimeter,
    AssaultRifle,
    Arrow,
}

/// How a shot reaches its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FireMode {
    #[default]
    HitScan,
    Projectile,
}

/// Lifecycle of a weapon as a world item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ItemState {
    #[default]
    Pickup,
    EquipInterping,
    PickedUp,
    Equipped,
    Falling,
}

/// One row of the weapon data table (before rarity scaling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponRow {
    pub kind: WeaponKind,
    pub name: String,
    pub ammo_type: AmmoType,
    pub magazine_capacity: u32,
    pub damage: f32,
    pub weakspot_damage: f32,
    /// 0-100; higher is tighter spread
    pub accuracy: f32,
    /// 0-100; higher is less recoil
    pub stability: f32,
    pub balance_damage: f32,
    /// Shots per second
    pub fire_rate: f32,
    pub automatic: bool,
    #[serde(default = "default_true")]
    pub reloadable: bool,
    #[serde(default)]
    pub fire_mode: FireMode,
    pub reload_section: String,
    pub reload_rate: f32,
}

fn default_true() -> bool {
    true
}

impl WeaponRow {
    #[allow(clippy::too_many_arguments)]
    fn hitscan(
        kind: WeaponKind,
        name: &str,
        ammo_type: AmmoType,
        magazine_capacity: u32,
        damage: f32,
        weakspot_damage: f32,
        accuracy: f32,
        stability: f32,
        balance_damage: f32,
        fire_rate: f32,
        automatic: bool,
        reload_section: &str,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            ammo_type,
            magazine_capacity,
            damage,
            weakspot_damage,
            accuracy,
            stability,
            balance_damage,
            fire_rate,
            automatic,
            reloadable: true,
            fire_mode: FireMode::HitScan,
            reload_section: reload_section.into(),
            reload_rate: crate::constants::RELOAD_MONTAGE_RATE,
        }
    }
}

/// Built-in weapon table
pub fn default_weapon_rows() -> Vec<WeaponRow> {
    use AmmoType::*;
    use WeaponKind::*;
    vec![
        WeaponRow::hitscan(SubmachineGun, "SMG", NineMillimeter, 30, 12.0, 30.0, 60.0, 55.0, 8.0, 10.0, true, "Reload SMG"),
        WeaponRow::hitscan(WeaponKind::AssaultRifle, "Assault Rifle", AmmoType::AssaultRifle, 30, 20.0, 50.0, 75.0, 65.0, 15.0, 8.0, true, "Reload AR"),
        WeaponRow::hitscan(Pistol, "Pistol", NineMillimeter, 12, 25.0, 60.0, 85.0, 70.0, 20.0, 4.0, false, "Reload Pistol"),
        WeaponRow::hitscan(Uzi, "Uzi", NineMillimeter, 25, 10.0, 25.0, 50.0, 45.0, 6.0, 14.0, true, "Reload SMG"),
        WeaponRow::hitscan(Ak47, "AK-47", AmmoType::AssaultRifle, 30, 26.0, 65.0, 65.0, 45.0, 18.0, 7.0, true, "Reload AR"),
        WeaponRow {
            reloadable: false,
            fire_mode: FireMode::Projectile,
            reload_rate: 1.0,
            ..WeaponRow::hitscan(BowAndArrow, "Bow", Arrow, 12, 60.0, 150.0, 95.0, 90.0, 40.0, 1.0, false, "Reload Bow")
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub kind: WeaponKind,
    pub rarity: ItemRarity,
    pub ammo_type: AmmoType,
    ammo: u32,
    magazine_capacity: u32,
    /// Already scaled by rarity
    pub damage: f32,
    pub weakspot_damage: f32,
    pub accuracy: f32,
    pub stability: f32,
    pub balance_damage: f32,
    pub fire_rate: f32,
    pub automatic: bool,
    pub reloadable: bool,
    pub fire_mode: FireMode,
    pub reload_section: String,
    pub reload_rate: f32,
    pub slot_index: Option<usize>,
    pub state: ItemState,
}

impl Weapon {
    /// Build a weapon from its row. Rarity scales both damage values exactly once, here.
    pub fn from_row(row: &WeaponRow, rarity_multiplier: f32, rarity: ItemRarity) -> Self {
        Self {
            name: row.name.clone(),
            kind: row.kind,
            rarity,
            ammo_type: row.ammo_type,
            ammo: row.magazine_capacity,
            magazine_capacity: row.magazine_capacity,
            damage: row.damage * rarity_multiplier,
            weakspot_damage: row.weakspot_damage * rarity_multiplier,
            accuracy: row.accuracy.clamp(0.0, 100.0),
            stability: row.stability.clamp(0.0, 100.0),
            balance_damage: row.balance_damage,
            fire_rate: row.fire_rate,
            automatic: row.automatic,
            reloadable: row.reloadable,
            fire_mode: row.fire_mode,
            reload_section: row.reload_section.clone(),
            reload_rate: row.reload_rate,
            slot_index: None,
            state: ItemState::Pickup,
        }
    }

    pub fn with_ammo(mut self, ammo: u32) -> Self {
        self.ammo = ammo.min(self.magazine_capacity);
        self
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn magazine_capacity(&self) -> u32 {
        self.magazine_capacity
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo > 0
    }

    pub fn is_full(&self) -> bool {
        self.ammo >= self.magazine_capacity
    }

    /// Rounds that fit before the magazine is full.
    pub fn room(&self) -> u32 {
        self.magazine_capacity - self.ammo
    }

    /// Seconds between shots.
    pub fn fire_interval(&self) -> f32 {
        1.0 / self.fire_rate.max(f32::EPSILON)
    }

    /// Spend one round; an empty magazine stays at zero.
    pub fn consume_ammo(&mut self) {
        self.ammo = self.ammo.saturating_sub(1);
    }

    /// Insert rounds into the magazine.
    ///
    /// # Panics
    /// Loading past capacity means the ammo bookkeeping is broken.
    pub fn load_rounds(&mut self, amount: u32) {
        assert!(
            amount <= self.room(),
            "attempted to load {} rounds into {} with {}/{} loaded",
            amount,
            self.name,
            self.ammo,
            self.magazine_capacity
        );
        self.ammo += amount;
    }
}
