//! Weapon slots and carried ammo.
//!
//! Slots are fixed once filled: the weapon at index `i` keeps slot `i`
//! until it is swapped out. Exactly one slot is equipped while any weapon
//! is held. A switch is two-phase: `begin_exchange` records the pending
//! target, and `complete_exchange` performs the hand-off once the equip
//! montage reaches its grab point.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::INVENTORY_CAPACITY;
use crate::weapon::{AmmoType, ItemState, Weapon};

/// Back sockets for stowed weapons, by slot
pub const BACK_SOCKETS: [&str; 2] = ["BackSlot0", "BackSlot1"];
pub const HAND_SOCKET: &str = "RightHandSocket";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponInventory {
    slots: Vec<Weapon>,
    capacity: usize,
    equipped: Option<usize>,
    pending: Option<usize>,
}

impl Default for WeaponInventory {
    fn default() -> Self {
        Self::with_capacity(INVENTORY_CAPACITY)
    }
}

impl WeaponInventory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            equipped: None,
            pending: None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, slot: usize) -> Option<&Weapon> {
        self.slots.get(slot)
    }

    pub fn equipped_slot(&self) -> Option<usize> {
        self.equipped
    }

    pub fn pending_slot(&self) -> Option<usize> {
        self.pending
    }

    pub fn equipped(&self) -> Option<&Weapon> {
        self.equipped.and_then(|i| self.slots.get(i))
    }

    pub fn equipped_mut(&mut self) -> Option<&mut Weapon> {
        self.equipped.and_then(|i| self.slots.get_mut(i))
    }

    /// Store a weapon in the next free slot. Hands the weapon back when full.
    ///
    /// The first weapon picked up is equipped straight away.
    pub fn add_weapon(&mut self, mut weapon: Weapon) -> Result<usize, Weapon> {
        if self.is_full() {
            return Err(weapon);
        }
        let slot = self.slots.len();
        weapon.slot_index = Some(slot);
        if self.equipped.is_none() {
            weapon.state = ItemState::Equipped;
            self.equipped = Some(slot);
        } else {
            weapon.state = ItemState::PickedUp;
        }
        self.slots.push(weapon);
        Ok(slot)
    }

    /// Put `weapon` in the equipped slot and return the weapon it displaced.
    pub fn swap_equipped(&mut self, mut weapon: Weapon) -> Option<Weapon> {
        let Some(slot) = self.equipped else {
            return self.add_weapon(weapon).err();
        };
        weapon.slot_index = Some(slot);
        weapon.state = ItemState::Equipped;
        let mut old = std::mem::replace(&mut self.slots[slot], weapon);
        old.slot_index = None;
        old.state = ItemState::Falling;
        self.pending = None;
        Some(old)
    }

    /// Guard for a slot switch: different slot, in range, not already pending.
    pub fn can_exchange(&self, target: usize) -> bool {
        let Some(current) = self.equipped else {
            return false;
        };
        current != target && target < self.slots.len() && self.pending != Some(target)
    }

    pub fn begin_exchange(&mut self, target: usize) -> bool {
        if !self.can_exchange(target) {
            return false;
        }
        self.pending = Some(target);
        true
    }

    /// Hand the pending weapon over. Returns (previous slot, new slot).
    pub fn complete_exchange(&mut self) -> Option<(usize, usize)> {
        let target = self.pending.take()?;
        let previous = self.equipped?;
        if let Some(old) = self.slots.get_mut(previous) {
            old.state = ItemState::PickedUp;
        }
        if let Some(new) = self.slots.get_mut(target) {
            new.state = ItemState::Equipped;
        }
        self.equipped = Some(target);
        Some((previous, target))
    }

    pub fn cancel_exchange(&mut self) {
        self.pending = None;
    }

    /// Slot after the equipped one, wrapping around.
    pub fn next_slot(&self) -> Option<usize> {
        let current = self.equipped?;
        if self.slots.len() < 2 {
            return None;
        }
        Some((current + 1) % self.slots.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Weapon> {
        self.slots.iter()
    }
}

/// Socket a stowed weapon attaches to.
pub fn stow_socket(slot: usize) -> Option<&'static str> {
    BACK_SOCKETS.get(slot).copied()
}

/// Carried rounds by ammo type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmmoPool {
    counts: BTreeMap<AmmoType, u32>,
}

impl AmmoPool {
    pub fn from_pairs(pairs: &[(AmmoType, u32)]) -> Self {
        let mut pool = Self::default();
        for &(ammo_type, amount) in pairs {
            pool.add(ammo_type, amount);
        }
        pool
    }

    pub fn get(&self, ammo_type: AmmoType) -> u32 {
        self.counts.get(&ammo_type).copied().unwrap_or(0)
    }

    pub fn add(&mut self, ammo_type: AmmoType, amount: u32) {
        let count = self.counts.entry(ammo_type).or_insert(0);
        *count = count.saturating_add(amount);
    }

    /// Remove up to `wanted` rounds and return how many were taken.
    pub fn take(&mut self, ammo_type: AmmoType, wanted: u32) -> u32 {
        let entry = self.counts.entry(ammo_type).or_insert(0);
        let taken = wanted.min(*entry);
        *entry -= taken;
        taken
    }
}
