//! Non-character world actors: dropped weapons, explosives, projectiles, spawners.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::actors::ActorId;
use crate::config::{ExplosiveTuning, SpawnerTuning};
use crate::constants::*;
use crate::damage::ShotProfile;
use crate::weapon::{ItemState, Weapon};

/// A weapon lying in the world, either still falling or ready for pickup.
#[derive(Debug, Clone)]
pub struct DroppedWeapon {
    pub weapon: Weapon,
    pub position: Vec3,
}

impl DroppedWeapon {
    pub fn falling(mut weapon: Weapon, position: Vec3) -> Self {
        weapon.state = ItemState::Falling;
        weapon.slot_index = None;
        Self { weapon, position }
    }

    pub fn placed(mut weapon: Weapon, position: Vec3) -> Self {
        weapon.state = ItemState::Pickup;
        weapon.slot_index = None;
        Self { weapon, position }
    }

    pub fn can_pick_up(&self) -> bool {
        self.weapon.state == ItemState::Pickup
    }

    pub fn settle(&mut self) {
        if self.weapon.state == ItemState::Falling {
            self.weapon.state = ItemState::Pickup;
        }
    }
}

/// Barrel-style prop that detonates when shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosive {
    pub position: Vec3,
    pub base_damage: f32,
    pub radius: f32,
}

impl Explosive {
    pub fn new(tuning: &ExplosiveTuning, position: Vec3) -> Self {
        Self {
            position,
            base_damage: tuning.base_damage,
            radius: tuning.radius,
        }
    }

    pub fn inner_radius(&self) -> f32 {
        self.radius * EXPLOSIVE_INNER_FRACTION
    }

    pub fn min_damage(&self) -> f32 {
        self.base_damage * EXPLOSIVE_MIN_DAMAGE_FRACTION
    }

    /// Falloff damage for an actor `distance` away from the centre.
    pub fn damage_at(&self, distance: f32) -> f32 {
        crate::damage::radial_damage(
            self.base_damage,
            self.min_damage(),
            self.inner_radius(),
            self.radius,
            distance,
        )
    }
}

/// An arrow in flight. Moves in straight segments, one sweep per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub owner: ActorId,
    pub profile: ShotProfile,
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Projectile {
    pub fn new(owner: ActorId, profile: ShotProfile, position: Vec3, direction: Vec3) -> Self {
        Self {
            owner,
            profile,
            position,
            velocity: direction.normalize_or_zero() * PROJECTILE_SPEED,
        }
    }

    /// Segment covered this tick as (direction, length).
    pub fn sweep(&self, dt: f32) -> (Vec3, f32) {
        let step = self.velocity * dt;
        (step.normalize_or_zero(), step.length())
    }
}

/// Trigger volume that releases enemies around itself on first player overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    pub position: [f32; 3],
    pub radius: f32,
    pub count: u32,
    pub interval: f32,
    pub aggressive: bool,
    active: bool,
    spawned: u32,
    target: Option<ActorId>,
}

impl Spawner {
    pub fn new(tuning: &SpawnerTuning, position: Vec3) -> Self {
        Self {
            position: position.to_array(),
            radius: tuning.radius,
            count: tuning.count,
            interval: tuning.interval,
            aggressive: tuning.aggressive,
            active: true,
            spawned: 0,
            target: None,
        }
    }

    pub fn centre(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn target(&self) -> Option<ActorId> {
        self.target
    }

    /// First overlap disarms the trigger. Later overlaps are ignored.
    pub fn trigger(&mut self, player: ActorId) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.target = Some(player);
        true
    }

    pub fn record_spawn(&mut self) {
        self.spawned += 1;
    }

    pub fn wants_more(&self) -> bool {
        self.spawned < self.count
    }
}
