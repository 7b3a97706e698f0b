//! Health pool shared by players and enemies.
//!
//! Regeneration waits out a cooldown after every hit; the cooldown is owned
//! by the pool itself and ticked alongside it. Death is terminal.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct HealthPool {
    current: f32,
    max: f32,
    pub regen_rate: f32,
    pub regen_cooldown: f32,
    pub regen_enabled: bool,
    /// Seconds left before regen may resume
    cooldown_remaining: f32,
    dead: bool,
}

impl HealthPool {
    /// A pool without regeneration (enemy default).
    pub fn new(max: f32) -> Self {
        let max = max.max(f32::EPSILON);
        Self {
            current: max,
            max,
            regen_rate: 0.0,
            regen_cooldown: DEFAULT_HEALTH_REGEN_COOLDOWN,
            regen_enabled: false,
            cooldown_remaining: 0.0,
            dead: false,
        }
    }

    pub fn with_regen(mut self, rate: f32, cooldown: f32) -> Self {
        self.regen_rate = rate.max(0.0);
        self.regen_cooldown = cooldown.max(0.0);
        self.regen_enabled = true;
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn fraction(&self) -> f32 {
        self.current / self.max
    }

    /// True if regen is blocked by a recent hit.
    pub fn regen_suppressed(&self) -> bool {
        self.cooldown_remaining > 0.0
    }

    /// Apply `amount` of damage, clamped at zero. Returns the health actually removed.
    ///
    /// A dead pool ignores further damage. Reaching zero marks death and drops
    /// the pending regen cooldown; any other hit re-arms the cooldown.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        if self.dead || amount <= 0.0 || amount.is_nan() {
            return 0.0;
        }
        let before = self.current;
        if self.current - amount <= 0.0 {
            self.current = 0.0;
            self.dead = true;
            self.cooldown_remaining = 0.0;
        } else {
            self.current -= amount;
            self.cooldown_remaining = self.regen_cooldown;
        }
        before - self.current
    }

    pub fn tick(&mut self, dt: f32) {
        if self.dead {
            return;
        }
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
            return;
        }
        if self.regen_enabled && self.current < self.max {
            self.current = (self.current + self.regen_rate * dt).min(self.max);
        }
    }
}

impl Default for HealthPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEALTH)
    }
}
