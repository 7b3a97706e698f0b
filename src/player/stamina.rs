use serde::{Deserialize, Serialize};

use crate::config::PlayerTuning;

/// Stamina for sprinting and dodging; regenerates after a cooldown since last use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaminaPool {
    current: f32,
    max: f32,
    pub regen_rate: f32,
    pub regen_cooldown: f32,
    cooldown_remaining: f32,
    pub regen_enabled: bool,
}

impl StaminaPool {
    pub fn new(max: f32, regen_rate: f32, regen_cooldown: f32) -> Self {
        Self {
            current: max,
            max,
            regen_rate,
            regen_cooldown,
            cooldown_remaining: 0.0,
            regen_enabled: true,
        }
    }

    pub fn from_tuning(t: &PlayerTuning) -> Self {
        Self::new(t.max_stamina, t.stamina_regen_rate, t.stamina_regen_cooldown)
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Spend stamina, clamped at zero, and restart the regen cooldown.
    pub fn consume(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
        self.cooldown_remaining = self.regen_cooldown;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
            return;
        }
        if self.regen_enabled && self.current < self.max {
            self.current = (self.current + self.regen_rate * dt).min(self.max);
        }
    }
}
