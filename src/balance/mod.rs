//! Balance (poise) meter: a secondary resource whose depletion staggers the owner.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// What happens to the meter once it has triggered a stagger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BalanceResetPolicy {
    /// Refill to max as soon as the stagger triggers.
    #[default]
    Immediate,
    /// Stay at zero until the owner recovers from the stagger.
    OnRecover,
}

/// Result of one `apply_balance_damage` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceOutcome {
    /// Owner was not interruptible; nothing changed.
    Ignored,
    Reduced,
    /// Meter hit zero; the owner must enter its stagger state.
    Depleted,
}

#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct BalanceMeter {
    current: f32,
    max: f32,
    pub recovery_rate: f32,
    pub reset_policy: BalanceResetPolicy,
}

impl BalanceMeter {
    pub fn new(max: f32, recovery_rate: f32, reset_policy: BalanceResetPolicy) -> Self {
        let max = max.max(f32::EPSILON);
        Self {
            current: max,
            max,
            recovery_rate: recovery_rate.max(0.0),
            reset_policy,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// `interruptible` is false while the owner is staggered, rushing or roaring.
    pub fn apply_balance_damage(&mut self, amount: f32, interruptible: bool) -> BalanceOutcome {
        if !interruptible || amount <= 0.0 || amount.is_nan() {
            return BalanceOutcome::Ignored;
        }
        if self.current - amount <= 0.0 {
            self.current = match self.reset_policy {
                BalanceResetPolicy::Immediate => self.max,
                BalanceResetPolicy::OnRecover => 0.0,
            };
            BalanceOutcome::Depleted
        } else {
            self.current -= amount;
            BalanceOutcome::Reduced
        }
    }

    /// Called when the owner leaves its stagger state.
    pub fn on_stagger_recovered(&mut self) {
        if self.reset_policy == BalanceResetPolicy::OnRecover {
            self.current = self.max;
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if self.recovery_rate > 0.0 && self.current < self.max {
            self.current = (self.current + self.recovery_rate * dt).min(self.max);
        }
    }
}

impl Default for BalanceMeter {
    fn default() -> Self {
        Self::new(
            crate::constants::ENEMY_MAX_BALANCE,
            crate::constants::ENEMY_BALANCE_RECOVERY_RATE,
            BalanceResetPolicy::default(),
        )
    }
}
