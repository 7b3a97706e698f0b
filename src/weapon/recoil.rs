use rand::Rng;
use serde::{Deserialize, Serialize};

use super::spread::interp_to;
use crate::constants::*;

/// Camera kick from firing, decaying back to rest over subsequent ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recoil {
    pub amount: f32,
    pub camera_speed: f32,
    vertical: f32,
    horizontal: f32,
    vertical_recovery: f32,
    horizontal_recovery: f32,
}

impl Default for Recoil {
    fn default() -> Self {
        Self::new(RECOIL_AMOUNT, RECOIL_CAMERA_SPEED)
    }
}

impl Recoil {
    pub fn new(amount: f32, camera_speed: f32) -> Self {
        Self {
            amount,
            camera_speed,
            vertical: 0.0,
            horizontal: 0.0,
            vertical_recovery: 0.0,
            horizontal_recovery: 0.0,
        }
    }

    /// Kick for one shot. `stability` is the weapon's 0-100 stat.
    pub fn trigger<R: Rng>(&mut self, stability: f32, aiming: bool, rng: &mut R) {
        let factor = (100.0 - stability.clamp(0.0, 100.0)) / 100.0;
        let quarter = self.amount / 4.0;
        let sway = if quarter > 0.0 {
            rng.gen_range(-quarter..=quarter)
        } else {
            0.0
        };
        if aiming {
            self.vertical = -self.amount * factor;
            self.horizontal = sway * factor;
        } else {
            self.vertical = -self.amount * factor * HIP_VERTICAL_RECOIL_MULT;
            self.horizontal = sway * factor * HIP_HORIZONTAL_RECOIL_MULT;
        }
    }

    pub fn kick(&self) -> (f32, f32) {
        (self.vertical, self.horizontal)
    }

    pub fn is_settled(&self) -> bool {
        self.vertical == 0.0 && self.horizontal == 0.0
    }

    /// Decay the kick and return the (pitch, yaw) offset to apply this tick.
    pub fn tick(&mut self, dt: f32) -> (f32, f32) {
        if self.is_settled() {
            return (0.0, 0.0);
        }
        let recovery_speed = self.camera_speed * 2.0;
        self.vertical = interp_to(self.vertical, 0.0, dt, self.camera_speed);
        self.vertical_recovery =
            interp_to(self.vertical_recovery, -self.vertical, dt, recovery_speed);
        self.horizontal = interp_to(self.horizontal, 0.0, dt, self.camera_speed);
        self.horizontal_recovery =
            interp_to(self.horizontal_recovery, -self.horizontal, dt, recovery_speed);
        (
            self.vertical + self.vertical_recovery,
            self.horizontal + self.horizontal_recovery,
        )
    }
}
