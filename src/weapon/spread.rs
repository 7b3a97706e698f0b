//! Crosshair spread and per-shot scatter.

use bevy::math::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Exponential approach toward `target` that never overshoots.
pub fn interp_to(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }
    let dist = target - current;
    if dist * dist < 1e-8 {
        return target;
    }
    current + dist * (dt * speed).clamp(0.0, 1.0)
}

/// Scatter radius for one shot: `80 * (100 - accuracy) / 100`, doubled from the hip.
pub fn spread_radius(accuracy: f32, aiming: bool) -> f32 {
    let factor = (100.0 - accuracy.clamp(0.0, 100.0)) / 100.0;
    let radius = BASE_SPREAD_RADIUS * factor;
    if aiming {
        radius
    } else {
        radius * HIP_SPREAD_MULT
    }
}

/// Uniform point inside a circle of `radius`.
pub fn random_point_in_circle<R: Rng>(radius: f32, rng: &mut R) -> Vec2 {
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let r = radius * rng.gen::<f32>().sqrt();
    Vec2::new(angle.cos() * r, angle.sin() * r)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrosshairSpread {
    pub velocity_factor: f32,
    pub in_air_factor: f32,
    pub aim_factor: f32,
    pub shooting_factor: f32,
    /// Seconds left in the post-shot window
    firing_window: f32,
}

impl CrosshairSpread {
    /// Open the post-shot window that widens the crosshair.
    pub fn on_shot(&mut self) {
        self.firing_window = SHOOT_TIME_DURATION;
    }

    pub fn firing(&self) -> bool {
        self.firing_window > 0.0
    }

    pub fn update(&mut self, dt: f32, horizontal_speed: f32, falling: bool, aiming: bool) {
        self.velocity_factor = (horizontal_speed / CROSSHAIR_MAX_WALK_SPEED).clamp(0.0, 1.0);

        self.in_air_factor = if falling {
            interp_to(self.in_air_factor, 2.0, dt, 15.0)
        } else {
            interp_to(self.in_air_factor, 0.0, dt, 5.0)
        };

        let aim_target = if aiming { 0.5 } else { 0.0 };
        self.aim_factor = interp_to(self.aim_factor, aim_target, dt, 20.0);

        self.shooting_factor = if self.firing() {
            interp_to(self.shooting_factor, 0.4, dt, 30.0)
        } else {
            interp_to(self.shooting_factor, 0.0, dt, 15.0)
        };
        self.firing_window = (self.firing_window - dt).max(0.0);
    }

    pub fn multiplier(&self) -> f32 {
        CROSSHAIR_BASE + self.velocity_factor + self.in_air_factor + self.shooting_factor
            - self.aim_factor
    }
}
