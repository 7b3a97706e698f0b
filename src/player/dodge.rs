//! Eight-way dodge direction from the last movement input.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DodgeDirection {
    Forward,
    ForwardRight,
    Right,
    BackRight,
    Backward,
    BackLeft,
    Left,
    ForwardLeft,
}

/// Round one input axis to -1, 0 or 1.
pub fn round_axis(value: f32) -> i32 {
    (value.round() as i32).clamp(-1, 1)
}

/// Compass angle in degrees for rounded (x, y) input. No input has no angle.
pub fn compass_angle(x: i32, y: i32) -> Option<u32> {
    match (y, x) {
        (1, 1) => Some(45),
        (1, 0) => Some(0),
        (1, -1) => Some(315),
        (0, 1) => Some(90),
        (0, -1) => Some(270),
        (-1, 1) => Some(135),
        (-1, 0) => Some(180),
        (-1, -1) => Some(225),
        _ => None,
    }
}

impl DodgeDirection {
    pub fn from_angle(angle: Option<u32>) -> Self {
        match angle {
            Some(0) => DodgeDirection::Forward,
            Some(45) => DodgeDirection::ForwardRight,
            Some(90) => DodgeDirection::Right,
            Some(135) => DodgeDirection::BackRight,
            Some(225) => DodgeDirection::BackLeft,
            Some(270) => DodgeDirection::Left,
            Some(315) => DodgeDirection::ForwardLeft,
            // 180 and no input both roll backwards
            _ => DodgeDirection::Backward,
        }
    }

    pub fn from_input(input: Vec2) -> Self {
        Self::from_angle(compass_angle(round_axis(input.x), round_axis(input.y)))
    }

    pub fn section(self) -> &'static str {
        match self {
            DodgeDirection::Forward => "DodgeForward",
            DodgeDirection::ForwardRight => "DodgeFR",
            DodgeDirection::Right => "DodgeRight",
            DodgeDirection::BackRight => "DodgeBR",
            DodgeDirection::Backward => "DodgeBackward",
            DodgeDirection::BackLeft => "DodgeBL",
            DodgeDirection::Left => "DodgeLeft",
            DodgeDirection::ForwardLeft => "DodgeFL",
        }
    }
}
