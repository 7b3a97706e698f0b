use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Enemy behaviour mode. One closed enum instead of separate stagger/rush flags.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum EnemyState {
    #[default]
    Unoccupied = 0,
    Attacking = 1,
    Rushing = 2,
    Staggered = 3,
    Dead = 4,
    Roaring = 5,
    Dodging = 6,
    Taunting = 7,
}

impl EnemyState {
    /// Value written to the `EnemyState` blackboard key.
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => EnemyState::Unoccupied,
            1 => EnemyState::Attacking,
            2 => EnemyState::Rushing,
            3 => EnemyState::Staggered,
            4 => EnemyState::Dead,
            5 => EnemyState::Roaring,
            6 => EnemyState::Dodging,
            7 => EnemyState::Taunting,
            _ => return None,
        })
    }

    /// Balance damage is ignored (and stagger blocked) in these states.
    pub fn blocks_stagger(self) -> bool {
        matches!(
            self,
            EnemyState::Staggered | EnemyState::Rushing | EnemyState::Roaring | EnemyState::Dead
        )
    }

    /// Short animation-bound states that end on the action timer.
    pub fn is_transient_action(self) -> bool {
        matches!(
            self,
            EnemyState::Attacking | EnemyState::Roaring | EnemyState::Dodging | EnemyState::Taunting
        )
    }
}
