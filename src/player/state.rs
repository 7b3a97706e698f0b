use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// The player's single active action mode.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CombatState {
    #[default]
    Unoccupied,
    FireTimerInProgress,
    Reloading,
    Equipping,
    Sprinting,
    Dodging,
    Staggered,
    Dead,
}

impl CombatState {
    /// Sprint and dodge may cut into this state.
    pub fn is_interruptible(self) -> bool {
        !matches!(
            self,
            CombatState::Dodging | CombatState::Staggered | CombatState::Dead
        )
    }

    /// Weapon switch and reload requests are accepted from here.
    pub fn allows_exchange(self) -> bool {
        matches!(
            self,
            CombatState::Unoccupied | CombatState::Reloading | CombatState::Equipping
        )
    }

    pub fn is_dead(self) -> bool {
        self == CombatState::Dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interruptible_states() {
        assert!(CombatState::Unoccupied.is_interruptible());
        assert!(CombatState::Reloading.is_interruptible());
        assert!(CombatState::Sprinting.is_interruptible());
        assert!(!CombatState::Dodging.is_interruptible());
        assert!(!CombatState::Staggered.is_interruptible());
        assert!(!CombatState::Dead.is_interruptible());
    }

    #[test]
    fn test_exchange_states() {
        assert!(CombatState::Equipping.allows_exchange());
        assert!(!CombatState::FireTimerInProgress.allows_exchange());
        assert!(!CombatState::Sprinting.allows_exchange());
        assert_eq!(CombatState::default(), CombatState::Unoccupied);
    }
}
