//! Key/value store read by the external behavior-tree driver.
//!
//! Each enemy owns one. The combat core writes targeting and state flags;
//! it never reads them back to make decisions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::actors::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlackboardKey {
    Target,
    InAttackRange,
    CanAttack,
    EnemyState,
    Dead,
    Staggered,
    CharacterIsDead,
}

impl BlackboardKey {
    pub fn name(self) -> &'static str {
        match self {
            BlackboardKey::Target => "Target",
            BlackboardKey::InAttackRange => "InAttackRange",
            BlackboardKey::CanAttack => "CanAttack",
            BlackboardKey::EnemyState => "EnemyState",
            BlackboardKey::Dead => "Dead",
            BlackboardKey::Staggered => "Staggered",
            BlackboardKey::CharacterIsDead => "CharacterIsDead",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlackboardValue {
    Bool(bool),
    Actor(Option<ActorId>),
    Enum(u8),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Blackboard {
    values: BTreeMap<BlackboardKey, BlackboardValue>,
}

impl Blackboard {
    pub fn set_bool(&mut self, key: BlackboardKey, value: bool) {
        self.values.insert(key, BlackboardValue::Bool(value));
    }

    pub fn set_actor(&mut self, key: BlackboardKey, value: Option<ActorId>) {
        self.values.insert(key, BlackboardValue::Actor(value));
    }

    pub fn set_enum(&mut self, key: BlackboardKey, value: u8) {
        self.values.insert(key, BlackboardValue::Enum(value));
    }

    pub fn get(&self, key: BlackboardKey) -> Option<BlackboardValue> {
        self.values.get(&key).copied()
    }

    /// Unset booleans read as false.
    pub fn get_bool(&self, key: BlackboardKey) -> bool {
        matches!(self.values.get(&key), Some(BlackboardValue::Bool(true)))
    }

    pub fn get_actor(&self, key: BlackboardKey) -> Option<ActorId> {
        match self.values.get(&key) {
            Some(BlackboardValue::Actor(actor)) => *actor,
            _ => None,
        }
    }

    pub fn get_enum(&self, key: BlackboardKey) -> Option<u8> {
        match self.values.get(&key) {
            Some(BlackboardValue::Enum(v)) => Some(*v),
            _ => None,
        }
    }
}
