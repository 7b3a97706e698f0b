//! Scheduled one-shot countdowns keyed by (actor, purpose).
//!
//! Reload, equip, dodge, stagger and attack cooldowns are all entries here.
//! Scheduling an existing key re-arms it; cancelling a key discards the
//! pending effect. Death calls `cancel_actor` to clear everything at once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::actors::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimerPurpose {
    // Player
    FireRate,
    Reload,
    EquipGrab,
    EquipFinish,
    Dodge,
    DodgeCooldown,
    Invulnerability,
    Stagger,
    // Enemy
    AttackCooldown,
    EnemyAction,
    // World objects
    DropSettle,
    SpawnWave,
    Expire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerKey {
    pub actor: ActorId,
    pub purpose: TimerPurpose,
}

impl TimerKey {
    pub fn new(actor: ActorId, purpose: TimerPurpose) -> Self {
        Self { actor, purpose }
    }
}

#[derive(Debug, Clone, Copy)]
struct Countdown {
    remaining: f32,
    /// Arm order, breaks ties between timers due at the same instant
    seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    entries: BTreeMap<TimerKey, Countdown>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `key` to elapse after `duration` seconds, replacing any pending entry.
    pub fn schedule(&mut self, actor: ActorId, purpose: TimerPurpose, duration: f32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            TimerKey::new(actor, purpose),
            Countdown {
                remaining: duration.max(0.0),
                seq,
            },
        );
    }

    pub fn cancel(&mut self, actor: ActorId, purpose: TimerPurpose) -> bool {
        self.entries.remove(&TimerKey::new(actor, purpose)).is_some()
    }

    /// Drop every pending timer owned by `actor`. Returns how many were cleared.
    pub fn cancel_actor(&mut self, actor: ActorId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.actor != actor);
        before - self.entries.len()
    }

    pub fn is_pending(&self, actor: ActorId, purpose: TimerPurpose) -> bool {
        self.entries.contains_key(&TimerKey::new(actor, purpose))
    }

    pub fn remaining(&self, actor: ActorId, purpose: TimerPurpose) -> Option<f32> {
        self.entries
            .get(&TimerKey::new(actor, purpose))
            .map(|c| c.remaining.max(0.0))
    }

    pub fn pending_for(&self, actor: ActorId) -> usize {
        self.entries.keys().filter(|k| k.actor == actor).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count every pending timer down by `dt`. Nothing fires here; drain with `pop_expired`.
    pub fn advance(&mut self, dt: f32) {
        for countdown in self.entries.values_mut() {
            countdown.remaining -= dt;
        }
    }

    /// Remove and return the earliest elapsed timer, if any.
    ///
    /// Callers drain this one key at a time so that an elapsed callback can
    /// still cancel another timer that elapsed in the same tick.
    pub fn pop_expired(&mut self) -> Option<TimerKey> {
        let key = self
            .entries
            .iter()
            .filter(|(_, c)| c.remaining <= 0.0)
            .min_by(|(_, a), (_, b)| {
                a.remaining
                    .total_cmp(&b.remaining)
                    .then_with(|| a.seq.cmp(&b.seq))
            })
            .map(|(k, _)| *k)?;
        self.entries.remove(&key);
        Some(key)
    }
}
