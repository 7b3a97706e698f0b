//! Outbound notifications for presentation and AI layers.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::actors::ActorId;
use crate::weapon::WeaponKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Player,
    Enemy,
    DroppedWeapon,
    Explosive,
    Projectile,
    Spawner,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// Floating damage number
    HitNumber {
        target: ActorId,
        amount: f32,
        location: Vec3,
        weakspot: bool,
    },
    Damaged {
        target: ActorId,
        amount: f32,
        instigator: Option<ActorId>,
        remaining: f32,
    },
    Death {
        actor: ActorId,
    },
    Stagger {
        actor: ActorId,
    },
    ShotFired {
        shooter: ActorId,
        ammo_left: u32,
    },
    WeaponEquipped {
        owner: ActorId,
        kind: WeaponKind,
        slot: usize,
    },
    WeaponDropped {
        owner: ActorId,
        item: ActorId,
    },
    Spawned {
        actor: ActorId,
        kind: SpawnKind,
        location: Vec3,
    },
    Exploded {
        actor: ActorId,
        location: Vec3,
        radius: f32,
    },
    Despawned {
        actor: ActorId,
    },
}

impl CombatEvent {
    /// The actor an event is chiefly about.
    pub fn subject(&self) -> ActorId {
        match self {
            CombatEvent::HitNumber { target, .. } | CombatEvent::Damaged { target, .. } => *target,
            CombatEvent::Death { actor }
            | CombatEvent::Stagger { actor }
            | CombatEvent::Spawned { actor, .. }
            | CombatEvent::Exploded { actor, .. }
            | CombatEvent::Despawned { actor } => *actor,
            CombatEvent::ShotFired { shooter, .. } => *shooter,
            CombatEvent::WeaponEquipped { owner, .. } | CombatEvent::WeaponDropped { owner, .. } => {
                *owner
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CombatEvent::HitNumber { .. } => "hit_number",
            CombatEvent::Damaged { .. } => "damaged",
            CombatEvent::Death { .. } => "death",
            CombatEvent::Stagger { .. } => "stagger",
            CombatEvent::ShotFired { .. } => "shot_fired",
            CombatEvent::WeaponEquipped { .. } => "weapon_equipped",
            CombatEvent::WeaponDropped { .. } => "weapon_dropped",
            CombatEvent::Spawned { .. } => "spawned",
            CombatEvent::Exploded { .. } => "exploded",
            CombatEvent::Despawned { .. } => "despawned",
        }
    }
}

/// Flat, serialisable form of a `CombatEvent` for foreign callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatEventMsg {
    pub kind: String,
    pub subject: u64,
    pub amount: Option<f32>,
    pub location: Option<[f32; 3]>,
    pub weakspot: Option<bool>,
    pub other: Option<u64>,
}

impl From<&CombatEvent> for CombatEventMsg {
    fn from(event: &CombatEvent) -> Self {
        let mut msg = CombatEventMsg {
            kind: event.name().to_string(),
            subject: event.subject().to_bits(),
            amount: None,
            location: None,
            weakspot: None,
            other: None,
        };
        match event {
            CombatEvent::HitNumber {
                amount,
                location,
                weakspot,
                ..
            } => {
                msg.amount = Some(*amount);
                msg.location = Some(location.to_array());
                msg.weakspot = Some(*weakspot);
            }
            CombatEvent::Damaged {
                amount, instigator, ..
            } => {
                msg.amount = Some(*amount);
                msg.other = instigator.map(ActorId::to_bits);
            }
            CombatEvent::ShotFired { ammo_left, .. } => msg.amount = Some(*ammo_left as f32),
            CombatEvent::WeaponEquipped { slot, .. } => msg.amount = Some(*slot as f32),
            CombatEvent::WeaponDropped { item, .. } => msg.other = Some(item.to_bits()),
            CombatEvent::Spawned { location, .. } => msg.location = Some(location.to_array()),
            CombatEvent::Exploded {
                location, radius, ..
            } => {
                msg.location = Some(location.to_array());
                msg.amount = Some(*radius);
            }
            CombatEvent::Death { .. } | CombatEvent::Stagger { .. } | CombatEvent::Despawned { .. } => {}
        }
        msg
    }
}
