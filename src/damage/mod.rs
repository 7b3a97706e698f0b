//! Damage resolution shared by hit-scan shots, projectiles and explosions.
//!
//! Resolution for one impact:
//! 1. Skip targets that cannot take damage (dead, invulnerable, not damageable).
//! 2. Weak-spot check: the impact bone equals the target's weak-spot bone.
//! 3. Apply base or weak-spot damage (already rarity-scaled on the weapon).
//! 4. Report the hit number.
//! 5. If the target survived, apply balance damage.
//!
//! The target's own reaction (death, stagger) is left to its state machine.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::actors::ActorId;
use crate::balance::BalanceOutcome;
use crate::weapon::Weapon;

/// How an actor responds to being struck by a bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletHitKind {
    /// Runs full damage resolution
    Enemy,
    /// Detonates
    Explosive,
    /// Impact particles only
    Generic,
}

/// The damage numbers a shot carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotProfile {
    pub damage: f32,
    pub weakspot_damage: f32,
    pub balance_damage: f32,
}

impl From<&Weapon> for ShotProfile {
    fn from(weapon: &Weapon) -> Self {
        Self {
            damage: weapon.damage,
            weakspot_damage: weapon.weakspot_damage,
            balance_damage: weapon.balance_damage,
        }
    }
}

/// Damage one impact would deal, before it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitCalculation {
    pub amount: f32,
    pub weakspot: bool,
}

/// Weak-spot detection is a plain bone-name comparison.
pub fn calculate_hit(profile: &ShotProfile, bone: Option<&str>, weakspot_bone: &str) -> HitCalculation {
    let weakspot = bone.is_some_and(|b| !weakspot_bone.is_empty() && b == weakspot_bone);
    HitCalculation {
        amount: if weakspot {
            profile.weakspot_damage
        } else {
            profile.damage
        },
        weakspot,
    }
}

/// What a damageable actor reports back after a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageTaken {
    pub applied: f32,
    pub killed: bool,
}

/// Anything with a health pool that shots can resolve against.
pub trait Damageable {
    fn weakspot_bone(&self) -> &str;
    /// False once dead or while invulnerable.
    fn can_take_damage(&self) -> bool;
    fn take_damage(&mut self, amount: f32, instigator: Option<ActorId>) -> DamageTaken;
    fn take_balance_damage(&mut self, amount: f32) -> BalanceOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedHit {
    pub amount: f32,
    pub weakspot: bool,
    pub killed: bool,
    /// `None` on a killing blow, where balance damage is skipped
    pub balance: Option<BalanceOutcome>,
    pub location: Vec3,
}

/// Resolve one impact against `target`. Returns `None` if the target ignored it.
pub fn resolve_hit<D: Damageable + ?Sized>(
    target: &mut D,
    profile: &ShotProfile,
    bone: Option<&str>,
    location: Vec3,
    instigator: Option<ActorId>,
) -> Option<ResolvedHit> {
    if !target.can_take_damage() {
        return None;
    }
    let calc = calculate_hit(profile, bone, target.weakspot_bone());
    let taken = target.take_damage(calc.amount, instigator);
    let balance = if taken.killed {
        None
    } else {
        Some(target.take_balance_damage(profile.balance_damage))
    };
    tracing::debug!(
        amount = calc.amount,
        weakspot = calc.weakspot,
        killed = taken.killed,
        "resolved hit"
    );
    Some(ResolvedHit {
        amount: calc.amount,
        weakspot: calc.weakspot,
        killed: taken.killed,
        balance,
        location,
    })
}

/// Radial damage with linear falloff: full inside `inner`, `min_damage` at `outer`, none past it.
pub fn radial_damage(base: f32, min_damage: f32, inner: f32, outer: f32, distance: f32) -> f32 {
    if distance > outer {
        return 0.0;
    }
    if distance <= inner || outer <= inner {
        return base;
    }
    let t = (distance - inner) / (outer - inner);
    base + (min_damage - base) * t
}
