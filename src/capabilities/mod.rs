//! Capabilities the combat core consumes from the hosting engine.
//!
//! The core never renders, plays sound or runs physics. It asks a
//! `RayTracer` where a shot lands and tells a `Presentation` which
//! montage sections to play, what to attach where, and where to spawn
//! particles. Both have cheap in-crate implementations for headless use.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::actors::ActorId;

/// Outcome of one line trace. Transient, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    pub actor: Option<ActorId>,
    pub bone: Option<String>,
    pub location: Vec3,
    pub blocking: bool,
    pub distance: f32,
}

impl HitResult {
    pub fn on_actor(actor: ActorId, bone: impl Into<String>, location: Vec3) -> Self {
        Self {
            actor: Some(actor),
            bone: Some(bone.into()),
            location,
            blocking: true,
            distance: 0.0,
        }
    }

    /// Static geometry hit: blocks the shot but belongs to no actor.
    pub fn world(location: Vec3) -> Self {
        Self {
            actor: None,
            bone: None,
            location,
            blocking: true,
            distance: 0.0,
        }
    }
}

pub trait RayTracer {
    /// First blocking hit along `direction` (normalized by the caller) within `max_distance`.
    fn trace_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<HitResult>;
}

/// Animation montages the core can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Montage {
    HipFire,
    AimFire,
    Reload,
    Equip,
    Dodge,
    HitReact,
    Death,
    EnemyAttack,
    EnemyHit,
    EnemyStagger,
    EnemyDeath,
    EnemyRoar,
    EnemyDodge,
    EnemyTaunt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationCue {
    pub montage: Montage,
    pub section: String,
    pub rate: f32,
}

impl AnimationCue {
    pub fn new(montage: Montage, section: impl Into<String>, rate: f32) -> Self {
        Self {
            montage,
            section: section.into(),
            rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Impact,
    Blood,
    Muzzle,
    Explosion,
}

/// Presentation hooks. All default to no-ops so hosts implement only what they render.
pub trait Presentation {
    fn play_animation(&mut self, _actor: ActorId, _cue: &AnimationCue) {}
    fn attach_actor(&mut self, _owner: ActorId, _socket: &str) {}
    fn spawn_particles_at(&mut self, _location: Vec3, _kind: ParticleKind) {}
}

/// Discards every presentation call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresentation;

impl Presentation for NullPresentation {}

/// Records presentation calls; handy for hosts that batch them and for tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresentation {
    pub animations: Vec<(ActorId, AnimationCue)>,
    pub attachments: Vec<(ActorId, String)>,
    pub particles: Vec<(Vec3, ParticleKind)>,
}

impl RecordingPresentation {
    pub fn sections_for(&self, actor: ActorId) -> Vec<&str> {
        self.animations
            .iter()
            .filter(|(a, _)| *a == actor)
            .map(|(_, cue)| cue.section.as_str())
            .collect()
    }

    /// Hand over everything recorded so far and start empty.
    pub fn drain(&mut self) -> RecordingPresentation {
        std::mem::take(self)
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty() && self.attachments.is_empty() && self.particles.is_empty()
    }
}

impl Presentation for RecordingPresentation {
    fn play_animation(&mut self, actor: ActorId, cue: &AnimationCue) {
        self.animations.push((actor, cue.clone()));
    }

    fn attach_actor(&mut self, owner: ActorId, socket: &str) {
        self.attachments.push((owner, socket.to_string()));
    }

    fn spawn_particles_at(&mut self, location: Vec3, kind: ParticleKind) {
        self.particles.push((location, kind));
    }
}

/// Tracer that never hits anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyTracer;

impl RayTracer for EmptyTracer {
    fn trace_ray(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<HitResult> {
        None
    }
}

/// A sphere attached to an actor bone.
#[derive(Debug, Clone, PartialEq)]
pub struct HitVolume {
    pub actor: ActorId,
    pub bone: String,
    pub center: Vec3,
    pub radius: f32,
}

/// Ray tracer over a flat list of bone spheres.
#[derive(Debug, Default, Clone)]
pub struct SphereTracer {
    volumes: Vec<HitVolume>,
}

impl SphereTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, actor: ActorId, bone: impl Into<String>, center: Vec3, radius: f32) {
        self.volumes.push(HitVolume {
            actor,
            bone: bone.into(),
            center,
            radius,
        });
    }

    pub fn remove_actor(&mut self, actor: ActorId) {
        self.volumes.retain(|v| v.actor != actor);
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}

fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let near = -b - root;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + root;
    (far >= 0.0).then_some(far)
}

impl RayTracer for SphereTracer {
    fn trace_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<HitResult> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        self.volumes
            .iter()
            .filter_map(|v| ray_sphere(origin, dir, v.center, v.radius).map(|t| (t, v)))
            .filter(|(t, _)| *t <= max_distance)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(t, v)| HitResult {
                actor: Some(v.actor),
                bone: Some(v.bone.clone()),
                location: origin + dir * t,
                blocking: true,
                distance: t,
            })
    }
}
