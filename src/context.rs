//! Mutable world services handed to an actor while it runs a transition.

use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::actors::ActorId;
use crate::capabilities::{AnimationCue, Presentation};
use crate::config::CombatConfig;
use crate::events::CombatEvent;
use crate::timers::{TimerPurpose, TimerQueue};

pub struct CombatContext<'a> {
    pub timers: &'a mut TimerQueue,
    pub rng: &'a mut Xoshiro256PlusPlus,
    pub events: &'a mut Vec<CombatEvent>,
    pub presentation: &'a mut dyn Presentation,
    pub config: &'a CombatConfig,
}

impl CombatContext<'_> {
    pub fn schedule(&mut self, actor: ActorId, purpose: TimerPurpose, seconds: f32) {
        self.timers.schedule(actor, purpose, seconds);
    }

    pub fn cancel(&mut self, actor: ActorId, purpose: TimerPurpose) {
        self.timers.cancel(actor, purpose);
    }

    pub fn play(&mut self, actor: ActorId, cue: AnimationCue) {
        self.presentation.play_animation(actor, &cue);
    }

    pub fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// True with probability `chance` (clamped to 0-1).
    pub fn roll(&mut self, chance: f32) -> bool {
        if chance <= 0.0 {
            return false;
        }
        if chance >= 1.0 {
            return true;
        }
        self.rng.gen::<f32>() < chance
    }
}

/// Owns everything a `CombatContext` borrows, for unit tests.
#[cfg(test)]
pub(crate) struct TestContext {
    pub timers: TimerQueue,
    pub rng: Xoshiro256PlusPlus,
    pub events: Vec<CombatEvent>,
    pub presentation: crate::capabilities::RecordingPresentation,
    pub config: CombatConfig,
}

#[cfg(test)]
impl TestContext {
    pub fn new() -> Self {
        use rand::SeedableRng;
        Self {
            timers: TimerQueue::new(),
            rng: Xoshiro256PlusPlus::seed_from_u64(1),
            events: Vec::new(),
            presentation: Default::default(),
            config: CombatConfig::default(),
        }
    }

    pub fn ctx(&mut self) -> CombatContext<'_> {
        CombatContext {
            timers: &mut self.timers,
            rng: &mut self.rng,
            events: &mut self.events,
            presentation: &mut self.presentation,
            config: &self.config,
        }
    }
}
