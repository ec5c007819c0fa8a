//! Deliberation observer port
//!
//! Defines the interface for progressive rendering of a running
//! deliberation. Observers are informational only: the engine produces the
//! same result whether or not anyone is watching.

use magi_domain::{Phase, PersonaIdentity, Utterance, Vote};

/// Callback surface for deliberation progress
///
/// Implementations live in the presentation layer (console, web UI, ...).
/// `round` is 1-indexed for debate events and 0 elsewhere.
pub trait DeliberationObserver: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: &Phase, round: usize, total_tasks: usize);

    /// Called as each persona's call settles, in arrival order
    fn on_persona_settled(
        &self,
        phase: &Phase,
        round: usize,
        author: PersonaIdentity,
        success: bool,
    );

    /// Called once per utterance appended to the transcript, in persona order
    fn on_utterance(&self, utterance: &Utterance);

    /// Called once per recorded vote, in persona order
    fn on_vote(&self, vote: &Vote);

    /// Called when a phase has fully settled
    fn on_phase_complete(&self, phase: &Phase, round: usize);
}

/// No-op observer for when progress reporting is not needed
pub struct NoObserver;

impl DeliberationObserver for NoObserver {
    fn on_phase_start(&self, _phase: &Phase, _round: usize, _total_tasks: usize) {}
    fn on_persona_settled(
        &self,
        _phase: &Phase,
        _round: usize,
        _author: PersonaIdentity,
        _success: bool,
    ) {
    }
    fn on_utterance(&self, _utterance: &Utterance) {}
    fn on_vote(&self, _vote: &Vote) {}
    fn on_phase_complete(&self, _phase: &Phase, _round: usize) {}
}
