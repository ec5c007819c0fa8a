//! Deliberation result types
//!
//! [`DeliberationResult`] is the single outward-facing output of a completed
//! deliberation. It is built once, after the Decision phase, and never
//! mutated afterwards. [`PartialDeliberation`] carries the fully-settled
//! phases of a cancelled run.

use super::transcript::{DebateRound, Utterance};
use crate::ballot::{Decision, Vote};
use crate::persona::PersonaIdentity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete, immutable result of one deliberation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliberationResult {
    /// The proposition that was deliberated
    pub proposition: String,
    /// Thinking phase output, one utterance per persona
    pub thinking: BTreeMap<PersonaIdentity, Utterance>,
    /// Settled debate rounds in order
    pub debate: Vec<DebateRound>,
    /// Exactly one vote per configured persona (failures become Abstain)
    pub votes: BTreeMap<PersonaIdentity, Vote>,
    /// The aggregated final decision
    pub decision: Decision,
    /// Whether the decision required the tie-break policy
    pub tie_broken: bool,
    /// Conditions attached by conditional votes, in persona order
    pub conditions: Vec<String>,
}

impl DeliberationResult {
    pub fn new(
        proposition: impl Into<String>,
        thinking: BTreeMap<PersonaIdentity, Utterance>,
        debate: Vec<DebateRound>,
        votes: BTreeMap<PersonaIdentity, Vote>,
        decision: Decision,
        tie_broken: bool,
        conditions: Vec<String>,
    ) -> Self {
        Self {
            proposition: proposition.into(),
            thinking,
            debate,
            votes,
            decision,
            tie_broken,
            conditions,
        }
    }

    /// Get a persona's vote
    pub fn vote(&self, identity: PersonaIdentity) -> Option<&Vote> {
        self.votes.get(&identity)
    }

    /// Number of debate rounds that were run
    pub fn round_count(&self) -> usize {
        self.debate.len()
    }

    /// Whether any persona failed to produce output at some point
    pub fn is_degraded(&self) -> bool {
        self.thinking.values().any(|u| u.is_placeholder())
            || self
                .debate
                .iter()
                .any(|r| r.outputs.values().any(|u| u.is_placeholder()))
    }
}

/// The fully-settled phases of a cancelled deliberation
///
/// Contains nothing for the phase that was interrupted: a run cancelled
/// during debate round r carries rounds 1..r only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialDeliberation {
    /// The proposition that was being deliberated
    pub proposition: String,
    /// Thinking output, present only if the Thinking phase fully settled
    pub thinking: Option<BTreeMap<PersonaIdentity, Utterance>>,
    /// Debate rounds that fully settled before cancellation
    pub debate: Vec<DebateRound>,
}

impl PartialDeliberation {
    pub fn new(
        proposition: impl Into<String>,
        thinking: Option<BTreeMap<PersonaIdentity, Utterance>>,
        debate: Vec<DebateRound>,
    ) -> Self {
        Self {
            proposition: proposition.into(),
            thinking,
            debate,
        }
    }

    /// Number of debate rounds that settled before cancellation
    pub fn settled_rounds(&self) -> usize {
        self.debate.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliberation::Phase;

    #[test]
    fn test_degraded_detection() {
        let mut thinking = BTreeMap::new();
        thinking.insert(
            PersonaIdentity::Melchior,
            Utterance::new(PersonaIdentity::Melchior, Phase::Thinking, 0, "ok"),
        );
        thinking.insert(
            PersonaIdentity::Balthasar,
            Utterance::placeholder(PersonaIdentity::Balthasar, Phase::Thinking, 0),
        );

        let result = DeliberationResult::new(
            "prop",
            thinking,
            vec![],
            BTreeMap::new(),
            Decision::Denied,
            false,
            vec![],
        );
        assert!(result.is_degraded());
    }

    #[test]
    fn test_partial_settled_rounds() {
        let partial = PartialDeliberation::new("prop", None, vec![]);
        assert_eq!(partial.settled_rounds(), 0);
        assert!(partial.thinking.is_none());
    }
}
