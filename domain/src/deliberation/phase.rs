//! Deliberation phase

use serde::{Deserialize, Serialize};

/// Phase of a deliberation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Independent initial assessment by each persona
    Thinking,
    /// Personas respond to the shared transcript, one or more rounds
    Debate,
    /// Each persona casts a structured vote
    Voting,
    /// Votes are aggregated into the final verdict
    Decision,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Thinking => "thinking",
            Phase::Debate => "debate",
            Phase::Voting => "voting",
            Phase::Decision => "decision",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Thinking => "Thinking",
            Phase::Debate => "Debate",
            Phase::Voting => "Voting",
            Phase::Decision => "Decision",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
