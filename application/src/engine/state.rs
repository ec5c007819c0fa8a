//! Deliberation state machine states and transitions
//!
//! Transitions depend only on the settled phase's live-persona count, so
//! they are pure and testable without a runtime. `Failed` is reachable from
//! every running state on total-quorum loss.

/// State of one deliberation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EngineState {
    /// Not yet started
    Idle,
    /// Running the Thinking phase
    Thinking,
    /// Running debate round n (1-indexed)
    Debating(usize),
    /// Running the Voting phase
    Voting,
    /// Votes settled, ready to aggregate
    Decided,
    /// Every persona failed in a single phase
    Failed,
}

impl EngineState {
    /// After the Thinking phase settled with `live` successful personas
    ///
    /// Quorum is one live voice; a fully failed panel is fatal.
    pub(crate) fn after_thinking(live: usize) -> Self {
        if live == 0 {
            EngineState::Failed
        } else {
            EngineState::Debating(1)
        }
    }

    /// After debate round `round` of `total_rounds` settled with `live` successes
    pub(crate) fn after_debate(round: usize, total_rounds: usize, live: usize) -> Self {
        if live == 0 {
            EngineState::Failed
        } else if round < total_rounds {
            EngineState::Debating(round + 1)
        } else {
            EngineState::Voting
        }
    }

    /// After the Voting phase settled with `live` successful personas
    pub(crate) fn after_voting(live: usize) -> Self {
        if live == 0 {
            EngineState::Failed
        } else {
            EngineState::Decided
        }
    }
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineState::Idle => write!(f, "Idle"),
            EngineState::Thinking => write!(f, "Thinking"),
            EngineState::Debating(round) => write!(f, "Debating({})", round),
            EngineState::Voting => write!(f, "Voting"),
            EngineState::Decided => write!(f, "Decided"),
            EngineState::Failed => write!(f, "Failed"),
        }
    }
}
