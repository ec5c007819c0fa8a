//! Transcript types for the debate history
//!
//! The transcript is the shared context of a deliberation: an append-only
//! sequence of utterances. It is mutated exclusively by the engine between
//! phase boundaries; personas only ever see a rendered read-only snapshot.

use super::phase::Phase;
use crate::persona::PersonaIdentity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder text recorded when a persona produced no output for a phase
pub const NO_RESPONSE_TEXT: &str = "No response produced.";

/// A single contribution to the transcript
///
/// Immutable once appended. `round` is 1-indexed for debate utterances and
/// 0 for the thinking phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// The persona that produced this utterance
    pub author: PersonaIdentity,
    /// The phase it was produced in
    pub phase: Phase,
    /// Debate round index (0 outside the debate phase)
    pub round: usize,
    /// The utterance content
    pub text: String,
    /// Timestamp of creation (milliseconds since epoch)
    pub timestamp: u64,
}

impl Utterance {
    pub fn new(
        author: PersonaIdentity,
        phase: Phase,
        round: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            author,
            phase,
            round,
            text: text.into(),
            timestamp: current_timestamp(),
        }
    }

    /// Create the placeholder utterance recorded for a failed persona
    pub fn placeholder(author: PersonaIdentity, phase: Phase, round: usize) -> Self {
        Self::new(author, phase, round, NO_RESPONSE_TEXT)
    }

    /// Whether this utterance is a failure placeholder
    pub fn is_placeholder(&self) -> bool {
        self.text == NO_RESPONSE_TEXT
    }

    fn heading(&self) -> String {
        match self.phase {
            Phase::Debate => format!("{} (Debate round {})", self.author.label(), self.round),
            _ => format!("{} ({})", self.author.label(), self.phase.display_name()),
        }
    }
}

/// Append-only ordered history of a deliberation
///
/// Entries are appended in persona-configuration order within each phase,
/// never in arrival order, so identical content always yields a structurally
/// identical transcript regardless of backend latency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<Utterance>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an utterance. Entries are never edited or removed afterwards.
    pub fn append(&mut self, utterance: Utterance) {
        self.entries.push(utterance);
    }

    pub fn entries(&self) -> &[Utterance] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render a read-only text snapshot for use as persona context
    pub fn render(&self) -> String {
        let mut out = String::new();
        for utterance in &self.entries {
            out.push_str(&format!("### {}\n{}\n\n", utterance.heading(), utterance.text));
        }
        out
    }
}

/// All utterances of one settled debate round, keyed by persona
///
/// Contains exactly one entry per configured persona; failed personas are
/// represented by placeholder utterances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateRound {
    /// Round number (1-indexed)
    pub round_number: usize,
    /// One utterance per persona
    pub outputs: BTreeMap<PersonaIdentity, Utterance>,
}

impl DebateRound {
    pub fn new(round_number: usize, outputs: BTreeMap<PersonaIdentity, Utterance>) -> Self {
        Self {
            round_number,
            outputs,
        }
    }

    pub fn output(&self, identity: PersonaIdentity) -> Option<&Utterance> {
        self.outputs.get(&identity)
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
