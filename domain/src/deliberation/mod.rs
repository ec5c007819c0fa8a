//! Deliberation entities: phases, transcripts, and results

pub mod phase;
pub mod result;
pub mod transcript;

pub use phase::Phase;
pub use result::{DeliberationResult, PartialDeliberation};
pub use transcript::{DebateRound, NO_RESPONSE_TEXT, Transcript, Utterance};
