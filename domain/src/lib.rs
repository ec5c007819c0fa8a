//! Domain layer for magi
//!
//! This crate contains the core business logic, entities, and value objects
//! of the deliberation engine. It has no dependencies on infrastructure or
//! presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Deliberation
//!
//! A deliberation runs three fixed personas (MELCHIOR, BALTHASAR, CASPER)
//! through a staged pipeline over a single proposition:
//!
//! - **Thinking**: each persona produces an independent initial assessment
//! - **Debate**: one or more rounds in which personas respond to the shared
//!   transcript
//! - **Voting**: each persona casts a structured vote
//! - **Decision**: votes are aggregated into one deterministic verdict
//!
//! ## Ballot
//!
//! Vote aggregation is a pure function: identical vote sets always yield an
//! identical [`Verdict`], including the tie-break flag.

pub mod ballot;
pub mod core;
pub mod deliberation;
pub mod persona;
pub mod prompt;
pub mod report;

// Re-export commonly used types
pub use ballot::{
    AggregationRule, Decision, Stance, TieBreakPolicy, Verdict, Vote, aggregate,
    parse_vote_response,
};
pub use crate::core::{model::ModelSelector, proposition::Proposition};
pub use deliberation::{
    DebateRound, DeliberationResult, NO_RESPONSE_TEXT, PartialDeliberation, Phase, Transcript,
    Utterance,
};
pub use persona::{PersonaIdentity, PersonaProfile};
pub use prompt::PromptTemplate;
