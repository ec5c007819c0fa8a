//! Application layer for magi
//!
//! This crate orchestrates the deliberation protocol on top of the domain
//! layer. It defines the ports the engine consumes ([`AgentBackend`]) and
//! exposes ([`DeliberationObserver`]), the validated [`EngineConfig`], and
//! the [`ConsensusEngine`] facade that runs one deliberation end to end.
//!
//! # Architecture
//!
//! ```text
//! ConsensusEngine (facade, owns config)
//!   └── deliberation state machine (owns the transcript)
//!         └── RoundCoordinator (fan-out/fan-in per phase)
//!               └── Persona ──> AgentBackend (port)
//! ```

pub mod config;
pub mod engine;
pub mod ports;

pub use config::{EngineConfig, ConfigError, MAX_ROUNDS, MIN_ROUNDS};
pub use engine::{ConsensusEngine, EngineError, Persona};
pub use ports::agent_backend::{AgentBackend, BackendError};
pub use ports::observer::{DeliberationObserver, NoObserver};
