//! Agent backend port
//!
//! The sole dependency surface of the engine: anything that can turn a role
//! instruction plus context into text. Adapters for concrete providers live
//! outside this crate; tests substitute deterministic stubs.

use async_trait::async_trait;
use magi_domain::ModelSelector;
use thiserror::Error;

/// Errors a single backend call can produce
///
/// All variants are per-call and recoverable: the engine absorbs them into
/// placeholder utterances or abstentions and never surfaces them to the
/// caller directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Backend call timed out")]
    Timeout,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid response: {0}")]
    Invalid(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Capability to produce text for a persona
///
/// Implementations must not retry internally; retry and failure policy
/// belongs to the round coordinator.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Produce free text given a role instruction and context
    async fn call(
        &self,
        role_instruction: &str,
        context: &str,
        model: &ModelSelector,
    ) -> Result<String, BackendError>;
}
