//! Engine configuration
//!
//! [`EngineConfig`] carries everything one deliberation needs besides the
//! proposition itself. It is validated when the engine is constructed and
//! immutable afterwards; invalid values are rejected, never clamped.

use magi_domain::{AggregationRule, ModelSelector, PersonaProfile, TieBreakPolicy};
use std::time::Duration;
use thiserror::Error;

/// Minimum number of debate rounds
pub const MIN_ROUNDS: usize = 1;
/// Maximum number of debate rounds
pub const MAX_ROUNDS: usize = 5;

/// Errors found while validating a configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("round_count must be between {MIN_ROUNDS} and {MAX_ROUNDS}, got {0}")]
    InvalidRoundCount(usize),

    #[error("persona set is empty")]
    EmptyPersonaSet,

    #[error("duplicate persona in set: {0}")]
    DuplicatePersona(magi_domain::PersonaIdentity),

    #[error("per_call_timeout must be non-zero")]
    ZeroCallTimeout,

    #[error("tiebreaker persona {0} is not in the persona set")]
    UnknownTiebreaker(magi_domain::PersonaIdentity),
}

/// Configuration for one deliberation
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of debate rounds (1 to 5)
    pub round_count: usize,
    /// Deadline for each individual backend call
    pub per_call_timeout: Duration,
    /// Optional aggregate deadline for a whole phase
    pub phase_timeout: Option<Duration>,
    /// The persona panel, in the order utterances are appended
    pub personas: Vec<PersonaProfile>,
    /// Model passed through to the backend for every call
    pub model: ModelSelector,
    /// Rule turning the vote tally into a leaning
    pub rule: AggregationRule,
    /// Deterministic policy for tied votes
    pub tie_break: TieBreakPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            round_count: 3,
            per_call_timeout: Duration::from_secs(60),
            phase_timeout: None,
            personas: PersonaProfile::default_panel(),
            model: ModelSelector::default(),
            rule: AggregationRule::default(),
            tie_break: TieBreakPolicy::default(),
        }
    }
}

impl EngineConfig {
    // ==================== Builder Methods ====================

    pub fn with_round_count(mut self, rounds: usize) -> Self {
        self.round_count = rounds;
        self
    }

    pub fn with_per_call_timeout(mut self, timeout: Duration) -> Self {
        self.per_call_timeout = timeout;
        self
    }

    pub fn with_phase_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.phase_timeout = timeout;
        self
    }

    pub fn with_personas(mut self, personas: Vec<PersonaProfile>) -> Self {
        self.personas = personas;
        self
    }

    pub fn with_model(mut self, model: ModelSelector) -> Self {
        self.model = model;
        self
    }

    pub fn with_rule(mut self, rule: AggregationRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreakPolicy) -> Self {
        self.tie_break = tie_break;
        self
    }

    // ==================== Validation ====================

    /// Validate the configuration
    ///
    /// Called by the engine constructor; execution never starts with an
    /// invalid configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&self.round_count) {
            return Err(ConfigError::InvalidRoundCount(self.round_count));
        }
        if self.personas.is_empty() {
            return Err(ConfigError::EmptyPersonaSet);
        }
        if self.per_call_timeout.is_zero() {
            return Err(ConfigError::ZeroCallTimeout);
        }

        let mut seen = std::collections::BTreeSet::new();
        for profile in &self.personas {
            if !seen.insert(profile.identity) {
                return Err(ConfigError::DuplicatePersona(profile.identity));
            }
        }

        if let TieBreakPolicy::Tiebreaker(identity) = self.tie_break
            && !seen.contains(&identity)
        {
            return Err(ConfigError::UnknownTiebreaker(identity));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magi_domain::PersonaIdentity;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.round_count, 3);
        assert_eq!(config.personas.len(), 3);
    }

    #[test]
    fn test_round_count_bounds() {
        assert_eq!(
            EngineConfig::default().with_round_count(0).validate(),
            Err(ConfigError::InvalidRoundCount(0))
        );
        assert_eq!(
            EngineConfig::default().with_round_count(6).validate(),
            Err(ConfigError::InvalidRoundCount(6))
        );
        assert!(EngineConfig::default().with_round_count(5).validate().is_ok());
        assert!(EngineConfig::default().with_round_count(1).validate().is_ok());
    }

    #[test]
    fn test_empty_persona_set_rejected() {
        let config = EngineConfig::default().with_personas(vec![]);
        assert_eq!(config.validate(), Err(ConfigError::EmptyPersonaSet));
    }

    #[test]
    fn test_duplicate_persona_rejected() {
        let config = EngineConfig::default().with_personas(vec![
            PersonaProfile::with_default_charter(PersonaIdentity::Melchior),
            PersonaProfile::with_default_charter(PersonaIdentity::Melchior),
        ]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicatePersona(PersonaIdentity::Melchior))
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = EngineConfig::default().with_per_call_timeout(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroCallTimeout));
    }

    #[test]
    fn test_tiebreaker_must_be_in_panel() {
        let config = EngineConfig::default()
            .with_personas(vec![PersonaProfile::with_default_charter(
                PersonaIdentity::Melchior,
            )])
            .with_tie_break(TieBreakPolicy::Tiebreaker(PersonaIdentity::Casper));
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownTiebreaker(PersonaIdentity::Casper))
        );
    }
}
