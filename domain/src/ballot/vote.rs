//! Vote types
//!
//! This module defines the core voting primitives of the Decision phase.

use crate::persona::PersonaIdentity;
use serde::{Deserialize, Serialize};

/// Stance taken by one persona in the Voting phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    /// In favor of the proposition
    Approve,
    /// Against the proposition
    Deny,
    /// In favor only if the attached conditions are met
    Conditional,
    /// No position; also recorded for personas that failed to vote
    Abstain,
}

impl Stance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Approve => "approve",
            Stance::Deny => "deny",
            Stance::Conditional => "conditional",
            Stance::Abstain => "abstain",
        }
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Stance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" | "approved" => Ok(Stance::Approve),
            "deny" | "denied" | "reject" | "rejected" => Ok(Stance::Deny),
            "conditional" => Ok(Stance::Conditional),
            "abstain" | "abstained" => Ok(Stance::Abstain),
            _ => Err(format!(
                "Unknown stance: {}. Valid: approve, deny, conditional, abstain",
                s
            )),
        }
    }
}

/// A single vote from one persona
///
/// Produced exactly once per persona during the Voting phase, immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// The persona that cast this vote
    pub author: PersonaIdentity,
    /// The stance taken
    pub stance: Stance,
    /// Reasoning or feedback from this persona
    pub rationale: String,
    /// Conditions attached to a conditional vote
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
}

impl Vote {
    pub fn new(author: PersonaIdentity, stance: Stance, rationale: impl Into<String>) -> Self {
        Self {
            author,
            stance,
            rationale: rationale.into(),
            conditions: Vec::new(),
        }
    }

    /// Create an approval vote
    pub fn approve(author: PersonaIdentity, rationale: impl Into<String>) -> Self {
        Self::new(author, Stance::Approve, rationale)
    }

    /// Create a denial vote
    pub fn deny(author: PersonaIdentity, rationale: impl Into<String>) -> Self {
        Self::new(author, Stance::Deny, rationale)
    }

    /// Create a conditional vote with its conditions
    pub fn conditional(
        author: PersonaIdentity,
        rationale: impl Into<String>,
        conditions: Vec<String>,
    ) -> Self {
        Self::new(author, Stance::Conditional, rationale).with_conditions(conditions)
    }

    /// Create an abstention, also used for personas whose backend call failed
    pub fn abstain(author: PersonaIdentity, rationale: impl Into<String>) -> Self {
        Self::new(author, Stance::Abstain, rationale)
    }

    /// Attach conditions to the vote
    pub fn with_conditions(mut self, conditions: Vec<String>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn is_abstain(&self) -> bool {
        self.stance == Stance::Abstain
    }
}
