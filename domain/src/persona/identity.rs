//! Persona identity and profile types
//!
//! The deliberating roles form a fixed, enumerated set. Behavior differences
//! between personas come from data (the charter text bound at configuration
//! time), not from distinct implementations.

use serde::{Deserialize, Serialize};

/// One of the three fixed deliberating identities (Value Object)
///
/// The `Ord` derive follows declaration order, which is also the canonical
/// panel order used for deterministic map iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaIdentity {
    /// The scientist: analytical rigor and evidence
    Melchior,
    /// The guardian: risk, safety, and long-term consequences
    Balthasar,
    /// The pragmatist: human desirability and practicality
    Casper,
}

impl PersonaIdentity {
    /// All identities in canonical panel order
    pub fn all() -> [PersonaIdentity; 3] {
        [
            PersonaIdentity::Melchior,
            PersonaIdentity::Balthasar,
            PersonaIdentity::Casper,
        ]
    }

    /// Get the lowercase string identifier for this identity
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaIdentity::Melchior => "melchior",
            PersonaIdentity::Balthasar => "balthasar",
            PersonaIdentity::Casper => "casper",
        }
    }

    /// Get the display label for this identity
    pub fn label(&self) -> &'static str {
        match self {
            PersonaIdentity::Melchior => "MELCHIOR",
            PersonaIdentity::Balthasar => "BALTHASAR",
            PersonaIdentity::Casper => "CASPER",
        }
    }

    /// Get the default charter (system instruction) for this identity
    pub fn default_charter(&self) -> &'static str {
        match self {
            PersonaIdentity::Melchior => {
                r#"You are MELCHIOR, the scientist of a three-member deliberation panel.
Evaluate the proposition with analytical rigor. Weigh evidence, identify logical
flaws, and quantify uncertainty where possible. You value correctness over
comfort and you state your confidence explicitly."#
            }
            PersonaIdentity::Balthasar => {
                r#"You are BALTHASAR, the guardian of a three-member deliberation panel.
Evaluate the proposition through risk and responsibility. Surface failure modes,
safety concerns, and long-term consequences the others may overlook. You would
rather delay a good decision than rush a harmful one."#
            }
            PersonaIdentity::Casper => {
                r#"You are CASPER, the pragmatist of a three-member deliberation panel.
Evaluate the proposition from the human perspective. Judge whether the outcome
is desirable, practical, and acceptable to the people it affects. You cut
through abstraction and ask what actually happens on the ground."#
            }
        }
    }
}

impl std::fmt::Display for PersonaIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for PersonaIdentity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "melchior" => Ok(PersonaIdentity::Melchior),
            "balthasar" => Ok(PersonaIdentity::Balthasar),
            "casper" => Ok(PersonaIdentity::Casper),
            _ => Err(format!(
                "Unknown persona: {}. Valid: melchior, balthasar, casper",
                s
            )),
        }
    }
}

/// A persona as configured for one deliberation: identity plus charter
///
/// Immutable once the engine configuration is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaProfile {
    /// The fixed identity of this persona
    pub identity: PersonaIdentity,
    /// The system instruction sent with every backend call for this persona
    pub instruction: String,
}

impl PersonaProfile {
    pub fn new(identity: PersonaIdentity, instruction: impl Into<String>) -> Self {
        Self {
            identity,
            instruction: instruction.into(),
        }
    }

    /// Create a profile using the identity's default charter
    pub fn with_default_charter(identity: PersonaIdentity) -> Self {
        Self::new(identity, identity.default_charter())
    }

    /// The default three-member panel in canonical order
    pub fn default_panel() -> Vec<PersonaProfile> {
        PersonaIdentity::all()
            .into_iter()
            .map(PersonaProfile::with_default_charter)
            .collect()
    }
}
