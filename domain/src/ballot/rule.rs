//! Aggregation rules and tie-break policies
//!
//! These determine how a vote set becomes a decision. Both are declared in
//! the engine configuration and never chosen implicitly at decision time.

use crate::persona::PersonaIdentity;
use serde::{Deserialize, Serialize};

/// Rule for turning the vote tally into a leaning
///
/// - `Majority`: strictly more Approve than Deny wins (default)
/// - `Unanimous`: every non-abstaining vote must agree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggregationRule {
    /// Strictly more Approve than Deny among counted votes
    #[default]
    Majority,

    /// All non-abstaining personas must take the same side
    Unanimous,
}

impl AggregationRule {
    /// Get a human-readable description of this rule
    pub fn description(&self) -> &'static str {
        match self {
            AggregationRule::Majority => "majority (strictly more approvals than denials)",
            AggregationRule::Unanimous => "unanimous (all non-abstaining votes must agree)",
        }
    }
}

impl std::fmt::Display for AggregationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for AggregationRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "majority" => Ok(AggregationRule::Majority),
            "unanimous" => Ok(AggregationRule::Unanimous),
            _ => Err(format!(
                "Unknown aggregation rule: {}. Valid: majority, unanimous",
                s
            )),
        }
    }
}

/// Deterministic policy applied when the rule produces no leaning
///
/// Ties are never resolved by an implicit or random choice; the policy is
/// part of the configuration and recorded in the result via the
/// `tie_broken` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TieBreakPolicy {
    /// A tied vote denies the proposition
    #[default]
    DefaultDeny,

    /// A designated persona's own stance settles the tie
    Tiebreaker(PersonaIdentity),
}

impl TieBreakPolicy {
    /// Get a human-readable description of this policy
    pub fn description(&self) -> String {
        match self {
            TieBreakPolicy::DefaultDeny => "default deny (ties reject the proposition)".to_string(),
            TieBreakPolicy::Tiebreaker(id) => format!("tiebreaker persona ({})", id.label()),
        }
    }
}

impl std::fmt::Display for TieBreakPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for TieBreakPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deny" | "default-deny" | "default_deny" => Ok(TieBreakPolicy::DefaultDeny),
            s if s.starts_with("tiebreaker:") => {
                let identity = s
                    .split(':')
                    .nth(1)
                    .ok_or("Missing persona after tiebreaker:")?
                    .parse::<PersonaIdentity>()?;
                Ok(TieBreakPolicy::Tiebreaker(identity))
            }
            _ => Err(format!(
                "Unknown tie-break policy: {}. Valid: default-deny, tiebreaker:<persona>",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule() {
        assert_eq!(
            "majority".parse::<AggregationRule>().ok(),
            Some(AggregationRule::Majority)
        );
        assert_eq!(
            "unanimous".parse::<AggregationRule>().ok(),
            Some(AggregationRule::Unanimous)
        );
        assert!("plurality".parse::<AggregationRule>().is_err());
    }

    #[test]
    fn test_parse_tie_break() {
        assert_eq!(
            "default-deny".parse::<TieBreakPolicy>().ok(),
            Some(TieBreakPolicy::DefaultDeny)
        );
        assert_eq!(
            "tiebreaker:melchior".parse::<TieBreakPolicy>().ok(),
            Some(TieBreakPolicy::Tiebreaker(PersonaIdentity::Melchior))
        );
        assert!("tiebreaker:unknown".parse::<TieBreakPolicy>().is_err());
        assert!("coinflip".parse::<TieBreakPolicy>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(AggregationRule::default(), AggregationRule::Majority);
        assert_eq!(TieBreakPolicy::default(), TieBreakPolicy::DefaultDeny);
    }
}
