//! Vote aggregation
//!
//! [`aggregate`] is the only way a vote set becomes a decision. It is a pure
//! function: identical inputs always produce identical verdicts, including
//! the tie-break flag, which is required for auditability.

use super::rule::{AggregationRule, TieBreakPolicy};
use super::vote::{Stance, Vote};
use crate::persona::PersonaIdentity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final decision on a proposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// The proposition is approved
    Approved,
    /// The proposition is denied
    Denied,
    /// The proposition is approved contingent on the attached conditions
    Conditional,
}

impl Decision {
    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Decision::Denied)
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self, Decision::Conditional)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Denied => "denied",
            Decision::Conditional => "conditional",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregated outcome of one vote set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// The final decision
    pub decision: Decision,
    /// Whether the tie-break policy had to settle the outcome
    pub tie_broken: bool,
    /// Number of Approve votes
    pub approve_count: usize,
    /// Number of Deny votes
    pub deny_count: usize,
    /// Number of Abstain votes
    pub abstain_count: usize,
    /// Conditions attached by conditional votes, in persona order
    pub conditions: Vec<String>,
}

/// Which side a rule leans toward before tie-break
enum Leaning {
    Approve,
    Deny,
}

/// Aggregate a vote set into a deterministic verdict
///
/// Conditional and Abstain votes count toward neither side of the tally.
/// A winning Approve side with conditional votes present yields
/// [`Decision::Conditional`], carrying every attached condition. When the
/// rule produces no leaning (equal tallies, all conditional, or all
/// abstaining) the configured tie-break policy settles the outcome and
/// `tie_broken` is set.
pub fn aggregate(
    votes: &BTreeMap<PersonaIdentity, Vote>,
    rule: &AggregationRule,
    tie_break: &TieBreakPolicy,
) -> Verdict {
    let approve_count = count(votes, Stance::Approve);
    let deny_count = count(votes, Stance::Deny);
    let abstain_count = count(votes, Stance::Abstain);

    // BTreeMap iteration keeps conditions in persona order
    let conditions: Vec<String> = votes
        .values()
        .flat_map(|v| v.conditions.iter().cloned())
        .collect();

    let leaning = match rule {
        AggregationRule::Majority => {
            if approve_count > deny_count {
                Some(Leaning::Approve)
            } else if deny_count > approve_count {
                Some(Leaning::Deny)
            } else {
                None
            }
        }
        AggregationRule::Unanimous => {
            let countable = votes.values().filter(|v| !v.is_abstain()).count();
            if countable > 0 && approve_count == countable {
                Some(Leaning::Approve)
            } else if countable > 0 && deny_count == countable {
                Some(Leaning::Deny)
            } else {
                None
            }
        }
    };

    let (decision, tie_broken) = match leaning {
        Some(Leaning::Approve) => (approve_decision(&conditions), false),
        Some(Leaning::Deny) => (Decision::Denied, false),
        None => (break_tie(votes, tie_break, &conditions), true),
    };

    Verdict {
        decision,
        tie_broken,
        approve_count,
        deny_count,
        abstain_count,
        conditions,
    }
}

fn count(votes: &BTreeMap<PersonaIdentity, Vote>, stance: Stance) -> usize {
    votes.values().filter(|v| v.stance == stance).count()
}

/// An approve-side win becomes Conditional when conditions are attached
fn approve_decision(conditions: &[String]) -> Decision {
    if conditions.is_empty() {
        Decision::Approved
    } else {
        Decision::Conditional
    }
}

fn break_tie(
    votes: &BTreeMap<PersonaIdentity, Vote>,
    policy: &TieBreakPolicy,
    conditions: &[String],
) -> Decision {
    match policy {
        TieBreakPolicy::DefaultDeny => Decision::Denied,
        TieBreakPolicy::Tiebreaker(identity) => {
            match votes.get(identity).map(|v| v.stance) {
                Some(Stance::Approve) => approve_decision(conditions),
                Some(Stance::Conditional) => Decision::Conditional,
                // Deny, Abstain, or no vote at all denies the proposition
                _ => Decision::Denied,
            }
        }
    }
}
