//! Vote response parsing
//!
//! Extracts a structured [`Vote`] from a persona's free-form voting
//! response. Pure domain logic: no I/O, just text pattern matching.
//!
//! Two formats are supported, tried in order:
//!
//! 1. **JSON** (preferred): `{"vote": "approve", "reason": "...", "conditions": [...]}`
//! 2. **Keywords**: APPROVE / DENY / REJECT / CONDITIONAL / ABSTAIN in the text
//!
//! An ambiguous response falls back to Abstain, so a persona that fails to
//! state a position never sways the tally.

use super::vote::{Stance, Vote};
use crate::persona::PersonaIdentity;

/// Parse a voting response into a vote
///
/// Never fails: unparseable responses become abstentions with the full
/// response kept as rationale. An Approve carrying conditions is promoted
/// to Conditional, since the approval is contingent on them.
pub fn parse_vote_response(author: PersonaIdentity, response: &str) -> Vote {
    let (stance, rationale, conditions) =
        parse_json_vote(response).unwrap_or_else(|| parse_keyword_vote(response));

    let (stance, conditions) = match stance {
        Stance::Approve if !conditions.is_empty() => (Stance::Conditional, conditions),
        Stance::Conditional => (Stance::Conditional, conditions),
        // Conditions only make sense on a conditional vote
        other => (other, Vec::new()),
    };

    Vote::new(author, stance, rationale).with_conditions(conditions)
}

/// Try to extract a JSON vote object embedded anywhere in the response
fn parse_json_vote(response: &str) -> Option<(Stance, String, Vec<String>)> {
    let start = response.find('{')?;
    let end = response[start..].rfind('}')?;
    let json_str = &response[start..start + end + 1];

    let parsed: serde_json::Value = serde_json::from_str(json_str).ok()?;
    let stance_str = parsed
        .get("vote")
        .or_else(|| parsed.get("stance"))
        .and_then(|v| v.as_str())?;
    let stance = stance_str.parse::<Stance>().ok()?;

    let rationale = parsed
        .get("reason")
        .or_else(|| parsed.get("rationale"))
        .and_then(|v| v.as_str())
        .unwrap_or(response)
        .to_string();

    let conditions = parsed
        .get("conditions")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|c| c.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some((stance, rationale, conditions))
}

/// Keyword fallback for responses that ignored the JSON format
///
/// Conservative: explicit rejection keywords or negated approval win over
/// an APPROVE mention, and anything ambiguous abstains.
fn parse_keyword_vote(response: &str) -> (Stance, String, Vec<String>) {
    let upper = response.to_uppercase();

    let negated_approve = upper.contains("NOT APPROVE")
        || upper.contains("CANNOT APPROVE")
        || upper.contains("DON'T APPROVE");

    let stance = if upper.contains("ABSTAIN") {
        Stance::Abstain
    } else if upper.contains("CONDITIONAL") {
        Stance::Conditional
    } else if upper.contains("DENY") || upper.contains("REJECT") || negated_approve {
        Stance::Deny
    } else if upper.contains("APPROVE") {
        Stance::Approve
    } else {
        Stance::Abstain
    };

    // "CONDITION: ..." lines carry the conditions in plain-text votes
    let conditions: Vec<String> = response
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            let rest = trimmed
                .strip_prefix("CONDITION:")
                .or_else(|| trimmed.strip_prefix("Condition:"))?;
            let rest = rest.trim();
            (!rest.is_empty()).then(|| rest.to_string())
        })
        .collect();

    (stance, response.to_string(), conditions)
}
