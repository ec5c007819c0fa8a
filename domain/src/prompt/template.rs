//! Prompt templates for the deliberation flow
//!
//! The persona's charter travels separately as the backend's role
//! instruction; these templates only build the per-phase user prompt.

/// Templates for generating prompts at each phase
pub struct PromptTemplate;

impl PromptTemplate {
    /// User prompt for the thinking phase
    pub fn thinking(proposition: &str) -> String {
        format!(
            r#"Proposition under deliberation:

{}

Provide your independent initial assessment of this proposition from your
role's perspective. Do not assume what the other panel members will say.
State your key arguments and concerns clearly and concisely."#,
            proposition
        )
    }

    /// User prompt for one debate round, built on the full transcript so far
    pub fn debate(proposition: &str, transcript: &str, round: usize, total_rounds: usize) -> String {
        format!(
            r#"Proposition under deliberation:

{}

Deliberation so far:

{}

This is debate round {} of {}. Respond to the other panel members'
positions: address them by name, challenge reasoning you find weak, and
concede points that have convinced you. Keep your role's perspective."#,
            proposition, transcript, round, total_rounds
        )
    }

    /// User prompt for the voting phase
    pub fn voting(proposition: &str, transcript: &str) -> String {
        format!(
            r#"Proposition under deliberation:

{}

Complete deliberation transcript:

{}

The debate is closed. Cast your final vote on the proposition.
Respond with a single JSON object in this exact format:

{{"vote": "approve" | "deny" | "conditional" | "abstain", "reason": "<one or two sentences>", "conditions": ["<required only for conditional votes>"]}}"#,
            proposition, transcript
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thinking_contains_proposition() {
        let prompt = PromptTemplate::thinking("Ship the feature?");
        assert!(prompt.contains("Ship the feature?"));
        assert!(prompt.contains("initial assessment"));
    }

    #[test]
    fn test_debate_contains_round_and_transcript() {
        let prompt = PromptTemplate::debate("Ship it?", "### MELCHIOR (Thinking)\nFine.", 2, 3);
        assert!(prompt.contains("round 2 of 3"));
        assert!(prompt.contains("MELCHIOR (Thinking)"));
    }

    #[test]
    fn test_voting_requests_json() {
        let prompt = PromptTemplate::voting("Ship it?", "transcript");
        assert!(prompt.contains(r#""vote""#));
        assert!(prompt.contains("conditional"));
    }
}
