//! Markdown report generation
//!
//! Renders a completed [`DeliberationResult`] into a self-contained
//! Markdown document for export or archival.

use crate::deliberation::DeliberationResult;
use chrono::{DateTime, Utc};

/// Render a Markdown report for a completed deliberation
pub fn generate_report(result: &DeliberationResult) -> String {
    render_markdown(result, Utc::now())
}

/// Render a Markdown report with an explicit generation timestamp
pub fn render_markdown(result: &DeliberationResult, generated_at: DateTime<Utc>) -> String {
    let sections = [
        "# Deliberation Report".to_string(),
        proposition_section(result),
        thinking_section(result),
        debate_section(result),
        voting_section(result),
        decision_section(result),
        footer(generated_at),
    ];
    sections.join("\n\n")
}

/// Generate a filename for the report, e.g. `magi-report-20260823-155800.md`
pub fn report_filename(timestamp: DateTime<Utc>) -> String {
    format!("magi-report-{}.md", timestamp.format("%Y%m%d-%H%M%S"))
}

fn proposition_section(result: &DeliberationResult) -> String {
    format!("## Proposition\n\n```\n{}\n```", result.proposition)
}

fn thinking_section(result: &DeliberationResult) -> String {
    let mut lines = vec!["## Thinking Phase".to_string()];
    for (identity, utterance) in &result.thinking {
        lines.push(format!("### {}", identity.label()));
        lines.push(utterance.text.clone());
    }
    lines.join("\n\n")
}

fn debate_section(result: &DeliberationResult) -> String {
    if result.debate.is_empty() {
        return "## Debate Phase\n\n*No debate rounds were produced.*".to_string();
    }

    let mut lines = vec!["## Debate Phase".to_string()];
    for round in &result.debate {
        lines.push(format!("### Round {}", round.round_number));
        for (identity, utterance) in &round.outputs {
            lines.push(format!("#### {}", identity.label()));
            lines.push(utterance.text.clone());
        }
    }
    lines.join("\n\n")
}

fn voting_section(result: &DeliberationResult) -> String {
    let mut lines = vec![
        "## Voting Phase".to_string(),
        String::new(),
        "| Persona | Vote | Reason | Conditions |".to_string(),
        "|:--------|:----:|:-------|:-----------|".to_string(),
    ];

    for (identity, vote) in &result.votes {
        lines.push(format!(
            "| {} | {} | {} | {} |",
            identity.label(),
            vote.stance.as_str().to_uppercase(),
            escape_pipes(&vote.rationale),
            escape_pipes(&vote.conditions.join(", ")),
        ));
    }

    lines.join("\n")
}

fn decision_section(result: &DeliberationResult) -> String {
    let mut lines = vec![
        "## Final Decision".to_string(),
        format!(
            "**{}**{}",
            result.decision.as_str().to_uppercase(),
            if result.tie_broken {
                " (settled by tie-break)"
            } else {
                ""
            }
        ),
    ];

    if !result.conditions.is_empty() {
        lines.push("### Conditions".to_string());
        let bullets: Vec<String> = result
            .conditions
            .iter()
            .map(|c| format!("- {}", c))
            .collect();
        lines.push(bullets.join("\n"));
    }

    lines.join("\n\n")
}

fn footer(generated_at: DateTime<Utc>) -> String {
    format!(
        "---\n\n*Generated at {} UTC*",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Escape pipe characters so free text cannot break the table layout
fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::{Decision, Vote};
    use crate::deliberation::{DebateRound, Phase, Utterance};
    use crate::persona::PersonaIdentity;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn sample_result() -> DeliberationResult {
        let mut thinking = BTreeMap::new();
        for identity in PersonaIdentity::all() {
            thinking.insert(
                identity,
                Utterance::new(identity, Phase::Thinking, 0, format!("{} thinks.", identity)),
            );
        }

        let mut round_outputs = BTreeMap::new();
        for identity in PersonaIdentity::all() {
            round_outputs.insert(
                identity,
                Utterance::new(identity, Phase::Debate, 1, format!("{} debates.", identity)),
            );
        }

        let mut votes = BTreeMap::new();
        votes.insert(
            PersonaIdentity::Melchior,
            Vote::approve(PersonaIdentity::Melchior, "Sound | verified"),
        );
        votes.insert(
            PersonaIdentity::Balthasar,
            Vote::conditional(
                PersonaIdentity::Balthasar,
                "Needs a safeguard",
                vec!["Add rollback".to_string()],
            ),
        );
        votes.insert(
            PersonaIdentity::Casper,
            Vote::abstain(PersonaIdentity::Casper, "Backend call timed out"),
        );

        DeliberationResult::new(
            "Ship the release?",
            thinking,
            vec![DebateRound::new(1, round_outputs)],
            votes,
            Decision::Conditional,
            false,
            vec!["Add rollback".to_string()],
        )
    }

    #[test]
    fn test_report_contains_all_sections() {
        let report = generate_report(&sample_result());

        assert!(report.contains("# Deliberation Report"));
        assert!(report.contains("## Proposition"));
        assert!(report.contains("Ship the release?"));
        assert!(report.contains("## Thinking Phase"));
        assert!(report.contains("### MELCHIOR"));
        assert!(report.contains("## Debate Phase"));
        assert!(report.contains("### Round 1"));
        assert!(report.contains("## Voting Phase"));
        assert!(report.contains("| BALTHASAR | CONDITIONAL |"));
        assert!(report.contains("## Final Decision"));
        assert!(report.contains("**CONDITIONAL**"));
        assert!(report.contains("- Add rollback"));
    }

    #[test]
    fn test_pipes_are_escaped_in_table() {
        let report = generate_report(&sample_result());
        assert!(report.contains("Sound \\| verified"));
    }

    #[test]
    fn test_report_filename() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 23, 15, 58, 0).unwrap();
        assert_eq!(report_filename(ts), "magi-report-20260823-155800.md");
    }

    #[test]
    fn test_tie_break_is_noted() {
        let mut result = sample_result();
        result.tie_broken = true;
        let report = generate_report(&result);
        assert!(report.contains("settled by tie-break"));
    }
}
