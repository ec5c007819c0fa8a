//! Voting and aggregation
//!
//! Pure domain logic: stances, votes, aggregation rules, tie-break
//! policies, and the aggregation function that turns a vote set into a
//! deterministic [`Verdict`].

pub mod parsing;
pub mod rule;
pub mod verdict;
pub mod vote;

pub use parsing::parse_vote_response;
pub use rule::{AggregationRule, TieBreakPolicy};
pub use verdict::{Decision, Verdict, aggregate};
pub use vote::{Stance, Vote};
