//! Consensus engine
//!
//! [`ConsensusEngine`] is the single entry point of the crate: it takes a
//! validated configuration plus a backend and drives one proposition through
//! Thinking, the configured debate rounds, Voting, and aggregation. Phase
//! ordering lives in the state machine, concurrency in the coordinator, and
//! the per-phase prompts in the personas; this module only wires them
//! together and owns the failure policy.

mod coordinator;
mod persona;
mod state;

pub use persona::Persona;

use crate::config::{ConfigError, EngineConfig};
use crate::ports::agent_backend::{AgentBackend, BackendError};
use crate::ports::observer::{DeliberationObserver, NoObserver};
use coordinator::{PhaseCancelled, PhaseOutcomes, RoundCoordinator};
use futures::FutureExt;
use magi_domain::{
    DebateRound, DeliberationResult, PartialDeliberation, PersonaIdentity, Phase, Proposition,
    Transcript, Utterance, Vote, aggregate,
};
use state::EngineState;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Terminal failures of a deliberation
///
/// Per-persona failures never surface here; they degrade into placeholder
/// utterances and abstentions instead. A run fails only when its
/// configuration is invalid, when every persona fails in one phase, or when
/// the caller cancels it.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("every persona failed during the {phase} phase")]
    Quorum {
        phase: Phase,
        failures: BTreeMap<PersonaIdentity, BackendError>,
    },

    #[error("deliberation cancelled")]
    Cancelled(Box<PartialDeliberation>),
}

/// Facade driving one proposition to one auditable verdict
pub struct ConsensusEngine<B> {
    config: EngineConfig,
    backend: Arc<B>,
}

impl<B: AgentBackend + 'static> ConsensusEngine<B> {
    /// Create an engine, rejecting invalid configurations up front
    pub fn new(config: EngineConfig, backend: Arc<B>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, backend })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Deliberate a proposition without progress reporting or cancellation
    pub async fn execute(
        &self,
        proposition: Proposition,
    ) -> Result<DeliberationResult, EngineError> {
        self.execute_with_observer(proposition, &NoObserver, None)
            .await
    }

    /// Deliberate a proposition, reporting progress to `observer`
    ///
    /// Cancellation is honored at phase boundaries and while a phase is in
    /// flight; a cancelled run returns the fully settled phases inside
    /// [`EngineError::Cancelled`]. The engine itself is not consumed and may
    /// run further propositions.
    pub async fn execute_with_observer(
        &self,
        proposition: Proposition,
        observer: &dyn DeliberationObserver,
        cancellation: Option<CancellationToken>,
    ) -> Result<DeliberationResult, EngineError> {
        let personas: Vec<Persona<B>> = self
            .config
            .personas
            .iter()
            .map(|profile| {
                Persona::new(
                    profile.clone(),
                    Arc::clone(&self.backend),
                    self.config.model.clone(),
                )
            })
            .collect();
        let order: Vec<PersonaIdentity> = personas.iter().map(|p| p.identity()).collect();
        let total_rounds = self.config.round_count;
        let coordinator =
            RoundCoordinator::new(self.config.per_call_timeout, self.config.phase_timeout);
        let cancellation = cancellation.as_ref();

        info!(
            "Starting deliberation: {} personas, {} debate rounds",
            order.len(),
            total_rounds
        );

        let mut transcript = Transcript::new();
        let mut thinking: Option<BTreeMap<PersonaIdentity, Utterance>> = None;
        let mut debate: Vec<DebateRound> = Vec::new();
        let mut votes: BTreeMap<PersonaIdentity, Vote> = BTreeMap::new();
        let mut quorum_loss: Option<(Phase, BTreeMap<PersonaIdentity, BackendError>)> = None;

        let mut state = EngineState::Idle;
        loop {
            state = match state {
                EngineState::Idle => EngineState::Thinking,

                EngineState::Thinking => {
                    let prop = proposition.content().to_string();
                    let outcomes = coordinator
                        .run_phase(
                            Phase::Thinking,
                            0,
                            &personas,
                            observer,
                            cancellation,
                            move |persona| {
                                let prop = prop.clone();
                                async move { persona.think(&prop).await }.boxed()
                            },
                        )
                        .await;
                    let outcomes = match outcomes {
                        Ok(outcomes) => outcomes,
                        Err(PhaseCancelled) => {
                            return Err(cancelled(&proposition, thinking.take(), debate));
                        }
                    };

                    let (utterances, failures) =
                        settle_utterances(Phase::Thinking, 0, &order, outcomes);
                    for identity in &order {
                        if let Some(utterance) = utterances.get(identity) {
                            observer.on_utterance(utterance);
                            transcript.append(utterance.clone());
                        }
                    }
                    let live = order.len() - failures.len();
                    debug!("Thinking settled: {}/{} personas live", live, order.len());
                    thinking = Some(utterances);
                    if live == 0 {
                        quorum_loss = Some((Phase::Thinking, failures));
                    }
                    EngineState::after_thinking(live)
                }

                EngineState::Debating(round) => {
                    let prop = proposition.content().to_string();
                    let snapshot = transcript.render();
                    let outcomes = coordinator
                        .run_phase(
                            Phase::Debate,
                            round,
                            &personas,
                            observer,
                            cancellation,
                            move |persona| {
                                let prop = prop.clone();
                                let snapshot = snapshot.clone();
                                async move {
                                    persona.debate(&prop, &snapshot, round, total_rounds).await
                                }
                                .boxed()
                            },
                        )
                        .await;
                    let outcomes = match outcomes {
                        Ok(outcomes) => outcomes,
                        Err(PhaseCancelled) => {
                            return Err(cancelled(&proposition, thinking.take(), debate));
                        }
                    };

                    let (utterances, failures) =
                        settle_utterances(Phase::Debate, round, &order, outcomes);
                    for identity in &order {
                        if let Some(utterance) = utterances.get(identity) {
                            observer.on_utterance(utterance);
                            transcript.append(utterance.clone());
                        }
                    }
                    let live = order.len() - failures.len();
                    debug!(
                        "Debate round {}/{} settled: {}/{} personas live",
                        round,
                        total_rounds,
                        live,
                        order.len()
                    );
                    debate.push(DebateRound::new(round, utterances));
                    if live == 0 {
                        quorum_loss = Some((Phase::Debate, failures));
                    }
                    EngineState::after_debate(round, total_rounds, live)
                }

                EngineState::Voting => {
                    let prop = proposition.content().to_string();
                    let snapshot = transcript.render();
                    let outcomes: Result<PhaseOutcomes<Vote>, PhaseCancelled> = coordinator
                        .run_phase(
                            Phase::Voting,
                            0,
                            &personas,
                            observer,
                            cancellation,
                            move |persona| {
                                let prop = prop.clone();
                                let snapshot = snapshot.clone();
                                async move { persona.vote(&prop, &snapshot).await }.boxed()
                            },
                        )
                        .await;
                    let mut outcomes = match outcomes {
                        Ok(outcomes) => outcomes,
                        Err(PhaseCancelled) => {
                            return Err(cancelled(&proposition, thinking.take(), debate));
                        }
                    };

                    let mut failures: BTreeMap<PersonaIdentity, BackendError> = BTreeMap::new();
                    for &identity in &order {
                        let vote = match outcomes.remove(&identity) {
                            Some(Ok(vote)) => vote,
                            Some(Err(error)) => {
                                warn!("{} failed to vote, recording abstention", identity);
                                failures.insert(identity, error.clone());
                                Vote::abstain(identity, error.to_string())
                            }
                            None => {
                                failures.insert(identity, BackendError::Timeout);
                                Vote::abstain(identity, BackendError::Timeout.to_string())
                            }
                        };
                        votes.insert(identity, vote);
                    }
                    let live = order.len() - failures.len();
                    if live == 0 {
                        quorum_loss = Some((Phase::Voting, failures));
                    } else {
                        for identity in &order {
                            if let Some(vote) = votes.get(identity) {
                                observer.on_vote(vote);
                            }
                        }
                    }
                    EngineState::after_voting(live)
                }

                EngineState::Decided => {
                    let verdict = aggregate(&votes, &self.config.rule, &self.config.tie_break);
                    info!(
                        "Decision: {} ({} approve / {} deny / {} abstain, tie_broken: {})",
                        verdict.decision,
                        verdict.approve_count,
                        verdict.deny_count,
                        verdict.abstain_count,
                        verdict.tie_broken
                    );
                    return Ok(DeliberationResult::new(
                        proposition.content(),
                        thinking.take().unwrap_or_default(),
                        debate,
                        votes,
                        verdict.decision,
                        verdict.tie_broken,
                        verdict.conditions,
                    ));
                }

                EngineState::Failed => {
                    let (phase, failures) =
                        quorum_loss.take().unwrap_or((Phase::Thinking, BTreeMap::new()));
                    warn!("Every persona failed during {}, aborting", phase);
                    return Err(EngineError::Quorum { phase, failures });
                }
            };
        }
    }
}

fn cancelled(
    proposition: &Proposition,
    thinking: Option<BTreeMap<PersonaIdentity, Utterance>>,
    debate: Vec<DebateRound>,
) -> EngineError {
    info!(
        "Deliberation cancelled with {} settled debate rounds",
        debate.len()
    );
    EngineError::Cancelled(Box::new(PartialDeliberation::new(
        proposition.content(),
        thinking,
        debate,
    )))
}

/// Turn raw phase outcomes into one utterance per persona
///
/// Failed personas are recorded as placeholders so the transcript and the
/// result always carry a complete panel.
fn settle_utterances(
    phase: Phase,
    round: usize,
    order: &[PersonaIdentity],
    mut outcomes: PhaseOutcomes<String>,
) -> (
    BTreeMap<PersonaIdentity, Utterance>,
    BTreeMap<PersonaIdentity, BackendError>,
) {
    let mut utterances = BTreeMap::new();
    let mut failures = BTreeMap::new();
    for &identity in order {
        match outcomes.remove(&identity) {
            Some(Ok(text)) => {
                utterances.insert(identity, Utterance::new(identity, phase, round, text));
            }
            Some(Err(error)) => {
                failures.insert(identity, error);
                utterances.insert(identity, Utterance::placeholder(identity, phase, round));
            }
            None => {
                failures.insert(identity, BackendError::Timeout);
                utterances.insert(identity, Utterance::placeholder(identity, phase, round));
            }
        }
    }
    (utterances, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use magi_domain::{AggregationRule, Decision, ModelSelector, TieBreakPolicy};
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Deterministic backend keyed on the phase markers in the prompt text
    #[derive(Default)]
    struct StubBackend {
        fail_thinking: BTreeSet<PersonaIdentity>,
        fail_debate: BTreeSet<PersonaIdentity>,
        hang_voting: BTreeSet<PersonaIdentity>,
        votes: BTreeMap<PersonaIdentity, &'static str>,
    }

    impl StubBackend {
        fn with_votes(votes: Vec<(PersonaIdentity, &'static str)>) -> Self {
            Self {
                votes: votes.into_iter().collect(),
                ..Self::default()
            }
        }
    }

    fn persona_of(role_instruction: &str) -> PersonaIdentity {
        PersonaIdentity::all()
            .into_iter()
            .find(|identity| role_instruction.contains(identity.label()))
            .unwrap_or(PersonaIdentity::Melchior)
    }

    #[async_trait]
    impl AgentBackend for StubBackend {
        async fn call(
            &self,
            role_instruction: &str,
            context: &str,
            _model: &ModelSelector,
        ) -> Result<String, BackendError> {
            let who = persona_of(role_instruction);
            if context.contains("initial assessment") {
                if self.fail_thinking.contains(&who) {
                    return Err(BackendError::Unavailable("stub outage".to_string()));
                }
                Ok(format!("{} initial position", who.label()))
            } else if context.contains("debate round") {
                if self.fail_debate.contains(&who) {
                    return Err(BackendError::Unavailable("stub outage".to_string()));
                }
                Ok(format!("{} rebuttal", who.label()))
            } else {
                if self.hang_voting.contains(&who) {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }
                Ok(self
                    .votes
                    .get(&who)
                    .copied()
                    .unwrap_or(r#"{"vote": "approve", "reason": "Acceptable."}"#)
                    .to_string())
            }
        }
    }

    fn engine(config: EngineConfig, backend: StubBackend) -> ConsensusEngine<StubBackend> {
        ConsensusEngine::new(config, Arc::new(backend)).unwrap()
    }

    #[derive(Default)]
    struct CountingObserver {
        phase_starts: AtomicUsize,
        utterances: AtomicUsize,
        votes: AtomicUsize,
    }

    impl DeliberationObserver for CountingObserver {
        fn on_phase_start(&self, _phase: &Phase, _round: usize, _total_tasks: usize) {
            self.phase_starts.fetch_add(1, Ordering::SeqCst);
        }
        fn on_persona_settled(
            &self,
            _phase: &Phase,
            _round: usize,
            _author: PersonaIdentity,
            _success: bool,
        ) {
        }
        fn on_utterance(&self, _utterance: &Utterance) {
            self.utterances.fetch_add(1, Ordering::SeqCst);
        }
        fn on_vote(&self, _vote: &Vote) {
            self.votes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_phase_complete(&self, _phase: &Phase, _round: usize) {}
    }

    /// Cancels the token when the named debate round starts
    struct CancelOnDebateRound {
        token: CancellationToken,
        round: usize,
    }

    impl DeliberationObserver for CancelOnDebateRound {
        fn on_phase_start(&self, phase: &Phase, round: usize, _total_tasks: usize) {
            if *phase == Phase::Debate && round == self.round {
                self.token.cancel();
            }
        }
        fn on_persona_settled(
            &self,
            _phase: &Phase,
            _round: usize,
            _author: PersonaIdentity,
            _success: bool,
        ) {
        }
        fn on_utterance(&self, _utterance: &Utterance) {}
        fn on_vote(&self, _vote: &Vote) {}
        fn on_phase_complete(&self, _phase: &Phase, _round: usize) {}
    }

    #[tokio::test]
    async fn test_full_deliberation_reaches_majority_approval() {
        let backend = StubBackend::with_votes(vec![
            (
                PersonaIdentity::Melchior,
                r#"{"vote": "approve", "reason": "Evidence holds."}"#,
            ),
            (
                PersonaIdentity::Balthasar,
                r#"{"vote": "approve", "reason": "Risk is bounded."}"#,
            ),
            (
                PersonaIdentity::Casper,
                r#"{"vote": "deny", "reason": "Users will hate it."}"#,
            ),
        ]);
        let engine = engine(EngineConfig::default().with_round_count(2), backend);

        let result = engine
            .execute(Proposition::new("Ship the redesign"))
            .await
            .unwrap();

        assert_eq!(result.decision, Decision::Approved);
        assert!(!result.tie_broken);
        assert_eq!(result.thinking.len(), 3);
        assert_eq!(result.round_count(), 2);
        assert!(result.debate.iter().all(|round| round.outputs.len() == 3));
        assert_eq!(result.votes.len(), 3);
        assert!(!result.is_degraded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_voting_timeout_becomes_abstention() {
        let mut backend = StubBackend::with_votes(vec![
            (
                PersonaIdentity::Melchior,
                r#"{"vote": "approve", "reason": "Yes."}"#,
            ),
            (
                PersonaIdentity::Balthasar,
                r#"{"vote": "approve", "reason": "Yes."}"#,
            ),
        ]);
        backend.hang_voting.insert(PersonaIdentity::Casper);
        let engine = engine(
            EngineConfig::default()
                .with_round_count(1)
                .with_per_call_timeout(Duration::from_secs(5)),
            backend,
        );

        let result = engine.execute(Proposition::new("Ship it")).await.unwrap();

        assert_eq!(result.votes.len(), 3);
        let casper = result.vote(PersonaIdentity::Casper).unwrap();
        assert!(casper.is_abstain());
        assert_eq!(result.decision, Decision::Approved);
    }

    #[tokio::test]
    async fn test_all_personas_failing_thinking_is_fatal() {
        let mut backend = StubBackend::default();
        backend.fail_thinking = PersonaIdentity::all().into_iter().collect();
        let engine = engine(EngineConfig::default(), backend);

        let error = engine
            .execute(Proposition::new("Ship it"))
            .await
            .unwrap_err();

        match error {
            EngineError::Quorum { phase, failures } => {
                assert_eq!(phase, Phase::Thinking);
                assert_eq!(failures.len(), 3);
            }
            other => panic!("expected quorum failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_single_debate_failure_degrades_but_completes() {
        let mut backend = StubBackend::default();
        backend.fail_debate.insert(PersonaIdentity::Balthasar);
        let engine = engine(EngineConfig::default().with_round_count(1), backend);

        let result = engine.execute(Proposition::new("Ship it")).await.unwrap();

        let output = result.debate[0]
            .output(PersonaIdentity::Balthasar)
            .unwrap();
        assert!(output.is_placeholder());
        assert!(result.is_degraded());
        assert_eq!(result.votes.len(), 3);
        assert_eq!(result.decision, Decision::Approved);
    }

    #[tokio::test]
    async fn test_cancellation_mid_debate_returns_settled_phases() {
        let engine = engine(
            EngineConfig::default().with_round_count(3),
            StubBackend::default(),
        );
        let token = CancellationToken::new();
        let observer = CancelOnDebateRound {
            token: token.clone(),
            round: 2,
        };

        let error = engine
            .execute_with_observer(Proposition::new("Ship it"), &observer, Some(token))
            .await
            .unwrap_err();

        match error {
            EngineError::Cancelled(partial) => {
                assert!(partial.thinking.is_some());
                assert_eq!(partial.settled_rounds(), 1);
            }
            other => panic!("expected cancellation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_yields_empty_partial() {
        let engine = engine(EngineConfig::default(), StubBackend::default());
        let token = CancellationToken::new();
        token.cancel();

        let error = engine
            .execute_with_observer(Proposition::new("Ship it"), &NoObserver, Some(token))
            .await
            .unwrap_err();

        match error {
            EngineError::Cancelled(partial) => {
                assert!(partial.thinking.is_none());
                assert_eq!(partial.settled_rounds(), 0);
            }
            other => panic!("expected cancellation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tie_settled_by_configured_tiebreaker() {
        let backend = StubBackend::with_votes(vec![
            (
                PersonaIdentity::Melchior,
                r#"{"vote": "approve", "reason": "Yes."}"#,
            ),
            (
                PersonaIdentity::Balthasar,
                r#"{"vote": "deny", "reason": "No."}"#,
            ),
            (
                PersonaIdentity::Casper,
                r#"{"vote": "abstain", "reason": "No position."}"#,
            ),
        ]);
        let engine = engine(
            EngineConfig::default()
                .with_round_count(1)
                .with_rule(AggregationRule::Majority)
                .with_tie_break(TieBreakPolicy::Tiebreaker(PersonaIdentity::Melchior)),
            backend,
        );

        let result = engine.execute(Proposition::new("Ship it")).await.unwrap();

        assert!(result.tie_broken);
        assert_eq!(result.decision, Decision::Approved);
    }

    #[tokio::test]
    async fn test_observer_sees_every_event() {
        let engine = engine(
            EngineConfig::default().with_round_count(2),
            StubBackend::default(),
        );
        let observer = CountingObserver::default();

        engine
            .execute_with_observer(Proposition::new("Ship it"), &observer, None)
            .await
            .unwrap();

        // Thinking + two debate rounds + voting
        assert_eq!(observer.phase_starts.load(Ordering::SeqCst), 4);
        // Three personas over thinking and two debate rounds
        assert_eq!(observer.utterances.load(Ordering::SeqCst), 9);
        assert_eq!(observer.votes.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = EngineConfig::default().with_round_count(0);
        let result = ConsensusEngine::new(config, Arc::new(StubBackend::default()));
        assert!(result.is_err());
    }
}
