//! Round coordinator: concurrent fan-out / fan-in for one phase
//!
//! Every phase runs the same way: spawn one task per persona, race the
//! results against cancellation and the optional phase deadline, and hand
//! back one outcome per persona. Per-persona failures stay in the outcome
//! map; only cancellation interrupts a phase.

use crate::ports::agent_backend::{AgentBackend, BackendError};
use crate::ports::observer::DeliberationObserver;
use futures::future::BoxFuture;
use magi_domain::{PersonaIdentity, Phase};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::persona::Persona;

/// Marker returned when a phase is interrupted by cancellation
#[derive(Debug)]
pub(crate) struct PhaseCancelled;

/// Outcome map of one settled phase, keyed by persona
pub(crate) type PhaseOutcomes<T> = BTreeMap<PersonaIdentity, Result<T, BackendError>>;

pub(crate) struct RoundCoordinator {
    per_call_timeout: Duration,
    phase_timeout: Option<Duration>,
}

impl RoundCoordinator {
    pub(crate) fn new(per_call_timeout: Duration, phase_timeout: Option<Duration>) -> Self {
        Self {
            per_call_timeout,
            phase_timeout,
        }
    }

    /// Run one phase to completion
    ///
    /// Spawns one backend call per persona and collects results as they
    /// arrive. A call that exceeds `per_call_timeout` settles as
    /// [`BackendError::Timeout`]; if the phase deadline passes, every
    /// still-pending persona settles the same way. The returned map always
    /// holds exactly one entry per persona.
    pub(crate) async fn run_phase<B, T, F>(
        &self,
        phase: Phase,
        round: usize,
        personas: &[Persona<B>],
        observer: &dyn DeliberationObserver,
        cancellation: Option<&CancellationToken>,
        phase_call: F,
    ) -> Result<PhaseOutcomes<T>, PhaseCancelled>
    where
        B: AgentBackend + 'static,
        T: Send + 'static,
        F: Fn(Persona<B>) -> BoxFuture<'static, Result<T, BackendError>>,
    {
        observer.on_phase_start(&phase, round, personas.len());

        let mut join_set = JoinSet::new();
        let per_call = self.per_call_timeout;
        for persona in personas {
            let identity = persona.identity();
            let call = phase_call(persona.clone());
            join_set.spawn(async move {
                let outcome = match tokio::time::timeout(per_call, call).await {
                    Ok(result) => result,
                    Err(_) => Err(BackendError::Timeout),
                };
                (identity, outcome)
            });
        }

        let deadline = self.phase_timeout.map(|t| tokio::time::Instant::now() + t);
        let cancelled = async {
            match cancellation {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let phase_expired = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(cancelled);
        tokio::pin!(phase_expired);

        let mut outcomes: PhaseOutcomes<T> = BTreeMap::new();

        loop {
            if let Some(token) = cancellation
                && token.is_cancelled()
            {
                join_set.abort_all();
                debug!(
                    "{} cancelled with {}/{} personas settled",
                    phase,
                    outcomes.len(),
                    personas.len()
                );
                return Err(PhaseCancelled);
            }

            tokio::select! {
                biased;

                _ = &mut cancelled => {
                    join_set.abort_all();
                    debug!(
                        "{} cancelled with {}/{} personas settled",
                        phase,
                        outcomes.len(),
                        personas.len()
                    );
                    return Err(PhaseCancelled);
                }
                _ = &mut phase_expired => {
                    join_set.abort_all();
                    warn!(
                        "{} deadline reached with {}/{} personas settled",
                        phase,
                        outcomes.len(),
                        personas.len()
                    );
                    break;
                }
                joined = join_set.join_next() => {
                    match joined {
                        Some(Ok((identity, outcome))) => {
                            if let Err(error) = &outcome {
                                warn!("{} failed during {}: {}", identity, phase, error);
                            }
                            observer.on_persona_settled(&phase, round, identity, outcome.is_ok());
                            outcomes.insert(identity, outcome);
                        }
                        Some(Err(error)) => {
                            warn!("Persona task aborted during {}: {}", phase, error);
                        }
                        None => break,
                    }
                }
            }
        }

        // Personas still pending at the deadline settle as timed out
        for persona in personas {
            let identity = persona.identity();
            if !outcomes.contains_key(&identity) {
                observer.on_persona_settled(&phase, round, identity, false);
                outcomes.insert(identity, Err(BackendError::Timeout));
            }
        }

        observer.on_phase_complete(&phase, round);
        Ok(outcomes)
    }
}
