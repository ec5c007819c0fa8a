//! Runtime persona: a profile bound to a backend
//!
//! One generic implementation parameterized by data (identity + charter)
//! covers every deliberating role. Personas never retry; failure policy
//! belongs to the round coordinator.

use crate::ports::agent_backend::{AgentBackend, BackendError};
use magi_domain::{
    ModelSelector, PersonaIdentity, PersonaProfile, PromptTemplate, Vote, parse_vote_response,
};
use std::sync::Arc;

/// A persona bound to a backend for the duration of one deliberation
pub struct Persona<B> {
    profile: PersonaProfile,
    backend: Arc<B>,
    model: ModelSelector,
}

impl<B> Clone for Persona<B> {
    fn clone(&self) -> Self {
        Self {
            profile: self.profile.clone(),
            backend: Arc::clone(&self.backend),
            model: self.model.clone(),
        }
    }
}

impl<B: AgentBackend> Persona<B> {
    pub fn new(profile: PersonaProfile, backend: Arc<B>, model: ModelSelector) -> Self {
        Self {
            profile,
            backend,
            model,
        }
    }

    pub fn identity(&self) -> PersonaIdentity {
        self.profile.identity
    }

    /// Produce the independent initial assessment for the Thinking phase
    pub async fn think(&self, proposition: &str) -> Result<String, BackendError> {
        self.call(&PromptTemplate::thinking(proposition)).await
    }

    /// Produce one debate contribution against the transcript so far
    pub async fn debate(
        &self,
        proposition: &str,
        transcript: &str,
        round: usize,
        total_rounds: usize,
    ) -> Result<String, BackendError> {
        self.call(&PromptTemplate::debate(
            proposition,
            transcript,
            round,
            total_rounds,
        ))
        .await
    }

    /// Cast the final vote against the complete transcript
    ///
    /// The backend's free-text response is parsed into a structured vote;
    /// an ambiguous response becomes an abstention, never an error.
    pub async fn vote(&self, proposition: &str, transcript: &str) -> Result<Vote, BackendError> {
        let response = self
            .call(&PromptTemplate::voting(proposition, transcript))
            .await?;
        Ok(parse_vote_response(self.identity(), &response))
    }

    async fn call(&self, prompt: &str) -> Result<String, BackendError> {
        self.backend
            .call(&self.profile.instruction, prompt, &self.model)
            .await
    }
}
