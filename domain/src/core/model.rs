//! Model selector value object

use serde::{Deserialize, Serialize};

/// Opaque identifier for the language model backing a deliberation (Value Object)
///
/// The engine never interprets this value; it is passed through to the
/// agent backend unchanged, so any identifier the backend understands
/// is valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelSelector(String);

impl ModelSelector {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ModelSelector {
    /// Returns the default model used when the caller does not pick one
    fn default() -> Self {
        Self("gemini-1.5-pro".to_string())
    }
}

impl std::fmt::Display for ModelSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModelSelector {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ModelSelector {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
