//! Proposition value object

use serde::{Deserialize, Serialize};

/// The proposition under deliberation (Value Object)
///
/// Represents the input text that the persona panel evaluates. Immutable
/// once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposition {
    content: String,
}

impl Proposition {
    /// Create a new proposition
    ///
    /// # Panics
    /// Panics if the content is empty or only whitespace
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        assert!(!content.trim().is_empty(), "Proposition cannot be empty");
        Self { content }
    }

    /// Try to create a new proposition, returning None if invalid
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self { content })
        }
    }

    /// Get the proposition content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Proposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl From<&str> for Proposition {
    fn from(s: &str) -> Self {
        Proposition::new(s)
    }
}

impl From<String> for Proposition {
    fn from(s: String) -> Self {
        Proposition::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proposition_creation() {
        let p = Proposition::new("Deploy the new release on Friday?");
        assert_eq!(p.content(), "Deploy the new release on Friday?");
    }

    #[test]
    fn test_proposition_from_str() {
        let p: Proposition = "Adopt the migration plan?".into();
        assert_eq!(p.content(), "Adopt the migration plan?");
    }

    #[test]
    #[should_panic]
    fn test_empty_proposition_panics() {
        Proposition::new("");
    }

    #[test]
    fn test_try_new_empty() {
        assert!(Proposition::try_new("").is_none());
        assert!(Proposition::try_new("   ").is_none());
    }

    #[test]
    fn test_try_new_valid() {
        assert!(Proposition::try_new("Approve the budget?").is_some());
    }
}
