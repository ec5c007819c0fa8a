//! Prompt templates for the deliberation phases

pub mod template;

pub use template::PromptTemplate;
