//! Core value objects shared across the domain

pub mod model;
pub mod proposition;

pub use model::ModelSelector;
pub use proposition::Proposition;
