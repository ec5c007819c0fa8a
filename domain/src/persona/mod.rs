//! Persona identities and configuration-time profiles

pub mod identity;

pub use identity::{PersonaIdentity, PersonaProfile};
