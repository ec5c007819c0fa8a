//! Ports (interfaces) consumed and exposed by the application layer

pub mod agent_backend;
pub mod observer;

pub use agent_backend::{AgentBackend, BackendError};
pub use observer::{DeliberationObserver, NoObserver};
