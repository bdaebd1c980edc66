//! depot-engine: Headless conversation core for the depot chat client
//!
//! This crate provides everything except presentation:
//! - The message model and the append-only conversation state
//! - The conversation controller and its request lifecycle
//! - The answer service seam and its HTTP implementation
//! - Configuration

pub mod config;
pub mod controller;
pub mod http;
pub mod message;
pub mod service;
pub mod state;
pub mod testing;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use controller::{ConversationController, ConversationEvent, SubmitOutcome};
pub use http::{HealthStatus, HttpAnswerService};
pub use message::{Citation, Message, Role};
pub use service::{AnswerReply, AnswerService, Outcome, Resolution, ServiceError, FALLBACK_TEXT};
pub use state::{ConversationState, Phase, Submission};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
