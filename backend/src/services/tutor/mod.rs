//! Tutor Chat Relay
//!
//! Turns a learner's conversation into one instruction prompt and relays it
//! to a local text-generation backend.
//!
//! # Flow
//! ```text
//! TutorRequest ──► compose() ──► GenerationBackend::generate() ──► reply text
//!                  (pure)        (one HTTP call, no retry)
//! ```

mod prompt;
mod relay;
mod service;

pub use prompt::{
    ANCHOR_DIRECTIVE, HISTORY_MARKER, PROFILE_MARKER, SESSION_MARKER, compose, latest_learner_turn,
};
pub use relay::{GenerationBackend, OllamaClient, RelayReply};
pub use service::{RelayPhase, TutorService};

use thiserror::Error;

/// Coarse failure category surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    BackendUnavailable,
    Unexpected,
}

#[derive(Debug, Error)]
pub enum TutorError {
    #[error("Missing messages array")]
    EmptyConversation,

    #[error("Failed to reach local model: {0}")]
    BackendUnavailable(String),

    #[error("Unexpected error in tutor relay: {0}")]
    Unexpected(String),
}

impl TutorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyConversation => ErrorKind::InvalidInput,
            Self::BackendUnavailable(_) => ErrorKind::BackendUnavailable,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}
