use std::sync::Arc;
use std::time::Instant;

use super::prompt::compose;
use super::relay::{GenerationBackend, RelayReply};
use super::TutorError;
use crate::models::{LearnerProfile, SessionContext, Turn};

/// Lifecycle of a single tutor request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayPhase {
    Idle,
    Composing,
    Sending,
    Succeeded,
    Failed,
}

impl RelayPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Composing => "composing",
            Self::Sending => "sending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Forward-only: no retries, no resumption
    pub fn can_advance_to(self, next: RelayPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Composing)
                | (Self::Composing, Self::Sending)
                | (Self::Composing, Self::Failed)
                | (Self::Sending, Self::Succeeded)
                | (Self::Sending, Self::Failed)
        )
    }
}

struct RelayRun {
    phase: RelayPhase,
    started: Instant,
}

impl RelayRun {
    fn start() -> Self {
        Self { phase: RelayPhase::Idle, started: Instant::now() }
    }

    fn advance(&mut self, next: RelayPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "invalid relay transition {:?} -> {:?}",
            self.phase,
            next
        );
        tracing::debug!(
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Tutor relay {} -> {}",
            self.phase.as_str(),
            next.as_str()
        );
        self.phase = next;
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Composes the tutor prompt and relays it to the generation backend
pub struct TutorService {
    backend: Arc<dyn GenerationBackend>,
}

impl TutorService {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    pub fn endpoint(&self) -> &str {
        self.backend.endpoint()
    }

    /// Answer the latest learner message
    ///
    /// An empty conversation fails before anything is sent.
    #[tracing::instrument(skip_all, fields(turns = conversation.len(), model = self.backend.model()))]
    pub async fn reply(
        &self,
        conversation: &[Turn],
        profile: Option<&LearnerProfile>,
        session: Option<&SessionContext>,
    ) -> Result<RelayReply, TutorError> {
        let mut run = RelayRun::start();

        run.advance(RelayPhase::Composing);
        let prompt = match compose(conversation, profile, session) {
            Ok(prompt) => prompt,
            Err(e) => {
                run.advance(RelayPhase::Failed);
                tracing::debug!("Rejected tutor request: {}", e);
                return Err(e);
            },
        };

        run.advance(RelayPhase::Sending);
        match self.backend.generate(&prompt).await {
            Ok(reply) => {
                run.advance(RelayPhase::Succeeded);
                tracing::info!(
                    prompt_chars = prompt.len(),
                    reply_chars = reply.text.len(),
                    elapsed_ms = run.elapsed_ms(),
                    "Tutor reply relayed"
                );
                Ok(reply)
            },
            Err(e) => {
                run.advance(RelayPhase::Failed);
                tracing::warn!(elapsed_ms = run.elapsed_ms(), "Tutor relay failed: {}", e);
                Err(e)
            },
        }
    }
}
