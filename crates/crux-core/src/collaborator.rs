//! Interfaces to the external services a session talks to.
//!
//! The engine never depends on a concrete provider: hosts inject
//! implementations of these traits, tests inject mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ServiceDegraded, ServiceKind};
use crate::persona::Emotion;
use crate::session::ConversationTurn;

/// Failure reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("timed out after {0} ms")]
    Timeout(u64),

    #[error("{0}")]
    Service(String),
}

impl CollaboratorError {
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service(message.into())
    }

    /// Converts the failure into the non-fatal status surfaced to the host.
    pub fn degraded(&self, service: ServiceKind) -> ServiceDegraded {
        ServiceDegraded::new(service, self.to_string())
    }
}

/// Raw reply from the completion service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReply {
    /// Draft challenger text; may be empty
    pub text: String,
    /// The model's opinion on leaving the phase. Logged, never acted on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_hint: Option<bool>,
}

impl CompletionReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            transition_hint: None,
        }
    }
}

/// Language model that drafts challenger replies.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        recent_history: &[ConversationTurn],
        utterance: &str,
    ) -> Result<CompletionReply, CollaboratorError>;
}

/// Speech conversion in both directions.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    async fn speech_to_text(&self, audio: &[u8]) -> Result<String, CollaboratorError>;

    async fn text_to_speech(
        &self,
        text: &str,
        emotion: Emotion,
    ) -> Result<Vec<u8>, CollaboratorError>;
}

/// Avatar or speaker that plays synthesized audio. Fire-and-forget.
#[async_trait]
pub trait PresenceService: Send + Sync {
    async fn deliver(
        &self,
        audio: Vec<u8>,
        emotion: Emotion,
        expression: String,
    ) -> Result<(), CollaboratorError>;
}
