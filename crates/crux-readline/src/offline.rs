use async_trait::async_trait;

use crux_core::{CollaboratorError, CompletionReply, CompletionService, ConversationTurn};

/// Completion stand-in used when no model is wired in. Always returns an
/// empty draft, so every reply comes from the persona's patterns.
pub struct OfflineCompletion;

#[async_trait]
impl CompletionService for OfflineCompletion {
    async fn complete(
        &self,
        system_prompt: &str,
        recent_history: &[ConversationTurn],
        _utterance: &str,
    ) -> Result<CompletionReply, CollaboratorError> {
        tracing::trace!(
            prompt_len = system_prompt.len(),
            context_turns = recent_history.len(),
            "Offline completion"
        );
        Ok(CompletionReply::default())
    }
}
