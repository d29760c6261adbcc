//! Voice input and output around a text session.

use std::sync::Arc;

use crux_core::{
    CollaboratorError, Emotion, PresenceService, ServiceDegraded, ServiceKind,
    TranscriptionService,
};

/// Transcription plus an optional presence target for synthesized replies.
#[derive(Clone)]
pub struct VoiceChannel {
    transcription: Arc<dyn TranscriptionService>,
    presence: Option<Arc<dyn PresenceService>>,
}

impl VoiceChannel {
    pub fn new(transcription: Arc<dyn TranscriptionService>) -> Self {
        Self {
            transcription,
            presence: None,
        }
    }

    pub fn with_presence(mut self, presence: Arc<dyn PresenceService>) -> Self {
        self.presence = Some(presence);
        self
    }

    /// Converts user audio to text.
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String, ServiceDegraded> {
        self.transcription
            .speech_to_text(audio)
            .await
            .map_err(|e| e.degraded(ServiceKind::Transcription))
    }

    /// Synthesizes `text` and hands the audio to the presence service.
    ///
    /// Presence delivery runs on a spawned task; its failures are logged and
    /// never reach the caller. Returns the synthesized audio.
    pub async fn speak(
        &self,
        text: &str,
        emotion: Emotion,
        expression: &str,
    ) -> Result<Vec<u8>, ServiceDegraded> {
        let audio = self
            .transcription
            .text_to_speech(text, emotion)
            .await
            .map_err(|e| e.degraded(ServiceKind::Transcription))?;

        if let Some(presence) = &self.presence {
            let presence = Arc::clone(presence);
            let payload = audio.clone();
            let expression = expression.to_string();
            tokio::spawn(async move {
                if let Err(e) = presence.deliver(payload, emotion, expression).await {
                    log_presence_failure(&e);
                }
            });
        }

        Ok(audio)
    }
}

fn log_presence_failure(error: &CollaboratorError) {
    tracing::warn!(service = %ServiceKind::Presence, error = %error, "Presence delivery failed");
}
