//! A single challenge conversation.
//!
//! One `ConversationSession` is owned by one connection and driven by
//! sequential `&mut self` calls. Only the submit methods await external
//! services; everything else is synchronous.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crux_core::challenge::{Challenge, generic_challenge};
use crux_core::{
    ChallengeEngine, ChallengeIntensity, CollaboratorError, CompletionReply, CompletionService,
    ConversationTurn, CruxError, Document, IntensityFeedback, OrgContext, PersonaDefinition,
    PersonaId, Phase, Result, ServiceDegraded, ServiceKind, UserContext,
};

use crate::fallback::canned_reply;
use crate::outcome::{SessionSummary, TurnOutcome, VoiceTurn};
use crate::prompt::render_system_prompt;
use crate::voice::VoiceChannel;

struct SessionState {
    id: Uuid,
    persona: PersonaId,
    user: UserContext,
    org: OrgContext,
    phase: Phase,
    intensity: ChallengeIntensity,
    history: Vec<ConversationTurn>,
    /// Set by the last exchange; applied before the next user turn is tagged
    advance_pending: bool,
    created_at: DateTime<Utc>,
}

impl SessionState {
    fn apply_pending_advance(&mut self) {
        if !self.advance_pending {
            return;
        }
        self.advance_pending = false;
        if let Some(next) = self.phase.next() {
            tracing::info!(
                session_id = %self.id,
                from = %self.phase,
                to = %next,
                "Phase advanced"
            );
            self.phase = next;
        }
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary::from_history(
            self.id,
            self.persona,
            self.phase,
            self.intensity.value(),
            &self.history,
            self.created_at,
        )
    }
}

pub struct ConversationSession {
    engine: Arc<ChallengeEngine>,
    completion: Arc<dyn CompletionService>,
    voice: Option<VoiceChannel>,
    state: Option<SessionState>,
}

impl ConversationSession {
    /// Creates an idle session. Call [`start`](Self::start) before submitting.
    pub fn new(engine: Arc<ChallengeEngine>, completion: Arc<dyn CompletionService>) -> Self {
        Self {
            engine,
            completion,
            voice: None,
            state: None,
        }
    }

    pub fn with_voice(mut self, voice: VoiceChannel) -> Self {
        self.voice = Some(voice);
        self
    }

    /// Starts a conversation with `persona_id`, replacing any active one.
    ///
    /// # Errors
    ///
    /// Returns `CruxError::UnknownPersona` if the id is not in the catalog; the
    /// session stays as it was.
    pub fn start(&mut self, persona_id: &str, user: UserContext, org: OrgContext) -> Result<Uuid> {
        let persona = self.engine.persona(persona_id)?.id;

        if let Some(previous) = &self.state {
            tracing::info!(session_id = %previous.id, "Replacing active session");
        }

        let id = Uuid::new_v4();
        self.state = Some(SessionState {
            id,
            persona,
            user,
            org,
            phase: Phase::INITIAL,
            intensity: ChallengeIntensity::new(&self.engine.config().intensity),
            history: Vec::new(),
            advance_pending: false,
            created_at: Utc::now(),
        });

        tracing::info!(session_id = %id, persona = %persona, "Session started");
        Ok(id)
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.state.as_ref().map(|state| state.id)
    }

    pub fn persona(&self) -> Option<PersonaId> {
        self.state.as_ref().map(|state| state.persona)
    }

    /// Current phase, `None` when no session is active.
    pub fn phase(&self) -> Option<Phase> {
        self.state.as_ref().map(|state| state.phase)
    }

    pub fn intensity(&self) -> Option<f64> {
        self.state.as_ref().map(|state| state.intensity.value())
    }

    /// Full transcript; empty when no session is active.
    pub fn history(&self) -> &[ConversationTurn] {
        self.state
            .as_ref()
            .map(|state| state.history.as_slice())
            .unwrap_or_default()
    }

    pub fn summary(&self) -> Result<SessionSummary> {
        self.active().map(SessionState::summary)
    }

    /// Moves intensity one step in the requested direction. Returns the new value.
    pub fn apply_feedback(&mut self, feedback: IntensityFeedback) -> Result<f64> {
        let state = self.state.as_mut().ok_or(CruxError::SessionNotStarted)?;
        state.intensity.apply_feedback(feedback);
        tracing::debug!(
            session_id = %state.id,
            feedback = ?feedback,
            intensity = state.intensity.value(),
            "Applied intensity feedback"
        );
        Ok(state.intensity.value())
    }

    /// Appends the user's utterance and the challenger's reply.
    ///
    /// Collaborator failures never fail this call: the reply falls back to a
    /// canned phrase and the failure is reported in
    /// [`TurnOutcome::degraded`].
    pub async fn submit_user_utterance(&mut self, text: &str) -> Result<TurnOutcome> {
        let engine = Arc::clone(&self.engine);
        let state = self.state.as_mut().ok_or(CruxError::SessionNotStarted)?;
        let persona = engine.catalog().get_by_id(state.persona)?;

        state.apply_pending_advance();
        let phase = state.phase;
        let intensity = state.intensity.value();

        let system_prompt = render_system_prompt(persona, phase, intensity)?;
        state.history.push(ConversationTurn::user(text, phase));

        let window = engine.config().completion.history_window;
        let previous = &state.history[..state.history.len() - 1];
        let recent = &previous[previous.len().saturating_sub(window)..];

        let completion = request_completion(
            self.completion.as_ref(),
            &system_prompt,
            recent,
            text,
            engine.config().completion.timeout(),
        )
        .await;

        let challenge = match engine
            .generator()
            .generate(persona, phase, text, &state.history, intensity)
        {
            Ok(challenge) => Some(challenge),
            Err(CruxError::NoPatternsForPhase { .. }) => {
                tracing::debug!(session_id = %state.id, phase = %phase, "No patterns, using generic challenge");
                None
            }
            Err(e) => return Err(e),
        };

        let mut degraded = Vec::new();
        let reply = compose_reply(&engine, persona, phase, intensity, completion, challenge.as_ref());
        if let Some(failure) = reply.degraded {
            tracing::warn!(
                session_id = %state.id,
                service = %failure.service,
                reason = %failure.reason,
                "Completion failed, using canned reply"
            );
            degraded.push(failure);
        }

        let advance_pending = challenge
            .as_ref()
            .map(|challenge| challenge.should_advance_phase)
            .unwrap_or_else(|| engine.policy().should_advance_after_reply(phase, &state.history));
        let emotion = persona.emotion_for(phase);
        let expression = persona.expression_for(emotion).to_string();

        let turn = ConversationTurn::challenger(reply.text, phase, reply.challenge_type);
        state.history.push(turn.clone());
        state.advance_pending = advance_pending;

        if state.intensity.observe_utterance(text) {
            tracing::debug!(
                session_id = %state.id,
                intensity = state.intensity.value(),
                "Intensity escalated"
            );
        }

        tracing::info!(
            session_id = %state.id,
            persona = %persona.id,
            phase = %phase,
            turns = state.history.len(),
            advance_pending,
            degraded = !degraded.is_empty(),
            "Challenger replied"
        );

        let intensity = state.intensity.value();
        let session_id = state.id;

        let mut audio = None;
        if let Some(voice) = &self.voice {
            match voice.speak(&turn.content, emotion, &expression).await {
                Ok(bytes) => audio = Some(bytes),
                Err(failure) => {
                    tracing::warn!(
                        session_id = %session_id,
                        reason = %failure.reason,
                        "Speech synthesis failed"
                    );
                    degraded.push(failure);
                }
            }
        }

        Ok(TurnOutcome {
            turn,
            pattern_id: reply.pattern_id,
            emotion,
            expression,
            intensity,
            advance_pending,
            audio,
            degraded,
        })
    }

    /// Transcribes `audio` and runs the text flow on the transcript.
    ///
    /// A transcription failure appends nothing and is returned as
    /// [`VoiceTurn::Unheard`].
    ///
    /// # Errors
    ///
    /// `SessionNotStarted` without an active session, `Config` without a
    /// voice channel.
    pub async fn submit_voice_utterance(&mut self, audio: &[u8]) -> Result<VoiceTurn> {
        let session_id = self.active()?.id;
        let voice = self
            .voice
            .clone()
            .ok_or_else(|| CruxError::config("no voice channel attached to this session"))?;

        match voice.transcribe(audio).await {
            Ok(transcript) => {
                let outcome = self.submit_user_utterance(&transcript).await?;
                Ok(VoiceTurn::Answered {
                    transcript,
                    outcome,
                })
            }
            Err(failure) => {
                tracing::warn!(
                    session_id = %session_id,
                    reason = %failure.reason,
                    "Transcription failed, nothing appended"
                );
                Ok(VoiceTurn::Unheard(failure))
            }
        }
    }

    /// Synthesizes the closing document from the full transcript.
    pub fn request_document(&self) -> Result<Document> {
        let state = self.active()?;
        let persona = self.engine.catalog().get_by_id(state.persona)?;
        self.engine
            .synthesizer()
            .synthesize(&state.history, persona, &state.user, &state.org)
    }

    /// Discards the session. Returns its final summary, or `None` if nothing
    /// was active.
    pub fn end(&mut self) -> Option<SessionSummary> {
        let state = self.state.take()?;
        let summary = state.summary();
        tracing::info!(
            session_id = %state.id,
            turns = summary.total_turns,
            duration_secs = summary.duration_secs,
            "Session ended"
        );
        Some(summary)
    }

    fn active(&self) -> Result<&SessionState> {
        self.state.as_ref().ok_or(CruxError::SessionNotStarted)
    }
}

async fn request_completion(
    service: &dyn CompletionService,
    system_prompt: &str,
    recent: &[ConversationTurn],
    utterance: &str,
    timeout: Duration,
) -> std::result::Result<CompletionReply, CollaboratorError> {
    match tokio::time::timeout(timeout, service.complete(system_prompt, recent, utterance)).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::Timeout(timeout.as_millis() as u64)),
    }
}

struct ComposedReply {
    text: String,
    pattern_id: Option<String>,
    challenge_type: Option<crux_core::ChallengeType>,
    degraded: Option<ServiceDegraded>,
}

/// Picks the challenger text from the completion draft, the generated
/// challenge and the fallbacks.
fn compose_reply(
    engine: &ChallengeEngine,
    persona: &PersonaDefinition,
    phase: Phase,
    intensity: f64,
    completion: std::result::Result<CompletionReply, CollaboratorError>,
    challenge: Option<&Challenge>,
) -> ComposedReply {
    let reply = match completion {
        Ok(reply) => reply,
        Err(e) => {
            return ComposedReply {
                text: canned_reply(phase).to_string(),
                pattern_id: None,
                challenge_type: None,
                degraded: Some(e.degraded(ServiceKind::Completion)),
            };
        }
    };

    if let Some(hint) = reply.transition_hint {
        tracing::debug!(phase = %phase, hint, "Ignoring completion transition hint");
    }

    let pattern_id = challenge.map(|challenge| challenge.pattern_id.clone());
    let challenge_type = challenge.map(|challenge| challenge.challenge_type);

    let text = if !reply.text.trim().is_empty() {
        engine.generator().refine(persona, &reply.text, intensity)
    } else if let Some(challenge) = challenge {
        challenge.text.clone()
    } else {
        engine.generator().refine(persona, generic_challenge(phase), intensity)
    };

    ComposedReply {
        text,
        pattern_id,
        challenge_type,
        degraded: None,
    }
}
