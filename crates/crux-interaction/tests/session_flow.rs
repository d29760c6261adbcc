use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use crux_core::challenge::FixedIndex;
use crux_core::config::CompletionConfig;
use crux_core::document::template::THE_BIG_BET;
use crux_core::{
    ChallengeEngine, CollaboratorError, CompletionReply, CompletionService, ConversationTurn,
    CruxError, Emotion, EngineConfig, IntensityFeedback, OrgContext, Phase, PresenceService,
    ServiceKind, Speaker, TranscriptionService, UserContext,
};
use crux_interaction::fallback::canned_reply;
use crux_interaction::{ConversationSession, VoiceChannel, VoiceTurn};

// ============================================================================
// Mock collaborators
// ============================================================================

/// Returns an empty draft so the generated pattern text is used.
struct SilentCompletion;

#[async_trait]
impl CompletionService for SilentCompletion {
    async fn complete(
        &self,
        _system_prompt: &str,
        _recent_history: &[ConversationTurn],
        _utterance: &str,
    ) -> Result<CompletionReply, CollaboratorError> {
        Ok(CompletionReply::default())
    }
}

struct FailingCompletion;

#[async_trait]
impl CompletionService for FailingCompletion {
    async fn complete(
        &self,
        _system_prompt: &str,
        _recent_history: &[ConversationTurn],
        _utterance: &str,
    ) -> Result<CompletionReply, CollaboratorError> {
        Err(CollaboratorError::service("upstream unavailable"))
    }
}

struct SlowCompletion;

#[async_trait]
impl CompletionService for SlowCompletion {
    async fn complete(
        &self,
        _system_prompt: &str,
        _recent_history: &[ConversationTurn],
        _utterance: &str,
    ) -> Result<CompletionReply, CollaboratorError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(CompletionReply::text("too late"))
    }
}

/// Replays scripted replies and records what it was asked.
#[derive(Default)]
struct ScriptedCompletion {
    replies: Mutex<VecDeque<CompletionReply>>,
    history_lengths: Mutex<Vec<usize>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    fn with_replies(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| CompletionReply::text(*r)).collect()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(
        &self,
        system_prompt: &str,
        recent_history: &[ConversationTurn],
        _utterance: &str,
    ) -> Result<CompletionReply, CollaboratorError> {
        self.history_lengths.lock().unwrap().push(recent_history.len());
        self.prompts.lock().unwrap().push(system_prompt.to_string());
        Ok(self.replies.lock().unwrap().pop_front().unwrap_or_default())
    }
}

struct MockTranscription {
    transcript: Option<String>,
    speech_works: bool,
}

#[async_trait]
impl TranscriptionService for MockTranscription {
    async fn speech_to_text(&self, _audio: &[u8]) -> Result<String, CollaboratorError> {
        self.transcript
            .clone()
            .ok_or_else(|| CollaboratorError::service("could not decode audio"))
    }

    async fn text_to_speech(
        &self,
        text: &str,
        _emotion: Emotion,
    ) -> Result<Vec<u8>, CollaboratorError> {
        if self.speech_works {
            Ok(text.as_bytes().to_vec())
        } else {
            Err(CollaboratorError::Timeout(100))
        }
    }
}

struct RecordingPresence {
    sender: mpsc::UnboundedSender<(Emotion, String)>,
}

#[async_trait]
impl PresenceService for RecordingPresence {
    async fn deliver(
        &self,
        _audio: Vec<u8>,
        emotion: Emotion,
        expression: String,
    ) -> Result<(), CollaboratorError> {
        let _ = self.sender.send((emotion, expression));
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn engine_with(config: EngineConfig) -> Arc<ChallengeEngine> {
    Arc::new(ChallengeEngine::new(config).with_random(Arc::new(FixedIndex(0))))
}

fn engine() -> Arc<ChallengeEngine> {
    engine_with(EngineConfig::default())
}

fn started(completion: Arc<dyn CompletionService>, persona: &str) -> ConversationSession {
    let mut session = ConversationSession::new(engine(), completion);
    session
        .start(persona, UserContext::new("Dana"), OrgContext::new("Acme"))
        .expect("Should start session");
    session
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_end_to_end_efficiency_session() {
    let mut session = started(Arc::new(SilentCompletion), "efficiency");

    for _ in 0..4 {
        session
            .submit_user_utterance("I want to improve our website design")
            .await
            .expect("Submission should succeed");
    }
    assert_eq!(session.phase(), Some(Phase::DeepDive));

    session
        .submit_user_utterance("We will commit to a redesign this week")
        .await
        .unwrap();

    let document = session.request_document().expect("Should synthesize document");
    assert!(
        document
            .insights
            .key_decisions
            .contains(&"We will commit to a redesign this week".to_string()),
        "Commitment should be a key decision: {:?}",
        document.insights.key_decisions
    );
    assert!(document.insights.timeline.contains("this week"));
    assert!(
        document
            .section(THE_BIG_BET)
            .unwrap()
            .content
            .contains("improve our website design")
    );
    assert_eq!(document.title, "EXECUTION BRIEF: Acme");
    assert_eq!(document.metadata.user_name, "Dana");
}

#[tokio::test]
async fn test_unknown_persona_creates_no_session() {
    let mut session = ConversationSession::new(engine(), Arc::new(SilentCompletion));

    let err = session
        .start("nonexistent", UserContext::default(), OrgContext::default())
        .unwrap_err();
    assert!(err.is_unknown_persona());
    assert!(!session.is_active());
    assert_eq!(session.phase(), None);

    let err = session.request_document().unwrap_err();
    assert!(err.is_session_not_started());
    let err = session.submit_user_utterance("hello").await.unwrap_err();
    assert!(err.is_session_not_started());
}

#[tokio::test]
async fn test_failing_completion_uses_canned_reply() {
    let mut session = started(Arc::new(FailingCompletion), "skeptic");

    let outcome = session
        .submit_user_utterance("Our customers love the product")
        .await
        .expect("Completion failure must not be an error");

    assert_eq!(outcome.text(), canned_reply(Phase::Provocation));
    assert_eq!(outcome.turn.speaker, Speaker::Challenger);
    assert!(outcome.is_degraded());
    assert_eq!(outcome.degraded[0].service, ServiceKind::Completion);
    assert_eq!(outcome.pattern_id, None);
    assert_eq!(session.history().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_completion_timeout_is_degraded() {
    let config = EngineConfig {
        completion: CompletionConfig {
            timeout_ms: 50,
            ..CompletionConfig::default()
        },
        ..EngineConfig::default()
    };
    let mut session = ConversationSession::new(engine_with(config), Arc::new(SlowCompletion));
    session
        .start("moonshot", UserContext::default(), OrgContext::default())
        .unwrap();

    let outcome = session.submit_user_utterance("We sell shoes").await.unwrap();
    assert_eq!(outcome.text(), canned_reply(Phase::Provocation));
    assert_eq!(outcome.degraded[0].reason, "timed out after 50 ms");
}

#[tokio::test]
async fn test_keyword_pattern_selected_through_session() {
    let mut session = started(Arc::new(SilentCompletion), "efficiency");

    let outcome = session
        .submit_user_utterance("Our meeting schedule is a mess")
        .await
        .unwrap();
    assert_eq!(
        outcome.pattern_id.as_deref(),
        Some("efficiency.provocation.meeting")
    );
    assert_eq!(
        outcome.text(),
        "How many of those meetings would anyone miss if you deleted them tomorrow?"
    );
    assert_eq!(outcome.emotion, Emotion::Impatient);
    assert_eq!(outcome.expression, "tapping_fingers");
}

#[tokio::test]
async fn test_phase_advances_exactly_at_threshold() {
    let mut session = started(Arc::new(SilentCompletion), "efficiency");

    let first = session.submit_user_utterance("First thought").await.unwrap();
    assert!(!first.advance_pending);

    // Second exchange brings Provocation to four tagged turns.
    let second = session.submit_user_utterance("Second thought").await.unwrap();
    assert!(second.advance_pending);
    assert_eq!(session.phase(), Some(Phase::Provocation));

    let summary = session.summary().unwrap();
    assert_eq!(summary.turns_per_phase.get(&Phase::Provocation), Some(&4));

    let third = session.submit_user_utterance("Third thought").await.unwrap();
    assert_eq!(third.turn.phase, Phase::DeepDive);
    assert_eq!(session.phase(), Some(Phase::DeepDive));
    assert_eq!(session.history()[4].phase, Phase::DeepDive);
    assert_eq!(session.history()[4].speaker, Speaker::User);
}

fn assert_paired_exchanges(history: &[ConversationTurn]) {
    assert_eq!(history.len() % 2, 0, "Every user turn should have a reply");
    for pair in history.chunks(2) {
        assert_eq!(pair[0].speaker, Speaker::User);
        assert_eq!(pair[1].speaker, Speaker::Challenger);
        assert_eq!(pair[0].phase, pair[1].phase);
    }
}

#[tokio::test]
async fn test_history_stays_in_exchange_pairs() {
    let completions: [Arc<dyn CompletionService>; 2] =
        [Arc::new(SilentCompletion), Arc::new(FailingCompletion)];

    for completion in completions {
        let mut session = started(completion, "skeptic");
        for i in 0..9 {
            session
                .submit_user_utterance(&format!("Attempt {} at 20% growth", i))
                .await
                .expect("Submission should succeed");
            assert_paired_exchanges(session.history());
        }
        assert_eq!(session.history().len(), 18);
    }
}

#[tokio::test]
async fn test_phase_never_regresses() {
    let mut session = started(Arc::new(SilentCompletion), "moonshot");
    let mut last = session.phase().unwrap();

    for i in 0..20 {
        session
            .submit_user_utterance(&format!("Idea number {}", i))
            .await
            .unwrap();
        let phase = session.phase().unwrap();
        assert!(phase >= last, "Phase regressed from {} to {}", last, phase);
        assert!(
            last.next().is_none_or(|next| phase <= next),
            "Phase skipped from {} to {}",
            last,
            phase
        );
        last = phase;
    }
    assert_eq!(last, Phase::Output);

    let phases: Vec<Phase> = session.history().iter().map(|turn| turn.phase).collect();
    assert!(phases.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn test_output_phase_uses_generic_challenge() {
    let mut session = started(Arc::new(SilentCompletion), "skeptic");
    for _ in 0..7 {
        session.submit_user_utterance("Still thinking").await.unwrap();
    }
    assert_eq!(session.phase(), Some(Phase::Output));

    let outcome = session.submit_user_utterance("Anything else?").await.unwrap();
    assert_eq!(outcome.turn.phase, Phase::Output);
    assert_eq!(outcome.pattern_id, None);
    assert!(!outcome.is_degraded());
    assert!(!outcome.advance_pending);
}

#[tokio::test]
async fn test_intensity_stays_in_bounds() {
    let mut session = started(Arc::new(SilentCompletion), "efficiency");

    for _ in 0..30 {
        let outcome = session
            .submit_user_utterance("Revenue is up 40% and we have 1,200 users")
            .await
            .unwrap();
        assert!(outcome.intensity <= 1.0);
    }
    assert_eq!(session.intensity(), Some(1.0));

    for _ in 0..30 {
        let value = session.apply_feedback(IntensityFeedback::Soften).unwrap();
        assert!(value >= 0.3);
    }
    assert_eq!(session.intensity(), Some(0.3));

    assert_eq!(session.apply_feedback(IntensityFeedback::Sharpen).unwrap(), 0.4);
}

#[tokio::test]
async fn test_escalation_suffix_after_engagement() {
    let mut session = started(Arc::new(SilentCompletion), "efficiency");

    // 0.7 -> 0.8 -> 0.9; only the third reply is generated above 0.8.
    let first = session.submit_user_utterance("We have 3 teams").await.unwrap();
    let second = session.submit_user_utterance("We have 5 teams").await.unwrap();
    let third = session.submit_user_utterance("We have 8 teams").await.unwrap();

    assert!(!first.text().ends_with("Try again."));
    assert!(!second.text().ends_with("Try again."));
    assert!(third.text().ends_with("Try again."), "got: {}", third.text());
}

#[tokio::test]
async fn test_completion_draft_is_styled() {
    let completion = Arc::new(ScriptedCompletion::with_replies(&[
        "Maybe you should cut the meeting.",
    ]));
    let mut session = started(completion.clone(), "efficiency");

    let outcome = session
        .submit_user_utterance("Our meeting schedule is a mess")
        .await
        .unwrap();
    assert_eq!(outcome.text(), "Definitely you must cut the meeting.");
    assert_eq!(
        outcome.pattern_id.as_deref(),
        Some("efficiency.provocation.meeting")
    );

    let prompts = completion.prompts.lock().unwrap();
    assert!(prompts[0].contains("The Efficiency Maximizer"));
}

#[tokio::test]
async fn test_completion_sees_recent_window() {
    let completion = Arc::new(ScriptedCompletion::default());
    let mut session = started(completion.clone(), "moonshot");

    for i in 0..5 {
        session
            .submit_user_utterance(&format!("Point {}", i))
            .await
            .unwrap();
    }

    let lengths = completion.history_lengths.lock().unwrap().clone();
    assert_eq!(lengths, vec![0, 2, 4, 6, 6]);
}

#[tokio::test]
async fn test_document_is_idempotent() {
    let mut session = started(Arc::new(SilentCompletion), "skeptic");
    session
        .submit_user_utterance("We plan to launch in 10 days")
        .await
        .unwrap();
    session
        .submit_user_utterance("I will decide by Friday")
        .await
        .unwrap();

    let first = session.request_document().unwrap();
    let second = session.request_document().unwrap();
    assert_eq!(first.insights, second.insights);
    assert_eq!(first.content, second.content);
    assert_eq!(first.sections, second.sections);
}

#[tokio::test]
async fn test_end_is_idempotent() {
    let mut session = started(Arc::new(SilentCompletion), "efficiency");
    session.submit_user_utterance("Hello").await.unwrap();

    let summary = session.end().expect("First end returns a summary");
    assert_eq!(summary.total_turns, 2);
    assert_eq!(summary.user_turns, 1);
    assert!(session.end().is_none());
    assert!(session.history().is_empty());
    assert!(matches!(
        session.request_document(),
        Err(CruxError::SessionNotStarted)
    ));
}

#[tokio::test]
async fn test_voice_turn_delivers_to_presence() {
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let voice = VoiceChannel::new(Arc::new(MockTranscription {
        transcript: Some("Our meeting schedule is a mess".to_string()),
        speech_works: true,
    }))
    .with_presence(Arc::new(RecordingPresence { sender }));

    let mut session = started(Arc::new(SilentCompletion), "efficiency").with_voice(voice);
    let turn = session.submit_voice_utterance(b"audio").await.unwrap();

    let VoiceTurn::Answered { transcript, outcome } = turn else {
        panic!("Expected an answered voice turn");
    };
    assert_eq!(transcript, "Our meeting schedule is a mess");
    assert_eq!(outcome.audio.as_deref(), Some(outcome.text().as_bytes()));
    assert!(!outcome.is_degraded());

    let (emotion, expression) = receiver.recv().await.expect("Presence should be called");
    assert_eq!(emotion, Emotion::Impatient);
    assert_eq!(expression, "tapping_fingers");
}

#[tokio::test]
async fn test_failed_transcription_appends_nothing() {
    let voice = VoiceChannel::new(Arc::new(MockTranscription {
        transcript: None,
        speech_works: true,
    }));
    let mut session = started(Arc::new(SilentCompletion), "moonshot").with_voice(voice);

    let turn = session.submit_voice_utterance(b"noise").await.unwrap();
    let VoiceTurn::Unheard(failure) = turn else {
        panic!("Expected an unheard voice turn");
    };
    assert_eq!(failure.service, ServiceKind::Transcription);
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_failed_speech_synthesis_keeps_turn() {
    let voice = VoiceChannel::new(Arc::new(MockTranscription {
        transcript: Some("hello".to_string()),
        speech_works: false,
    }));
    let mut session = started(Arc::new(SilentCompletion), "skeptic").with_voice(voice);

    let outcome = session.submit_user_utterance("Our team is ready").await.unwrap();
    assert!(outcome.audio.is_none());
    assert!(outcome.is_degraded());
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_voice_requires_channel() {
    let mut session = started(Arc::new(SilentCompletion), "efficiency");
    let err = session.submit_voice_utterance(b"audio").await.unwrap_err();
    assert!(err.is_config());
}
