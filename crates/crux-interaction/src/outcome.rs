//! Values returned to the host after each session call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crux_core::{ConversationTurn, Emotion, Phase, PersonaId, ServiceDegraded};

/// Result of one user submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// The challenger turn appended to the history
    pub turn: ConversationTurn,
    /// Pattern the reply was selected from; `None` for canned and generic replies
    pub pattern_id: Option<String>,
    pub emotion: Emotion,
    /// Presence expression for `emotion`
    pub expression: String,
    /// Intensity after the submission was observed
    pub intensity: f64,
    /// The phase changes at the start of the next submission
    pub advance_pending: bool,
    /// Synthesized speech, when a voice channel is attached and TTS succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<Vec<u8>>,
    /// Collaborator failures absorbed while producing this turn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<ServiceDegraded>,
}

impl TurnOutcome {
    pub fn text(&self) -> &str {
        &self.turn.content
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// Result of a voice submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VoiceTurn {
    /// Transcribed and answered
    Answered {
        transcript: String,
        outcome: TurnOutcome,
    },
    /// Transcription failed; nothing was appended
    Unheard(ServiceDegraded),
}

impl VoiceTurn {
    pub fn outcome(&self) -> Option<&TurnOutcome> {
        match self {
            Self::Answered { outcome, .. } => Some(outcome),
            Self::Unheard(_) => None,
        }
    }
}

/// Snapshot of a session for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub persona: PersonaId,
    pub phase: Phase,
    pub intensity: f64,
    pub total_turns: usize,
    pub user_turns: usize,
    pub challenger_turns: usize,
    pub turns_per_phase: BTreeMap<Phase, usize>,
    pub started_at: DateTime<Utc>,
    pub duration_secs: i64,
}

impl SessionSummary {
    pub fn from_history(
        session_id: Uuid,
        persona: PersonaId,
        phase: Phase,
        intensity: f64,
        history: &[ConversationTurn],
        started_at: DateTime<Utc>,
    ) -> Self {
        let mut turns_per_phase = BTreeMap::new();
        for turn in history {
            *turns_per_phase.entry(turn.phase).or_insert(0) += 1;
        }
        let user_turns = history.iter().filter(|turn| turn.is_user()).count();

        Self {
            session_id,
            persona,
            phase,
            intensity,
            total_turns: history.len(),
            user_turns,
            challenger_turns: history.len() - user_turns,
            turns_per_phase,
            started_at,
            duration_secs: (Utc::now() - started_at).num_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let history = vec![
            ConversationTurn::user("a", Phase::Provocation),
            ConversationTurn::challenger("b", Phase::Provocation, None),
            ConversationTurn::user("c", Phase::DeepDive),
        ];
        let summary = SessionSummary::from_history(
            Uuid::new_v4(),
            PersonaId::Efficiency,
            Phase::DeepDive,
            0.7,
            &history,
            Utc::now(),
        );

        assert_eq!(summary.total_turns, 3);
        assert_eq!(summary.user_turns, 2);
        assert_eq!(summary.challenger_turns, 1);
        assert_eq!(summary.turns_per_phase.get(&Phase::Provocation), Some(&2));
        assert_eq!(summary.turns_per_phase.get(&Phase::Synthesis), None);
        assert!(summary.duration_secs >= 0);
    }
}
