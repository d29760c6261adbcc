//! Conversation turn types.
//!
//! This module contains types for representing turns in a challenge dialogue,
//! including who spoke and which phase the turn belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::phase::Phase;

/// Represents who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// Turn supplied by the user.
    User,
    /// Turn produced by the persona.
    Challenger,
}

/// The kind of pressure a challenger turn applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeType {
    /// Questions a premise the user takes for granted.
    Assumption,
    /// Demands data or proof.
    Evidence,
    /// Forces a choice between competing priorities.
    Prioritization,
    /// Asks the user to commit to an action or date.
    Commitment,
    /// Surfaces failure modes.
    Risk,
    /// Restates the problem from a different angle.
    Reframe,
}

/// A single turn in the conversation history.
///
/// Turns are immutable once appended; the history is append-only and its order
/// is authoritative for extraction and transition decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who authored the turn.
    pub speaker: Speaker,
    /// The content of the turn.
    pub content: String,
    /// When the turn was appended.
    pub timestamp: DateTime<Utc>,
    /// The session phase at the time of the turn.
    pub phase: Phase,
    /// Challenge tag, present on challenger turns generated from a pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_type: Option<ChallengeType>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>, phase: Phase) -> Self {
        Self {
            speaker: Speaker::User,
            content: content.into(),
            timestamp: Utc::now(),
            phase,
            challenge_type: None,
        }
    }

    pub fn challenger(
        content: impl Into<String>,
        phase: Phase,
        challenge_type: Option<ChallengeType>,
    ) -> Self {
        Self {
            speaker: Speaker::Challenger,
            content: content.into(),
            timestamp: Utc::now(),
            phase,
            challenge_type,
        }
    }

    pub fn is_user(&self) -> bool {
        self.speaker == Speaker::User
    }

    pub fn is_challenger(&self) -> bool {
        self.speaker == Speaker::Challenger
    }
}
