//! Challenge intensity model.
//!
//! Intensity rises by a fixed step whenever the user engages with specifics
//! (numbers, metrics, data terms) and only falls on an explicit soften signal.
//! The value never leaves `[floor, ceiling]`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::IntensityConfig;

static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("valid regex"));

static DATA_TERMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(data|metrics?|kpis?|percent|percentage|revenue|conversion|retention|growth|roi|churn|users|customers)\b|[%$]",
    )
    .expect("valid regex")
});

/// Returns true when the utterance shows engagement markers: a number, a
/// percent or currency sign, or a data/metric term.
pub fn has_engagement_marker(utterance: &str) -> bool {
    DIGIT.is_match(utterance) || DATA_TERMS.is_match(utterance)
}

/// External feedback signal that moves intensity by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityFeedback {
    /// The user asked the challenger to ease off.
    Soften,
    /// The user asked for more pressure.
    Sharpen,
}

/// Intensity scalar owned by one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeIntensity {
    value: f64,
    step: f64,
    floor: f64,
    ceiling: f64,
}

impl ChallengeIntensity {
    pub fn new(config: &IntensityConfig) -> Self {
        Self {
            value: round2(config.initial.clamp(config.floor, config.ceiling)),
            step: config.step,
            floor: config.floor,
            ceiling: config.ceiling,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Raises intensity by one step, capped at the ceiling.
    pub fn escalate(&mut self) {
        self.value = round2((self.value + self.step).min(self.ceiling));
    }

    /// Lowers intensity by one step, floored.
    pub fn soften(&mut self) {
        self.value = round2((self.value - self.step).max(self.floor));
    }

    pub fn apply_feedback(&mut self, feedback: IntensityFeedback) {
        match feedback {
            IntensityFeedback::Soften => self.soften(),
            IntensityFeedback::Sharpen => self.escalate(),
        }
    }

    /// Escalates if the utterance carries an engagement marker. Returns whether
    /// it did.
    pub fn observe_utterance(&mut self, utterance: &str) -> bool {
        if has_engagement_marker(utterance) {
            self.escalate();
            true
        } else {
            false
        }
    }
}

// Keeps repeated 0.1 steps from drifting (0.7 + 0.1 would otherwise be 0.7999...).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
