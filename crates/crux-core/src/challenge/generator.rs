//! Challenge selection and shaping.
//!
//! Selection order: the first keyword from [`PATTERN_KEYWORDS`] found in the
//! lowercased utterance picks the phase's pattern for that keyword; otherwise a
//! pattern is drawn from the injected random source. The persona style
//! transform runs next, then intensity escalation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::random::{RandomSource, ThreadRandom};
use crate::config::IntensityConfig;
use crate::error::{CruxError, Result};
use crate::persona::{ChallengePattern, Emotion, PersonaDefinition};
use crate::phase::Phase;
use crate::session::{ChallengeType, ConversationTurn};
use crate::transition::PhaseTransitionPolicy;

/// Keywords scanned in order against the lowercased utterance.
pub const PATTERN_KEYWORDS: [&str; 6] = ["meeting", "time", "team", "customer", "revenue", "strategy"];

/// A generated challenger utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    /// Id of the pattern the text was built from
    pub pattern_id: String,
    /// Final text after style transform and escalation
    pub text: String,
    pub challenge_type: ChallengeType,
    pub emotion: Emotion,
    /// Set when the reply completes the phase's turn budget
    pub should_advance_phase: bool,
}

/// Persona-agnostic challenge used when a persona has nothing for a phase.
pub fn generic_challenge(phase: Phase) -> &'static str {
    match phase {
        Phase::Provocation => "What is the one assumption in your plan you have never tested?",
        Phase::DeepDive => "What evidence would convince a skeptic that you are right?",
        Phase::Synthesis => "What will you do differently starting tomorrow?",
        Phase::Output => {
            "We have what we need. Ask for the strategy document when you are ready."
        }
    }
}

pub struct ChallengeGenerator {
    policy: PhaseTransitionPolicy,
    escalation_threshold: f64,
    escalation_suffix: String,
    random: Arc<dyn RandomSource>,
}

impl ChallengeGenerator {
    pub fn new(
        policy: PhaseTransitionPolicy,
        intensity: &IntensityConfig,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            policy,
            escalation_threshold: intensity.escalation_threshold,
            escalation_suffix: intensity.escalation_suffix.clone(),
            random,
        }
    }

    /// Generator with default intensity settings and the thread RNG.
    pub fn with_policy(policy: PhaseTransitionPolicy) -> Self {
        Self::new(policy, &IntensityConfig::default(), Arc::new(ThreadRandom))
    }

    /// Generates the challenger reply to `utterance`.
    ///
    /// `history` is the transcript including the user turn being answered.
    ///
    /// # Errors
    ///
    /// Returns `CruxError::NoPatternsForPhase` if the persona defines no
    /// patterns for `phase`; callers fall back to [`generic_challenge`].
    pub fn generate(
        &self,
        persona: &PersonaDefinition,
        phase: Phase,
        utterance: &str,
        history: &[ConversationTurn],
        intensity: f64,
    ) -> Result<Challenge> {
        let pattern = self.select_pattern(persona, phase, utterance)?;
        let text = self.refine(persona, &pattern.text, intensity);
        let should_advance_phase = self.policy.should_advance_after_reply(phase, history);

        tracing::debug!(
            persona = %persona.id,
            phase = %phase,
            pattern_id = %pattern.id,
            intensity,
            should_advance_phase,
            "Generated challenge"
        );

        Ok(Challenge {
            pattern_id: pattern.id.clone(),
            text,
            challenge_type: pattern.challenge_type,
            emotion: persona.emotion_for(phase),
            should_advance_phase,
        })
    }

    /// Picks the pattern for `utterance`: keyword match first, random otherwise.
    pub fn select_pattern<'a>(
        &self,
        persona: &'a PersonaDefinition,
        phase: Phase,
        utterance: &str,
    ) -> Result<&'a ChallengePattern> {
        let patterns = persona.patterns_for(phase);
        if patterns.is_empty() {
            return Err(CruxError::NoPatternsForPhase {
                persona: persona.id.to_string(),
                phase,
            });
        }

        if let Some(pattern) = keyword_pattern(patterns, utterance) {
            return Ok(pattern);
        }

        let index = self.random.pick_index(patterns.len());
        Ok(&patterns[index])
    }

    /// Applies the persona style transform and intensity escalation to any
    /// text, including completion drafts.
    pub fn refine(&self, persona: &PersonaDefinition, text: &str, intensity: f64) -> String {
        let styled = persona.apply_style(text.trim());
        self.escalate(styled, intensity)
    }

    fn escalate(&self, text: String, intensity: f64) -> String {
        if intensity > self.escalation_threshold {
            format!("{} {}", text.trim_end(), self.escalation_suffix)
        } else {
            text
        }
    }
}

fn keyword_pattern<'a>(patterns: &'a [ChallengePattern], utterance: &str) -> Option<&'a ChallengePattern> {
    let lowered = utterance.to_lowercase();
    PATTERN_KEYWORDS
        .iter()
        .filter(|keyword| lowered.contains(*keyword))
        .find_map(|keyword| {
            patterns
                .iter()
                .find(|pattern| pattern.keyword.as_deref() == Some(*keyword))
        })
}
