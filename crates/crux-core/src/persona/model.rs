//! Persona domain model.
//!
//! Represents the challenger personas a session can be run against. Each
//! persona carries its phrasing patterns per phase, a deterministic style
//! rewrite, and the emotion/expression it presents in each phase.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};

use crate::phase::Phase;
use crate::session::ChallengeType;

/// Closed set of built-in personas.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PersonaId {
    /// Ruthless operator: delete, simplify, measure.
    Efficiency,
    /// Provocateur who pushes for 10x ambition.
    Moonshot,
    /// Devil's advocate running a pre-mortem.
    Skeptic,
}

/// Emotion a persona presents; forwarded to voice and presence services.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Emotion {
    Neutral,
    Curious,
    Skeptical,
    Impatient,
    Intense,
    Satisfied,
}

/// A template utterance a persona can use in a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengePattern {
    /// Stable identifier, unique within the catalog
    pub id: String,
    /// Keyword that selects this pattern deterministically, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// The utterance before style transform
    pub text: String,
    /// Kind of pressure the utterance applies
    pub challenge_type: ChallengeType,
}

impl ChallengePattern {
    pub fn new(
        id: impl Into<String>,
        keyword: Option<&str>,
        text: impl Into<String>,
        challenge_type: ChallengeType,
    ) -> Self {
        Self {
            id: id.into(),
            keyword: keyword.map(str::to_string),
            text: text.into(),
            challenge_type,
        }
    }
}

#[derive(Debug, Clone)]
struct Substitution {
    pattern: Regex,
    replacement: String,
}

/// Persona-specific deterministic text rewrite.
///
/// Whole-word, case-insensitive substitutions run first (a capitalized match
/// yields a capitalized replacement), then the optional prefix is prepended.
#[derive(Debug, Clone, Default)]
pub struct StyleTransform {
    substitutions: Vec<Substitution>,
    prefix: Option<String>,
}

impl StyleTransform {
    pub fn new(substitutions: &[(&str, &str)], prefix: Option<&str>) -> Self {
        let substitutions = substitutions
            .iter()
            .filter_map(|(from, to)| {
                let source = format!(r"(?i)\b{}\b", regex::escape(from));
                match Regex::new(&source) {
                    Ok(pattern) => Some(Substitution {
                        pattern,
                        replacement: (*to).to_string(),
                    }),
                    Err(e) => {
                        tracing::warn!(word = %from, error = %e, "Skipping invalid style substitution");
                        None
                    }
                }
            })
            .collect();

        Self {
            substitutions,
            prefix: prefix.map(str::to_string),
        }
    }

    /// A transform that returns its input unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();

        for substitution in &self.substitutions {
            result = substitution
                .pattern
                .replace_all(&result, |caps: &Captures<'_>| {
                    match_case(&caps[0], &substitution.replacement)
                })
                .into_owned();
        }

        match &self.prefix {
            Some(prefix) if !result.starts_with(prefix.as_str()) => {
                format!("{}{}", prefix, result)
            }
            _ => result,
        }
    }
}

fn match_case(matched: &str, replacement: &str) -> String {
    let starts_upper = matched.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return replacement.to_string();
    }

    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A persona representing a challenger with a fixed voice.
///
/// Definitions are immutable once the catalog is built.
#[derive(Debug, Clone)]
pub struct PersonaDefinition {
    /// Catalog identifier
    pub id: PersonaId,
    /// Display name of the persona
    pub display_name: String,
    /// Role or title describing the persona
    pub role: String,
    /// Background description used in the system prompt
    pub background: String,
    /// Communication style characteristics
    pub communication_style: String,
    /// Ordered template utterances per phase
    pub patterns: BTreeMap<Phase, Vec<ChallengePattern>>,
    /// Deterministic rewrite applied to every generated utterance
    pub style: StyleTransform,
    /// Emotion presented in each phase
    pub emotions: BTreeMap<Phase, Emotion>,
    /// Presence expression for each emotion
    pub expressions: BTreeMap<Emotion, String>,
    /// Signature phrases the persona is known for
    pub common_phrases: Vec<String>,
}

impl PersonaDefinition {
    /// Returns the patterns for a phase (empty when the persona defines none).
    pub fn patterns_for(&self, phase: Phase) -> &[ChallengePattern] {
        self.patterns.get(&phase).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn emotion_for(&self, phase: Phase) -> Emotion {
        self.emotions.get(&phase).copied().unwrap_or(Emotion::Neutral)
    }

    pub fn expression_for(&self, emotion: Emotion) -> &str {
        self.expressions
            .get(&emotion)
            .map(String::as_str)
            .unwrap_or("neutral")
    }

    pub fn apply_style(&self, text: &str) -> String {
        self.style.apply(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_transform_whole_words() {
        let style = StyleTransform::new(&[("should", "must"), ("try", "commit")], None);
        assert_eq!(
            style.apply("You should try harder, not retry."),
            "You must commit harder, not retry."
        );
    }

    #[test]
    fn test_style_transform_preserves_capitalization() {
        let style = StyleTransform::new(&[("maybe", "definitely")], None);
        assert_eq!(style.apply("Maybe later."), "Definitely later.");
    }

    #[test]
    fn test_style_prefix_applied_once() {
        let style = StyleTransform::new(&[], Some("Think bigger. "));
        let once = style.apply("What would 10x look like?");
        assert_eq!(once, "Think bigger. What would 10x look like?");
        assert_eq!(style.apply(&once), once);
    }

    #[test]
    fn test_identity_transform() {
        assert_eq!(StyleTransform::identity().apply("unchanged"), "unchanged");
    }
}
