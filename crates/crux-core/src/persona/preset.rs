//! Built-in persona presets.
//!
//! Provides the system-defined challengers every catalog starts from:
//! - **Efficiency**: The Efficiency Maximizer - deletes, simplifies, measures
//! - **Moonshot**: The Moonshot Provocateur - pushes for 10x ambition
//! - **Skeptic**: The Devil's Advocate - runs a pre-mortem on every plan
//!
//! No preset defines patterns for `Phase::Output`; sessions in that phase use
//! the generic challenge.

use std::collections::BTreeMap;

use super::model::{ChallengePattern, Emotion, PersonaDefinition, PersonaId, StyleTransform};
use crate::phase::Phase;
use crate::session::ChallengeType::{
    Assumption, Commitment, Evidence, Prioritization, Reframe, Risk,
};

fn expressions(pairs: &[(Emotion, &str)]) -> BTreeMap<Emotion, String> {
    pairs
        .iter()
        .map(|(emotion, expression)| (*emotion, (*expression).to_string()))
        .collect()
}

fn phrases(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Returns the official preset persona definitions.
pub fn get_default_presets() -> Vec<PersonaDefinition> {
    vec![efficiency(), moonshot(), skeptic()]
}

fn efficiency() -> PersonaDefinition {
    let mut patterns = BTreeMap::new();
    patterns.insert(
        Phase::Provocation,
        vec![
            ChallengePattern::new(
                "efficiency.provocation.meeting",
                Some("meeting"),
                "How many of those meetings would anyone miss if you deleted them tomorrow?",
                Prioritization,
            ),
            ChallengePattern::new(
                "efficiency.provocation.time",
                Some("time"),
                "Where exactly do the hours go? Show me the calendar, not the feeling.",
                Evidence,
            ),
            ChallengePattern::new(
                "efficiency.provocation.team",
                Some("team"),
                "If your team were half the size, what would you stop doing first?",
                Prioritization,
            ),
            ChallengePattern::new(
                "efficiency.provocation.customer",
                Some("customer"),
                "What does the customer actually pay you for, and what are they paying for that nobody uses?",
                Assumption,
            ),
            ChallengePattern::new(
                "efficiency.provocation.revenue",
                Some("revenue"),
                "Which single activity drives most of your revenue, and why isn't everyone working on it?",
                Prioritization,
            ),
            ChallengePattern::new(
                "efficiency.provocation.strategy",
                Some("strategy"),
                "Say the strategy in one sentence. If you can't, you don't have one.",
                Reframe,
            ),
            ChallengePattern::new(
                "efficiency.provocation.delete",
                None,
                "Which process would you delete today if nobody could stop you?",
                Reframe,
            ),
            ChallengePattern::new(
                "efficiency.provocation.why",
                None,
                "Why does this matter more than everything else on your list?",
                Assumption,
            ),
        ],
    );
    patterns.insert(
        Phase::DeepDive,
        vec![
            ChallengePattern::new(
                "efficiency.deep_dive.meeting",
                Some("meeting"),
                "Name the last decision that came out of one of those meetings.",
                Evidence,
            ),
            ChallengePattern::new(
                "efficiency.deep_dive.time",
                Some("time"),
                "How do you know time is the bottleneck and not a symptom?",
                Assumption,
            ),
            ChallengePattern::new(
                "efficiency.deep_dive.team",
                Some("team"),
                "Who on the team owns this outcome, by name?",
                Evidence,
            ),
            ChallengePattern::new(
                "efficiency.deep_dive.customer",
                Some("customer"),
                "What would a customer pay to make this problem disappear?",
                Evidence,
            ),
            ChallengePattern::new(
                "efficiency.deep_dive.revenue",
                Some("revenue"),
                "What happens when this slips a quarter? Put a revenue number on it.",
                Risk,
            ),
            ChallengePattern::new(
                "efficiency.deep_dive.opposite",
                None,
                "What if the opposite of your plan is true?",
                Risk,
            ),
            ChallengePattern::new(
                "efficiency.deep_dive.experiment",
                None,
                "What is the smallest experiment that proves you right in five days?",
                Evidence,
            ),
        ],
    );
    patterns.insert(
        Phase::Synthesis,
        vec![
            ChallengePattern::new(
                "efficiency.synthesis.team",
                Some("team"),
                "Who starts on this Monday morning, and what do they stop doing?",
                Commitment,
            ),
            ChallengePattern::new(
                "efficiency.synthesis.revenue",
                Some("revenue"),
                "What revenue target makes this worth the risk?",
                Commitment,
            ),
            ChallengePattern::new(
                "efficiency.synthesis.deadline",
                None,
                "What exactly are you committing to, and by which date?",
                Commitment,
            ),
            ChallengePattern::new(
                "efficiency.synthesis.numbers",
                None,
                "Which three numbers tell you this worked?",
                Evidence,
            ),
        ],
    );

    let mut emotions = BTreeMap::new();
    emotions.insert(Phase::Provocation, Emotion::Impatient);
    emotions.insert(Phase::DeepDive, Emotion::Skeptical);
    emotions.insert(Phase::Synthesis, Emotion::Intense);
    emotions.insert(Phase::Output, Emotion::Satisfied);

    PersonaDefinition {
        id: PersonaId::Efficiency,
        display_name: "The Efficiency Maximizer".to_string(),
        role: "Operator who treats every process as guilty until proven necessary".to_string(),
        background: "Has rebuilt a dozen operations teams by deleting work first, simplifying second, and only then automating what was left.".to_string(),
        communication_style: "Blunt, numeric, impatient. Short questions, no pleasantries.".to_string(),
        patterns,
        style: StyleTransform::new(
            &[
                ("maybe", "definitely"),
                ("should", "must"),
                ("hopefully", "measurably"),
            ],
            None,
        ),
        emotions,
        expressions: expressions(&[
            (Emotion::Impatient, "tapping_fingers"),
            (Emotion::Skeptical, "raised_eyebrow"),
            (Emotion::Intense, "lean_forward"),
            (Emotion::Satisfied, "nod"),
        ]),
        common_phrases: phrases(&[
            "Delete it.",
            "What's the number?",
            "The best part is no part.",
        ]),
    }
}

fn moonshot() -> PersonaDefinition {
    let mut patterns = BTreeMap::new();
    patterns.insert(
        Phase::Provocation,
        vec![
            ChallengePattern::new(
                "moonshot.provocation.customer",
                Some("customer"),
                "What would make a customer tell ten friends about you without being asked?",
                Reframe,
            ),
            ChallengePattern::new(
                "moonshot.provocation.revenue",
                Some("revenue"),
                "What would you do differently if the revenue goal were ten times higher?",
                Reframe,
            ),
            ChallengePattern::new(
                "moonshot.provocation.strategy",
                Some("strategy"),
                "Is this a strategy or a to-do list? What does winning look like in five years?",
                Assumption,
            ),
            ChallengePattern::new(
                "moonshot.provocation.small",
                None,
                "Why are you aiming this low?",
                Assumption,
            ),
            ChallengePattern::new(
                "moonshot.provocation.impossible",
                None,
                "What would you attempt if you knew you could not fail?",
                Reframe,
            ),
        ],
    );
    patterns.insert(
        Phase::DeepDive,
        vec![
            ChallengePattern::new(
                "moonshot.deep_dive.team",
                Some("team"),
                "What would a team of five do with this problem if they had no legacy to protect?",
                Reframe,
            ),
            ChallengePattern::new(
                "moonshot.deep_dive.physics",
                None,
                "Which constraint here is physics and which one is habit?",
                Assumption,
            ),
            ChallengePattern::new(
                "moonshot.deep_dive.competitor",
                None,
                "What if a startup solved this next month for a tenth of your cost?",
                Risk,
            ),
        ],
    );
    patterns.insert(
        Phase::Synthesis,
        vec![
            ChallengePattern::new(
                "moonshot.synthesis.bet",
                None,
                "What is the one bet you're willing to be wrong about in public?",
                Commitment,
            ),
            ChallengePattern::new(
                "moonshot.synthesis.milestone",
                None,
                "What milestone in the next 30 days would prove this is real?",
                Commitment,
            ),
        ],
    );

    let mut emotions = BTreeMap::new();
    emotions.insert(Phase::Provocation, Emotion::Curious);
    emotions.insert(Phase::DeepDive, Emotion::Intense);
    emotions.insert(Phase::Synthesis, Emotion::Intense);
    emotions.insert(Phase::Output, Emotion::Satisfied);

    PersonaDefinition {
        id: PersonaId::Moonshot,
        display_name: "The Moonshot Provocateur".to_string(),
        role: "Founder who refuses incremental plans".to_string(),
        background: "Built two companies by betting on markets everyone else called too small or too early.".to_string(),
        communication_style: "Energetic, provocative, allergic to incrementalism.".to_string(),
        patterns,
        style: StyleTransform::new(
            &[
                ("better", "10x better"),
                ("improve", "reinvent"),
                ("small", "tiny"),
            ],
            Some("Think bigger. "),
        ),
        emotions,
        expressions: expressions(&[
            (Emotion::Curious, "head_tilt"),
            (Emotion::Intense, "wide_eyes"),
            (Emotion::Satisfied, "grin"),
        ]),
        common_phrases: phrases(&["Why not 10x?", "Small plans are expensive."]),
    }
}

fn skeptic() -> PersonaDefinition {
    let mut patterns = BTreeMap::new();
    patterns.insert(
        Phase::Provocation,
        vec![
            ChallengePattern::new(
                "skeptic.provocation.customer",
                Some("customer"),
                "How do you know customers want this and aren't just being polite?",
                Evidence,
            ),
            ChallengePattern::new(
                "skeptic.provocation.team",
                Some("team"),
                "Why would your team succeed at this when they struggled with the last initiative?",
                Assumption,
            ),
            ChallengePattern::new(
                "skeptic.provocation.premise",
                None,
                "Why do you believe this is the real problem?",
                Assumption,
            ),
        ],
    );
    patterns.insert(
        Phase::DeepDive,
        vec![
            ChallengePattern::new(
                "skeptic.deep_dive.revenue",
                Some("revenue"),
                "What breaks first if revenue drops 20% while you do this?",
                Risk,
            ),
            ChallengePattern::new(
                "skeptic.deep_dive.failure",
                None,
                "It's a year from now and this failed. What happened when it went wrong?",
                Risk,
            ),
            ChallengePattern::new(
                "skeptic.deep_dive.evidence",
                None,
                "How do you know that? What data would change your mind?",
                Evidence,
            ),
        ],
    );
    patterns.insert(
        Phase::Synthesis,
        vec![
            ChallengePattern::new(
                "skeptic.synthesis.kill",
                None,
                "What result would make you kill this plan, and by when?",
                Commitment,
            ),
            ChallengePattern::new(
                "skeptic.synthesis.risk",
                None,
                "Which risk are you accepting on purpose?",
                Risk,
            ),
        ],
    );

    let mut emotions = BTreeMap::new();
    emotions.insert(Phase::Provocation, Emotion::Skeptical);
    emotions.insert(Phase::DeepDive, Emotion::Skeptical);
    emotions.insert(Phase::Synthesis, Emotion::Intense);
    emotions.insert(Phase::Output, Emotion::Neutral);

    PersonaDefinition {
        id: PersonaId::Skeptic,
        display_name: "The Devil's Advocate".to_string(),
        role: "Board member who has watched confident plans fail".to_string(),
        background: "Spent twenty years on investment committees reviewing plans after they failed.".to_string(),
        communication_style: "Calm, dry, relentless about evidence.".to_string(),
        patterns,
        style: StyleTransform::new(
            &[("definitely", "supposedly"), ("sure", "confident")],
            Some("Devil's advocate: "),
        ),
        emotions,
        expressions: expressions(&[
            (Emotion::Skeptical, "narrowed_eyes"),
            (Emotion::Intense, "steepled_fingers"),
            (Emotion::Neutral, "neutral"),
        ]),
        common_phrases: phrases(&["Prove it.", "What would change your mind?"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_default_presets_cover_every_persona() {
        let presets = get_default_presets();
        assert_eq!(presets.len(), PersonaId::iter().count());
        for id in PersonaId::iter() {
            assert!(presets.iter().any(|p| p.id == id), "missing preset {}", id);
        }
    }

    #[test]
    fn test_pattern_ids_are_unique() {
        let mut ids = HashSet::new();
        for persona in get_default_presets() {
            for patterns in persona.patterns.values() {
                for pattern in patterns {
                    assert!(
                        ids.insert(pattern.id.clone()),
                        "Pattern IDs must be unique, found duplicate: {}",
                        pattern.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_output_phase_has_no_patterns() {
        for persona in get_default_presets() {
            assert!(persona.patterns_for(Phase::Output).is_empty());
            for phase in [Phase::Provocation, Phase::DeepDive, Phase::Synthesis] {
                assert!(
                    !persona.patterns_for(phase).is_empty(),
                    "{} has no patterns for {}",
                    persona.id,
                    phase
                );
            }
        }
    }

    #[test]
    fn test_every_phase_emotion_has_an_expression() {
        for persona in get_default_presets() {
            for phase in Phase::iter() {
                let emotion = persona.emotion_for(phase);
                assert_ne!(
                    persona.expression_for(emotion),
                    "",
                    "{} has an empty expression for {}",
                    persona.id,
                    emotion
                );
            }
        }
    }
}
