//! Heuristic insight extraction over a conversation transcript.
//!
//! Insights are derived on demand and never cached. Every category is computed
//! by an independent pure function in [`rules`], so the same history always
//! yields the same insights.

pub mod rules;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::session::ConversationTurn;

pub use rules::split_sentences;

/// Structured findings pulled out of a transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub goals: BTreeSet<String>,
    /// Most repeated goal, earliest on ties
    #[serde(default)]
    pub lead_goal: Option<String>,
    /// At most five, in transcript order
    pub challenged_assumptions: Vec<String>,
    /// The three most recent
    pub key_decisions: Vec<String>,
    /// The three most recent
    pub next_steps: Vec<String>,
    /// At most three, in transcript order
    pub risk_factors: Vec<String>,
    pub metrics: BTreeSet<String>,
    pub timeline: BTreeSet<String>,
}

impl Insights {
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
            && self.challenged_assumptions.is_empty()
            && self.key_decisions.is_empty()
            && self.next_steps.is_empty()
            && self.risk_factors.is_empty()
            && self.metrics.is_empty()
            && self.timeline.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InsightExtractor;

impl InsightExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, history: &[ConversationTurn]) -> Insights {
        let insights = Insights {
            goals: rules::extract_goals(history),
            lead_goal: rules::lead_goal(history),
            challenged_assumptions: rules::extract_challenged_assumptions(history),
            key_decisions: rules::extract_key_decisions(history),
            next_steps: rules::extract_next_steps(history),
            risk_factors: rules::extract_risk_factors(history),
            metrics: rules::extract_metrics(history),
            timeline: rules::extract_timeline(history),
        };

        tracing::debug!(
            turns = history.len(),
            goals = insights.goals.len(),
            decisions = insights.key_decisions.len(),
            risks = insights.risk_factors.len(),
            "Extracted insights"
        );

        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Phase;

    #[test]
    fn test_empty_history() {
        assert!(InsightExtractor::new().extract(&[]).is_empty());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let history = vec![
            ConversationTurn::user("I want to improve our website design", Phase::Provocation),
            ConversationTurn::challenger(
                "Why does this matter more than everything else on your list?",
                Phase::Provocation,
                None,
            ),
            ConversationTurn::user("We will commit to a redesign this week", Phase::DeepDive),
        ];

        let extractor = InsightExtractor::new();
        let first = extractor.extract(&history);
        let second = extractor.extract(&history);
        assert_eq!(first, second);

        assert!(first.goals.contains("improve our website design"));
        assert_eq!(first.lead_goal.as_deref(), Some("improve our website design"));
        assert_eq!(first.key_decisions, vec!["We will commit to a redesign this week"]);
        assert!(first.timeline.contains("this week"));
        assert_eq!(first.challenged_assumptions.len(), 1);
    }
}
