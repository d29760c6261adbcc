//! Phase transition policy.
//!
//! A pure function of phase and history: a phase is complete once the number
//! of turns tagged with it (both speakers) reaches its threshold. `Output` is
//! terminal.

use crate::config::PhaseThresholds;
use crate::phase::Phase;
use crate::session::ConversationTurn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseTransitionPolicy {
    thresholds: PhaseThresholds,
}

impl PhaseTransitionPolicy {
    pub fn new(thresholds: PhaseThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &PhaseThresholds {
        &self.thresholds
    }

    /// Number of turns in `history` tagged with `phase`.
    pub fn turns_in_phase(&self, phase: Phase, history: &[ConversationTurn]) -> usize {
        history.iter().filter(|turn| turn.phase == phase).count()
    }

    /// Whether a phase with `tagged_turns` turns has met its threshold.
    pub fn threshold_met(&self, phase: Phase, tagged_turns: usize) -> bool {
        self.thresholds
            .for_phase(phase)
            .is_some_and(|threshold| tagged_turns >= threshold)
    }

    /// Whether the session should leave `phase` given `history`.
    pub fn should_advance(&self, phase: Phase, history: &[ConversationTurn]) -> bool {
        self.threshold_met(phase, self.turns_in_phase(phase, history))
    }

    /// Whether `phase` will be complete once one more turn tagged with it (the
    /// reply about to be appended) joins `history`.
    pub fn should_advance_after_reply(&self, phase: Phase, history: &[ConversationTurn]) -> bool {
        self.threshold_met(phase, self.turns_in_phase(phase, history) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(phase: Phase, count: usize) -> Vec<ConversationTurn> {
        (0..count)
            .map(|i| {
                if i % 2 == 0 {
                    ConversationTurn::user(format!("user {}", i), phase)
                } else {
                    ConversationTurn::challenger(format!("challenger {}", i), phase, None)
                }
            })
            .collect()
    }

    #[test]
    fn test_advances_exactly_at_threshold() {
        let policy = PhaseTransitionPolicy::default();
        assert!(!policy.should_advance(Phase::Provocation, &history(Phase::Provocation, 3)));
        assert!(policy.should_advance(Phase::Provocation, &history(Phase::Provocation, 4)));
    }

    #[test]
    fn test_only_counts_current_phase() {
        let policy = PhaseTransitionPolicy::default();
        let mut turns = history(Phase::Provocation, 4);
        turns.extend(history(Phase::DeepDive, 3));

        assert!(!policy.should_advance(Phase::DeepDive, &turns));
        turns.push(ConversationTurn::challenger("last", Phase::DeepDive, None));
        assert!(policy.should_advance(Phase::DeepDive, &turns));
    }

    #[test]
    fn test_output_is_terminal() {
        let policy = PhaseTransitionPolicy::default();
        assert!(!policy.should_advance(Phase::Output, &history(Phase::Output, 100)));
        assert!(!policy.should_advance_after_reply(Phase::Output, &history(Phase::Output, 100)));
    }

    #[test]
    fn test_after_reply_counts_pending_turn() {
        let policy = PhaseTransitionPolicy::default();
        let turns = history(Phase::Synthesis, 3);
        assert!(!policy.should_advance(Phase::Synthesis, &turns));
        assert!(policy.should_advance_after_reply(Phase::Synthesis, &turns));
    }

    #[test]
    fn test_custom_thresholds() {
        let policy = PhaseTransitionPolicy::new(PhaseThresholds {
            provocation: 2,
            deep_dive: 6,
            synthesis: 1,
        });
        assert!(policy.should_advance(Phase::Provocation, &history(Phase::Provocation, 2)));
        assert!(!policy.should_advance(Phase::DeepDive, &history(Phase::DeepDive, 5)));
        assert!(policy.should_advance(Phase::Synthesis, &history(Phase::Synthesis, 1)));
    }
}
