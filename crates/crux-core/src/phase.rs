//! Conversation phases.
//!
//! A session walks the phases strictly in declaration order. The derived `Ord`
//! is the total order used by every monotonicity check.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

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
pub enum Phase {
    /// Opening challenges that question the premise.
    Provocation,
    /// Evidence and root-cause probing.
    DeepDive,
    /// Pushing the user to commit.
    Synthesis,
    /// Terminal: the transcript is ready for a document.
    Output,
}

impl Phase {
    /// The phase every session starts in.
    pub const INITIAL: Phase = Phase::Provocation;

    /// Returns the phase that follows this one, or `None` for the terminal phase.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Provocation => Some(Phase::DeepDive),
            Phase::DeepDive => Some(Phase::Synthesis),
            Phase::Synthesis => Some(Phase::Output),
            Phase::Output => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Human-readable phase title.
    pub fn title(self) -> &'static str {
        match self {
            Phase::Provocation => "Provocation",
            Phase::DeepDive => "Deep Dive",
            Phase::Synthesis => "Synthesis",
            Phase::Output => "Output",
        }
    }

    /// Guidance given to the completion service while the session is in this phase.
    pub fn guidance(self) -> &'static str {
        match self {
            Phase::Provocation => {
                "Challenge the premise. Ask one short, pointed question that exposes \
                 the weakest assumption in what the user just said. Do not offer advice."
            }
            Phase::DeepDive => {
                "Probe for evidence. Demand numbers, owners, and root causes. \
                 Reject vague answers and ask how the user knows."
            }
            Phase::Synthesis => {
                "Force a commitment. Ask what the user will decide, by when, \
                 and which metric proves it worked."
            }
            Phase::Output => {
                "The challenge is complete. Acknowledge the commitments briefly and \
                 invite the user to request the strategy document."
            }
        }
    }
}
