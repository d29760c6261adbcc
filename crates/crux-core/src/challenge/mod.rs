//! Challenge generation: pattern selection, persona styling, escalation.

mod generator;
mod random;

pub use generator::{Challenge, ChallengeGenerator, PATTERN_KEYWORDS, generic_challenge};
pub use random::{FixedIndex, RandomSource, SeededRandom, ThreadRandom};
