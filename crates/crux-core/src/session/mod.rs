//! Session domain module.
//!
//! This module contains the transcript types a conversation session is built
//! from, plus the user and organization context supplied at start.
//!
//! # Module Structure
//!
//! - `message`: Turn types (`Speaker`, `ChallengeType`, `ConversationTurn`)
//! - `context`: Start-time context (`UserContext`, `OrgContext`)
//!
//! # Usage
//!
//! ```ignore
//! use crux_core::session::{ConversationTurn, Speaker, UserContext, OrgContext};
//! ```

mod context;
mod message;

// Re-export public API
pub use context::{OrgContext, UserContext};
pub use message::{ChallengeType, ConversationTurn, Speaker};
