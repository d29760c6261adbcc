//! Conversation sessions on top of the Crux domain layer.
//!
//! [`ConversationSession`] sequences turns, calls the completion service with a
//! rendered persona prompt, absorbs collaborator failures with canned replies,
//! and hands finished transcripts to the document synthesizer.

pub mod fallback;
pub mod outcome;
pub mod prompt;
pub mod session;
pub mod voice;

pub use outcome::{SessionSummary, TurnOutcome, VoiceTurn};
pub use prompt::render_system_prompt;
pub use session::ConversationSession;
pub use voice::VoiceChannel;
