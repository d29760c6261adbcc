//! Domain layer of the Crux challenge engine.
//!
//! A session walks a user through four ordered phases while a persona
//! challenges every statement. This crate holds the pieces that do not
//! depend on I/O: persona catalog, challenge generation, intensity, phase
//! transitions, insight extraction and document synthesis, plus the traits
//! the interaction layer uses to reach external services.

pub mod challenge;
pub mod collaborator;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod insight;
pub mod intensity;
pub mod persona;
pub mod phase;
pub mod session;
pub mod transition;

pub use challenge::{Challenge, ChallengeGenerator, RandomSource};
pub use collaborator::{
    CollaboratorError, CompletionReply, CompletionService, PresenceService, TranscriptionService,
};
pub use config::EngineConfig;
pub use document::{Document, DocumentSynthesizer};
pub use engine::ChallengeEngine;
pub use error::{CruxError, Result, ServiceDegraded, ServiceKind};
pub use insight::{InsightExtractor, Insights};
pub use intensity::{ChallengeIntensity, IntensityFeedback};
pub use persona::{Emotion, PersonaCatalog, PersonaDefinition, PersonaId};
pub use phase::Phase;
pub use session::{ChallengeType, ConversationTurn, OrgContext, Speaker, UserContext};
pub use transition::PhaseTransitionPolicy;
