//! Persona domain module.
//!
//! This module contains the challenger persona model, the built-in presets,
//! and the read-only catalog sessions look personas up in.
//!
//! # Module Structure
//!
//! - `model`: Persona domain models (`PersonaDefinition`, `PersonaId`, `Emotion`, `StyleTransform`)
//! - `preset`: Built-in challenger personas
//! - `catalog`: Read-only lookup by persona id
//!
//! # Usage
//!
//! ```ignore
//! use crux_core::persona::{PersonaCatalog, PersonaDefinition, PersonaId};
//! ```

mod catalog;
mod model;
mod preset;

// Re-export public API
pub use catalog::PersonaCatalog;
pub use model::{ChallengePattern, Emotion, PersonaDefinition, PersonaId, StyleTransform};
pub use preset::get_default_presets;
