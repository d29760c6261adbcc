//! Closing strategy documents.

mod model;
mod sections;
mod synthesizer;
pub mod template;

pub use model::{Document, DocumentMetadata, DocumentSection};
pub use sections::{render_section, summary_block};
pub use synthesizer::{DocumentSynthesizer, SUMMARY_HEADING};
pub use template::{DocumentTemplate, DocumentTemplates};
