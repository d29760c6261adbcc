//! Per-persona document templates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CruxError, Result};
use crate::persona::PersonaId;

pub const THE_BIG_BET: &str = "THE BIG BET";
pub const KEY_DECISIONS: &str = "KEY DECISIONS";
pub const METRICS_THAT_MATTER: &str = "METRICS THAT MATTER";
pub const RISKS_WE_ACCEPT: &str = "RISKS WE ACCEPT";
pub const NEXT_STEPS: &str = "NEXT STEPS";
pub const ASSUMPTIONS_CHALLENGED: &str = "ASSUMPTIONS CHALLENGED";
pub const TIMELINE: &str = "TIMELINE";

/// Title and ordered section names of a persona's closing document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTemplate {
    pub title: String,
    pub sections: Vec<String>,
}

impl DocumentTemplate {
    pub fn new(title: impl Into<String>, sections: &[&str]) -> Self {
        Self {
            title: title.into(),
            sections: sections.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Read-only registry of templates keyed by persona.
#[derive(Debug, Clone)]
pub struct DocumentTemplates {
    templates: BTreeMap<PersonaId, DocumentTemplate>,
}

impl DocumentTemplates {
    /// Templates for every built-in persona.
    pub fn builtin() -> Self {
        Self::empty()
            .with_template(
                PersonaId::Efficiency,
                DocumentTemplate::new(
                    "EXECUTION BRIEF",
                    &[THE_BIG_BET, KEY_DECISIONS, METRICS_THAT_MATTER, RISKS_WE_ACCEPT, NEXT_STEPS],
                ),
            )
            .with_template(
                PersonaId::Moonshot,
                DocumentTemplate::new(
                    "MOONSHOT MANIFESTO",
                    &[THE_BIG_BET, ASSUMPTIONS_CHALLENGED, METRICS_THAT_MATTER, TIMELINE, NEXT_STEPS],
                ),
            )
            .with_template(
                PersonaId::Skeptic,
                DocumentTemplate::new(
                    "PRE-MORTEM",
                    &[THE_BIG_BET, ASSUMPTIONS_CHALLENGED, RISKS_WE_ACCEPT, KEY_DECISIONS, TIMELINE],
                ),
            )
    }

    pub fn empty() -> Self {
        Self {
            templates: BTreeMap::new(),
        }
    }

    /// Adds or replaces the template for `persona`.
    pub fn with_template(mut self, persona: PersonaId, template: DocumentTemplate) -> Self {
        self.templates.insert(persona, template);
        self
    }

    /// # Errors
    ///
    /// Returns `CruxError::UnknownDocumentTemplate` if no template is registered.
    pub fn get(&self, persona: PersonaId) -> Result<&DocumentTemplate> {
        self.templates
            .get(&persona)
            .ok_or_else(|| CruxError::UnknownDocumentTemplate(persona.to_string()))
    }
}

impl Default for DocumentTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}
