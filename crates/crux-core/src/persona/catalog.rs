//! Read-only persona catalog.
//!
//! The catalog is built once at process start and shared behind an `Arc`.
//! Lookups never mutate it.

use std::collections::BTreeMap;
use std::str::FromStr;

use super::model::{PersonaDefinition, PersonaId};
use super::preset::get_default_presets;
use crate::error::{CruxError, Result};

#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: BTreeMap<PersonaId, PersonaDefinition>,
}

impl PersonaCatalog {
    /// Builds the catalog from the built-in presets.
    pub fn builtin() -> Self {
        Self::from_definitions(get_default_presets())
    }

    /// Builds a catalog from explicit definitions. A later definition with the
    /// same id replaces an earlier one.
    pub fn from_definitions(definitions: Vec<PersonaDefinition>) -> Self {
        let personas = definitions
            .into_iter()
            .map(|definition| (definition.id, definition))
            .collect();
        Self { personas }
    }

    /// Looks up a persona by its string id (e.g. `"efficiency"`).
    ///
    /// # Errors
    ///
    /// Returns `CruxError::UnknownPersona` if the id does not parse or is not
    /// part of this catalog.
    pub fn get(&self, persona_id: &str) -> Result<&PersonaDefinition> {
        let id = PersonaId::from_str(persona_id.trim())
            .map_err(|_| CruxError::unknown_persona(persona_id))?;
        self.get_by_id(id)
    }

    pub fn get_by_id(&self, id: PersonaId) -> Result<&PersonaDefinition> {
        self.personas
            .get(&id)
            .ok_or_else(|| CruxError::unknown_persona(id.to_string()))
    }

    /// Returns the ids in catalog order.
    pub fn ids(&self) -> Vec<PersonaId> {
        self.personas.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
