//! Immutable registry shared by every session of a process.
//!
//! Bundles the persona catalog, document templates, configuration and the
//! stateless components built from them. Construct once, wrap in an `Arc`.

use std::sync::Arc;

use crate::challenge::{ChallengeGenerator, RandomSource, ThreadRandom};
use crate::config::EngineConfig;
use crate::document::{DocumentSynthesizer, DocumentTemplates};
use crate::error::Result;
use crate::persona::{PersonaCatalog, PersonaDefinition};
use crate::transition::PhaseTransitionPolicy;

pub struct ChallengeEngine {
    config: EngineConfig,
    catalog: PersonaCatalog,
    policy: PhaseTransitionPolicy,
    generator: ChallengeGenerator,
    synthesizer: DocumentSynthesizer,
}

impl ChallengeEngine {
    /// Engine with built-in personas and templates and the thread RNG.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_parts(
            config,
            PersonaCatalog::builtin(),
            DocumentTemplates::builtin(),
            Arc::new(ThreadRandom),
        )
    }

    pub fn with_parts(
        config: EngineConfig,
        catalog: PersonaCatalog,
        templates: DocumentTemplates,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let policy = PhaseTransitionPolicy::new(config.thresholds);
        let generator = ChallengeGenerator::new(policy, &config.intensity, random);

        tracing::debug!(
            personas = catalog.len(),
            provocation = config.thresholds.provocation,
            deep_dive = config.thresholds.deep_dive,
            synthesis = config.thresholds.synthesis,
            "Challenge engine ready"
        );

        Self {
            config,
            catalog,
            policy,
            generator,
            synthesizer: DocumentSynthesizer::new(templates),
        }
    }

    /// Replaces the random source used for fallback pattern selection.
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.generator = ChallengeGenerator::new(self.policy, &self.config.intensity, random);
        self
    }

    pub fn persona(&self, persona_id: &str) -> Result<&PersonaDefinition> {
        self.catalog.get(persona_id)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> &PhaseTransitionPolicy {
        &self.policy
    }

    pub fn generator(&self) -> &ChallengeGenerator {
        &self.generator
    }

    pub fn synthesizer(&self) -> &DocumentSynthesizer {
        &self.synthesizer
    }
}

impl Default for ChallengeEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::FixedIndex;
    use crate::config::PhaseThresholds;
    use crate::phase::Phase;

    #[test]
    fn test_engine_uses_configured_thresholds() {
        let config = EngineConfig {
            thresholds: PhaseThresholds {
                provocation: 2,
                ..PhaseThresholds::default()
            },
            ..EngineConfig::default()
        };
        let engine = ChallengeEngine::new(config);
        assert_eq!(engine.policy().thresholds().provocation, 2);
        assert!(engine.persona("moonshot").is_ok());
        assert!(engine.persona("nonexistent").unwrap_err().is_unknown_persona());
    }

    #[test]
    fn test_with_random_pins_fallback() {
        let engine = ChallengeEngine::default().with_random(Arc::new(FixedIndex(0)));
        let persona = engine.persona("efficiency").unwrap();
        let pattern = engine
            .generator()
            .select_pattern(persona, Phase::Synthesis, "no keywords here")
            .unwrap();
        assert_eq!(pattern.id, "efficiency.synthesis.team");
    }
}
