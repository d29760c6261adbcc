//! Engine configuration.
//!
//! Loaded from TOML. Every field has a default, so a partial file (or no file
//! at all) is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{CruxError, Result};
use crate::phase::Phase;

/// Per-phase number of tagged turns (both speakers) before the phase advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseThresholds {
    pub provocation: usize,
    pub deep_dive: usize,
    pub synthesis: usize,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            provocation: 4,
            deep_dive: 4,
            synthesis: 4,
        }
    }
}

impl PhaseThresholds {
    /// Threshold for a phase; `None` for the terminal phase.
    pub fn for_phase(&self, phase: Phase) -> Option<usize> {
        match phase {
            Phase::Provocation => Some(self.provocation),
            Phase::DeepDive => Some(self.deep_dive),
            Phase::Synthesis => Some(self.synthesis),
            Phase::Output => None,
        }
    }
}

/// Intensity model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensityConfig {
    /// Intensity a new session starts with
    pub initial: f64,
    /// Amount added per engagement-marked utterance (and removed per soften signal)
    pub step: f64,
    pub floor: f64,
    pub ceiling: f64,
    /// Intensity strictly above this value appends the escalation suffix
    pub escalation_threshold: f64,
    pub escalation_suffix: String,
}

impl Default for IntensityConfig {
    fn default() -> Self {
        Self {
            initial: 0.7,
            step: 0.1,
            floor: 0.3,
            ceiling: 1.0,
            escalation_threshold: 0.8,
            escalation_suffix: "Try again.".to_string(),
        }
    }
}

/// Completion collaborator parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Number of most recent turns passed as context
    pub history_window: usize,
    /// Upper bound for a single completion call
    pub timeout_ms: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            history_window: 6,
            timeout_ms: 30_000,
        }
    }
}

impl CompletionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub intensity: IntensityConfig,
    pub thresholds: PhaseThresholds,
    pub completion: CompletionConfig,
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `CruxError::Io` if the file cannot be read, `Serialization` if it
    /// is not valid TOML, and `Config` if the values are inconsistent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CruxError::io(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded engine configuration");
        Ok(config)
    }

    /// Checks the bounds the engine relies on.
    pub fn validate(&self) -> Result<()> {
        let intensity = &self.intensity;
        if !(0.0..=1.0).contains(&intensity.floor) || !(0.0..=1.0).contains(&intensity.ceiling) {
            return Err(CruxError::config("intensity bounds must lie within [0.0, 1.0]"));
        }
        if intensity.floor > intensity.ceiling {
            return Err(CruxError::config(format!(
                "intensity floor {} is above ceiling {}",
                intensity.floor, intensity.ceiling
            )));
        }
        if !(intensity.floor..=intensity.ceiling).contains(&intensity.initial) {
            return Err(CruxError::config(format!(
                "initial intensity {} is outside [{}, {}]",
                intensity.initial, intensity.floor, intensity.ceiling
            )));
        }
        if intensity.step <= 0.0 {
            return Err(CruxError::config("intensity step must be positive"));
        }

        let thresholds = &self.thresholds;
        if thresholds.provocation == 0 || thresholds.deep_dive == 0 || thresholds.synthesis == 0 {
            return Err(CruxError::config("phase thresholds must be at least 1"));
        }

        if self.completion.history_window == 0 {
            return Err(CruxError::config("completion history window must be at least 1"));
        }

        Ok(())
    }
}
