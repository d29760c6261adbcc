//! Error types for the Crux engine.

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

use crate::phase::Phase;

/// Identifies which external collaborator failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServiceKind {
    Completion,
    Transcription,
    Presence,
}

/// Non-fatal record of a collaborator failure that was absorbed by fallback content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDegraded {
    /// The collaborator that failed
    pub service: ServiceKind,
    /// Human-readable failure reason
    pub reason: String,
}

impl ServiceDegraded {
    pub fn new(service: ServiceKind, reason: impl Into<String>) -> Self {
        Self {
            service,
            reason: reason.into(),
        }
    }
}

/// A shared error type for the entire Crux engine.
///
/// Configuration-class variants (`UnknownPersona`, `UnknownDocumentTemplate`,
/// `NoPatternsForPhase`, `SessionNotStarted`) abort the requested operation.
/// `ServiceDegraded` is only ever reported as a status next to fallback content.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum CruxError {
    /// The persona id is not part of the catalog
    #[error("Unknown persona: '{0}'")]
    UnknownPersona(String),

    /// No document template is registered for the persona
    #[error("Unknown document template for persona '{0}'")]
    UnknownDocumentTemplate(String),

    /// The persona defines no challenge patterns for the phase
    #[error("Persona '{persona}' has no patterns for phase {phase}")]
    NoPatternsForPhase { persona: String, phase: Phase },

    /// An operation that requires a started session was called before `start`
    #[error("Session not started")]
    SessionNotStarted,

    /// An external collaborator failed and fallback content was used
    #[error("Service degraded: {} ({})", .0.service, .0.reason)]
    ServiceDegraded(ServiceDegraded),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },
}

impl CruxError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an UnknownPersona error
    pub fn unknown_persona(id: impl Into<String>) -> Self {
        Self::UnknownPersona(id.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_unknown_persona(&self) -> bool {
        matches!(self, Self::UnknownPersona(_))
    }

    pub fn is_session_not_started(&self) -> bool {
        matches!(self, Self::SessionNotStarted)
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true for errors that are reported as a status flag rather than
    /// aborting the operation.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ServiceDegraded(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<ServiceDegraded> for CruxError {
    fn from(degraded: ServiceDegraded) -> Self {
        Self::ServiceDegraded(degraded)
    }
}

impl From<std::io::Error> for CruxError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CruxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CruxError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, CruxError>`.
pub type Result<T> = std::result::Result<T, CruxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_kind_display() {
        assert_eq!(ServiceKind::Completion.to_string(), "completion");
        assert_eq!(ServiceKind::Transcription.to_string(), "transcription");
        assert_eq!(ServiceKind::Presence.to_string(), "presence");
    }

    #[test]
    fn test_error_display() {
        let err = CruxError::NoPatternsForPhase {
            persona: "efficiency".to_string(),
            phase: Phase::Output,
        };
        assert_eq!(
            err.to_string(),
            "Persona 'efficiency' has no patterns for phase output"
        );

        let degraded: CruxError =
            ServiceDegraded::new(ServiceKind::Completion, "timed out after 30000ms").into();
        assert_eq!(
            degraded.to_string(),
            "Service degraded: completion (timed out after 30000ms)"
        );
        assert!(degraded.is_transient());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CruxError = io.into();
        assert!(matches!(err, CruxError::Io { .. }));
        assert!(err.to_string().contains("NotFound"));
    }
}
