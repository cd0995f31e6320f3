//! # Error Types
//!
//! Error taxonomy shared by every server-side subsystem. Each subsystem keeps
//! its own error enum and classifies it into an [`ErrorKind`], which the
//! gateway turns into a transport status.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a server-side failure.
///
/// TRANSIENT_NETWORK is deliberately absent: it only exists on the client,
/// where failed reports are dropped without surfacing to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Unknown student, exam or submission.
    NotFound,
    /// Operation conflicts with the current state (duplicate start/submit,
    /// terminal record, exam window closed).
    Conflict,
    /// Malformed input (event kind, severity, identifiers).
    Validation,
    /// Persistence failure while recording.
    Storage,
}

/// Implemented by every subsystem error that can reach a caller.
pub trait Classify {
    fn kind(&self) -> ErrorKind;

    /// Stable machine-readable code, e.g. `ALREADY_FINALIZED`.
    fn code(&self) -> &'static str;
}

/// Malformed input rejected before it reaches any subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unknown activity kind: {0}")]
    UnknownKind(String),

    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid roll number format: {0} (example: 23JR1A05A4)")]
    InvalidStudentId(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl Classify for ValidationError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }

    fn code(&self) -> &'static str {
        match self {
            Self::UnknownKind(_) => "UNKNOWN_KIND",
            Self::UnknownSeverity(_) => "UNKNOWN_SEVERITY",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidStudentId(_) => "INVALID_STUDENT_ID",
            Self::InvalidField { .. } => "INVALID_FIELD",
        }
    }
}
