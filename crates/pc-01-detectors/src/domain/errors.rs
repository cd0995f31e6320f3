//! Detector set error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectorError {
    /// Two detectors registered under the same name.
    #[error("Detector registered twice: {0}")]
    DuplicateDetector(&'static str),

    #[error("Session has no student id")]
    MissingStudent,
}
