//! Submission lifecycle error types.

use shared_types::{Classify, ErrorKind, ExamId, SubmissionKey, SubmissionStatus, ValidationError};
use thiserror::Error;

/// Failure of the backing submission or audit store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("Storage write failed: {0}")]
    WriteFailed(String),
}

/// Lifecycle error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Well-formed roll number that is not on the roster.
    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Exam not found: {0}")]
    ExamNotFound(ExamId),

    #[error("No submission for {0}")]
    SubmissionNotFound(SubmissionKey),

    /// Auto-save against a missing or terminal submission.
    #[error("No active submission for {0}")]
    NoActiveSubmission(SubmissionKey),

    /// Start on a record the student already submitted.
    #[error("Exam already submitted: {0}")]
    AlreadySubmitted(SubmissionKey),

    /// Submit on any terminal record.
    #[error("Submission {key} already finalized as {status}")]
    AlreadyFinalized {
        key: SubmissionKey,
        status: SubmissionStatus,
    },

    #[error("Exam is not currently active: {0}")]
    ExamNotActive(ExamId),

    /// A transition was requested from a state that does not allow it.
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl Classify for LifecycleError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::StudentNotFound(_)
            | Self::ExamNotFound(_)
            | Self::SubmissionNotFound(_)
            | Self::NoActiveSubmission(_) => ErrorKind::NotFound,
            Self::AlreadySubmitted(_)
            | Self::AlreadyFinalized { .. }
            | Self::ExamNotActive(_)
            | Self::InvalidTransition { .. } => ErrorKind::Conflict,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            Self::ExamNotFound(_) => "EXAM_NOT_FOUND",
            Self::SubmissionNotFound(_) => "SUBMISSION_NOT_FOUND",
            Self::NoActiveSubmission(_) => "NO_ACTIVE_SUBMISSION",
            Self::AlreadySubmitted(_) => "ALREADY_SUBMITTED",
            Self::AlreadyFinalized { .. } => "ALREADY_FINALIZED",
            Self::ExamNotActive(_) => "EXAM_NOT_ACTIVE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Validation(inner) => inner.code(),
            Self::Storage(_) => "STORAGE_FAILURE",
        }
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
