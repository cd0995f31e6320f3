//! Ledger error types.

use pc_04_submission_lifecycle::{LifecycleError, StoreError};
use shared_types::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Catalog lookup or record transition failed.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Persistence failure while recording; the event must be assumed lost.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl Classify for LedgerError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Lifecycle(inner) => inner.kind(),
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Lifecycle(inner) => inner.code(),
            Self::Storage(_) => "STORAGE_FAILURE",
        }
    }
}

pub type LedgerResultOf<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::ExamId;

    #[test]
    fn test_classification_delegates() {
        let err: LedgerError = LifecycleError::ExamNotFound(ExamId::new("x")).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.code(), "EXAM_NOT_FOUND");

        let err: LedgerError = StoreError::WriteFailed("disk".into()).into();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }
}
