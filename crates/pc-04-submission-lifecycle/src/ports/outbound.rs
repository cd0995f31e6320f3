//! Outbound (Driven) ports for the Submission Lifecycle subsystem.
//!
//! | Port | Collaborator |
//! |------|--------------|
//! | `SubmissionStore` | submission/code store |
//! | `ExamCatalog` | exam catalog (policy, window) |
//! | `StudentDirectory` | account store (roll numbers) |
//! | `AuditSink` | activity log |
//! | `TimeSource` | server clock |

use std::sync::Arc;

use shared_types::{ExamId, ExamPolicy, StudentId, SubmissionKey, Timestamp, ViolationEvent};

use crate::domain::{
    ExamDefinition, ExamSummary, LifecycleError, StoreError, SubmissionCell, SubmissionRecord,
};

/// Keeps one [`SubmissionCell`] per key.
pub trait SubmissionStore: Send + Sync {
    fn get(&self, key: &SubmissionKey) -> Result<Option<Arc<SubmissionCell>>, StoreError>;

    /// Stores `record` unless a cell already exists for `key`.
    ///
    /// Returns the stored cell and whether this call created it.
    fn insert_if_absent(
        &self,
        key: &SubmissionKey,
        record: SubmissionRecord,
    ) -> Result<(Arc<SubmissionCell>, bool), StoreError>;

    fn list_by_exam(&self, exam_id: &ExamId) -> Result<Vec<Arc<SubmissionCell>>, StoreError>;

    fn list_all(&self) -> Result<Vec<Arc<SubmissionCell>>, StoreError>;
}

/// Read-only exam catalog.
pub trait ExamCatalog: Send + Sync {
    fn get_exam(&self, exam_id: &ExamId) -> Option<ExamDefinition>;

    /// Active exams, without question text.
    fn list_active(&self) -> Vec<ExamSummary>;

    fn get_policy(&self, exam_id: &ExamId) -> Result<ExamPolicy, LifecycleError> {
        self.get_exam(exam_id)
            .map(|exam| exam.policy())
            .ok_or_else(|| LifecycleError::ExamNotFound(exam_id.clone()))
    }
}

/// Resolves raw roll numbers to known students.
pub trait StudentDirectory: Send + Sync {
    /// # Errors
    ///
    /// - `Validation(InvalidStudentId)`: malformed roll number
    /// - `StudentNotFound`: well-formed but unknown
    fn resolve(&self, raw: &str) -> Result<StudentId, LifecycleError>;

    /// Display name, if the directory knows one.
    fn display_name(&self, student_id: &StudentId) -> Option<String>;
}

/// Append-only activity log.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &ViolationEvent) -> Result<(), StoreError>;
}

/// Time source for consistent timestamp handling.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Mock time source for tests, shared with dependent crates.
#[derive(Debug, Default)]
pub struct MockTimeSource {
    time: std::sync::atomic::AtomicU64,
}

impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: std::sync::atomic::AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.time.fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set(&self, time: Timestamp) {
        self.time.store(time, std::sync::atomic::Ordering::SeqCst);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Audit sink that keeps entries in memory, for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MockAuditSink {
    pub entries: parking_lot::Mutex<Vec<ViolationEvent>>,
    pub fail: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl MockAuditSink {
    pub fn kinds(&self) -> Vec<shared_types::ViolationKind> {
        self.entries.lock().iter().map(|e| e.kind).collect()
    }
}

#[cfg(test)]
impl AuditSink for MockAuditSink {
    fn record(&self, event: &ViolationEvent) -> Result<(), StoreError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::WriteFailed("audit log offline".into()));
        }
        self.entries.lock().push(event.clone());
        Ok(())
    }
}
