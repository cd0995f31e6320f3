//! Outbound ports for the Violation Ledger subsystem.
//!
//! The submission store, exam catalog and clock come from the submission
//! lifecycle crate; the ledger adds a queryable activity log.

use pc_04_submission_lifecycle::AuditSink;
use shared_types::{ExamId, StudentId, ViolationEvent};

pub use pc_04_submission_lifecycle::{ExamCatalog, SubmissionStore, TimeSource};

/// Append-only activity log that can also be read back.
pub trait ActivityLog: AuditSink {
    /// Newest first, at most `limit` entries.
    fn by_student(&self, student_id: &StudentId, limit: usize) -> Vec<ViolationEvent>;

    /// Newest first, at most `limit` entries.
    fn by_exam(&self, exam_id: &ExamId, limit: usize) -> Vec<ViolationEvent>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
