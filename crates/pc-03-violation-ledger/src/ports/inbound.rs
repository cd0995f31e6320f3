//! # Inbound Port - ViolationLedgerApi
//!
//! | Method | Caller |
//! |--------|--------|
//! | `append` | `POST /activity` |
//! | `student_activity` | `GET /admin/logs/{studentId}` |
//! | `exam_activity` | admin tooling |

use shared_types::{ExamId, StudentId, ViolationEvent};

use crate::domain::{LedgerResult, LedgerResultOf};

pub trait ViolationLedgerApi: Send + Sync {
    /// Records `event` and, when it targets an in-progress submission,
    /// updates the violation count and applies the evaluator's decision.
    ///
    /// # Errors
    /// - `Storage`: the activity log could not be written; nothing was recorded
    /// - `Lifecycle(ExamNotFound)`: the event names an exam the catalog does not know;
    ///   nothing was recorded
    fn append(&self, event: ViolationEvent) -> LedgerResultOf<LedgerResult>;

    /// Newest first, at most `limit` entries.
    fn student_activity(&self, student_id: &StudentId, limit: usize) -> Vec<ViolationEvent>;

    /// Newest first, at most `limit` entries.
    fn exam_activity(&self, exam_id: &ExamId, limit: usize) -> Vec<ViolationEvent>;
}
