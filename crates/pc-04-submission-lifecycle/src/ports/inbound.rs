//! # Inbound Port - SubmissionLifecycleApi
//!
//! Primary driving port used by the API gateway and the runtime's timeout
//! sweeper.
//!
//! | Method | Caller |
//! |--------|--------|
//! | `start_exam` | `POST /exams/{id}/start` |
//! | `get_exam` | `GET /exams/{id}` |
//! | `submit_exam` | `POST /exams/{id}/submit` |
//! | `save_code` | `POST /exams/save` |
//! | `get_submission` | `GET /exams/{id}/submission/{studentId}` |
//! | `list_submissions` | `GET /admin/exams/{id}/submissions` |
//! | `sweep_timeouts` | runtime sweeper task |

use shared_types::{ExamId, SaveCodeAck, SaveCodeRequest, StudentId};

use crate::domain::{ExamSummary, LifecycleResult, StartedAttempt, SubmissionSnapshot};

pub trait SubmissionLifecycleApi: Send + Sync {
    /// Creates the attempt, or returns the existing one, together with the
    /// exam question.
    ///
    /// # Errors
    /// - `ExamNotFound`, `StudentNotFound`, `Validation`
    /// - `AlreadySubmitted`: the student already submitted this exam
    /// - `ExamNotActive`: outside the exam window, or exam disabled
    fn start_exam(&self, exam_id: &ExamId, student: &str) -> LifecycleResult<StartedAttempt>;

    /// # Errors
    /// - `SubmissionNotFound`: never started
    /// - `AlreadyFinalized`: any terminal status
    fn submit_exam(&self, exam_id: &ExamId, student: &str) -> LifecycleResult<SubmissionSnapshot>;

    /// # Errors
    /// - `NoActiveSubmission`: missing or terminal attempt
    fn save_code(&self, request: SaveCodeRequest) -> LifecycleResult<SaveCodeAck>;

    fn get_submission(&self, exam_id: &ExamId, student: &str) -> LifecycleResult<SubmissionSnapshot>;

    fn list_submissions(&self, exam_id: &ExamId) -> LifecycleResult<Vec<SubmissionSnapshot>>;

    fn list_active_exams(&self) -> Vec<ExamSummary>;

    /// Public view of one exam, without the question.
    ///
    /// # Errors
    /// - `ExamNotFound`
    fn get_exam(&self, exam_id: &ExamId) -> LifecycleResult<ExamSummary>;

    /// Times out every IN_PROGRESS attempt whose exam ended more than the
    /// grace period ago. Returns how many were transitioned.
    fn sweep_timeouts(&self) -> LifecycleResult<usize>;

    /// Normalise and resolve a raw roll number.
    fn resolve_student(&self, raw: &str) -> LifecycleResult<StudentId>;
}
