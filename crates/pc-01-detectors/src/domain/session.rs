//! Session context shared by every detector of one exam attempt.

use shared_types::{ExamId, ExamPolicy, StudentId};

/// Who is being proctored, and under which policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub student_id: StudentId,
    pub policy: ExamPolicy,
}

impl SessionContext {
    pub fn new(student_id: StudentId, policy: ExamPolicy) -> Self {
        Self { student_id, policy }
    }

    pub fn exam_id(&self) -> &ExamId {
        &self.policy.exam_id
    }
}
