//! In-memory activity log.

use parking_lot::RwLock;
use std::collections::HashMap;

use pc_04_submission_lifecycle::{AuditSink, StoreError};
use shared_types::{ExamId, StudentId, ViolationEvent};

use crate::ports::ActivityLog;

/// Append-only log with a per-student index.
#[derive(Default)]
pub struct InMemoryActivityLog {
    inner: RwLock<LogInner>,
}

#[derive(Default)]
struct LogInner {
    entries: Vec<ViolationEvent>,
    by_student: HashMap<StudentId, Vec<usize>>,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry, oldest first.
    pub fn entries(&self) -> Vec<ViolationEvent> {
        self.inner.read().entries.clone()
    }
}

impl AuditSink for InMemoryActivityLog {
    fn record(&self, event: &ViolationEvent) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let index = inner.entries.len();
        inner.entries.push(event.clone());
        inner
            .by_student
            .entry(event.student_id.clone())
            .or_default()
            .push(index);
        Ok(())
    }
}

impl ActivityLog for InMemoryActivityLog {
    fn by_student(&self, student_id: &StudentId, limit: usize) -> Vec<ViolationEvent> {
        let inner = self.inner.read();
        inner
            .by_student
            .get(student_id)
            .map(|indices| {
                indices
                    .iter()
                    .rev()
                    .take(limit)
                    .map(|&i| inner.entries[i].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn by_exam(&self, exam_id: &ExamId, limit: usize) -> Vec<ViolationEvent> {
        self.inner
            .read()
            .entries
            .iter()
            .rev()
            .filter(|event| event.exam_id.as_ref() == Some(exam_id))
            .take(limit)
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.inner.read().entries.len()
    }
}
