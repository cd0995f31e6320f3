//! In-memory exam catalog, loaded from configuration at startup.

use std::collections::HashMap;

use shared_types::ExamId;

use crate::domain::{ExamDefinition, ExamSummary};
use crate::ports::ExamCatalog;

/// Immutable after construction: exam policy may not change mid-exam.
#[derive(Debug, Default)]
pub struct InMemoryExamCatalog {
    exams: HashMap<ExamId, ExamDefinition>,
}

impl InMemoryExamCatalog {
    pub fn new(exams: impl IntoIterator<Item = ExamDefinition>) -> Self {
        Self {
            exams: exams.into_iter().map(|exam| (exam.id.clone(), exam)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.exams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }
}

impl ExamCatalog for InMemoryExamCatalog {
    fn get_exam(&self, exam_id: &ExamId) -> Option<ExamDefinition> {
        self.exams.get(exam_id).cloned()
    }

    fn list_active(&self) -> Vec<ExamSummary> {
        let mut active: Vec<_> = self
            .exams
            .values()
            .filter(|exam| exam.is_active)
            .map(ExamDefinition::summary)
            .collect();
        active.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        active
    }
}
