//! In-memory submission store.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use shared_types::{ExamId, SubmissionKey};

use crate::domain::{StoreError, SubmissionCell, SubmissionRecord};
use crate::ports::SubmissionStore;

/// `DashMap`-backed store. Sharded locking means lookups on different
/// records never contend; each record is then guarded by its own cell.
#[derive(Default)]
pub struct InMemorySubmissionStore {
    cells: DashMap<SubmissionKey, Arc<SubmissionCell>>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl SubmissionStore for InMemorySubmissionStore {
    fn get(&self, key: &SubmissionKey) -> Result<Option<Arc<SubmissionCell>>, StoreError> {
        Ok(self.cells.get(key).map(|cell| Arc::clone(cell.value())))
    }

    fn insert_if_absent(
        &self,
        key: &SubmissionKey,
        record: SubmissionRecord,
    ) -> Result<(Arc<SubmissionCell>, bool), StoreError> {
        match self.cells.entry(key.clone()) {
            Entry::Occupied(existing) => Ok((Arc::clone(existing.get()), false)),
            Entry::Vacant(slot) => {
                let cell = Arc::new(SubmissionCell::new(key.clone(), record));
                slot.insert(Arc::clone(&cell));
                Ok((cell, true))
            }
        }
    }

    fn list_by_exam(&self, exam_id: &ExamId) -> Result<Vec<Arc<SubmissionCell>>, StoreError> {
        let mut cells: Vec<_> = self
            .cells
            .iter()
            .filter(|entry| &entry.key().exam_id == exam_id)
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        cells.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(cells)
    }

    fn list_all(&self) -> Result<Vec<Arc<SubmissionCell>>, StoreError> {
        Ok(self
            .cells
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect())
    }
}
