//! Roster-backed student directory.

use std::collections::HashMap;

use shared_types::StudentId;

use crate::domain::{normalize_roll_number, LifecycleError};
use crate::ports::StudentDirectory;

/// Resolves roll numbers against a configured roster.
///
/// With open enrollment any well-formed roll number is accepted.
#[derive(Debug, Default)]
pub struct RosterDirectory {
    names: HashMap<StudentId, String>,
    open_enrollment: bool,
}

impl RosterDirectory {
    /// Builds a roster from `(roll number, name)` pairs. Malformed roll
    /// numbers are skipped with a warning.
    pub fn new<I, S, N>(roster: I, open_enrollment: bool) -> Self
    where
        I: IntoIterator<Item = (S, N)>,
        S: AsRef<str>,
        N: Into<String>,
    {
        let mut names = HashMap::new();
        for (roll, name) in roster {
            match normalize_roll_number(roll.as_ref()) {
                Ok(id) => {
                    names.insert(id, name.into());
                }
                Err(e) => tracing::warn!(error = %e, "Skipping roster entry"),
            }
        }
        Self {
            names,
            open_enrollment,
        }
    }

    /// Directory that accepts any well-formed roll number.
    pub fn open() -> Self {
        Self {
            names: HashMap::new(),
            open_enrollment: true,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl StudentDirectory for RosterDirectory {
    fn resolve(&self, raw: &str) -> Result<StudentId, LifecycleError> {
        let id = normalize_roll_number(raw)?;
        if self.open_enrollment || self.names.contains_key(&id) {
            Ok(id)
        } else {
            Err(LifecycleError::StudentNotFound(id.as_str().to_string()))
        }
    }

    fn display_name(&self, student_id: &StudentId) -> Option<String> {
        self.names.get(student_id).cloned()
    }
}
