//! # Submission Record
//!
//! One attempt per (student, exam).
//!
//! ## Field Ownership
//!
//! | Fields | Writer |
//! |--------|--------|
//! | `violation_count`, `violation_log`, `is_disqualified`, `disqualification_reason` | violation ledger (`record_violation`, `disqualify`) |
//! | `status` SUBMITTED / TIMEOUT, `submitted_at`, `time_spent_seconds` | lifecycle service (`submit`, `time_out`) |
//! | `html`, `css`, `javascript`, `last_saved_at` | auto-save (`CodeDraft`) |
//!
//! ## Invariants
//!
//! - `violation_count` equals the number of counted events in `violation_log`
//! - `violation_count` never decreases
//! - a terminal record accepts no further transition or counted event

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use shared_types::{
    ExamId, StudentId, SubmissionKey, SubmissionStatus, Timestamp, ViolationEvent,
};

use super::errors::{LifecycleError, LifecycleResult};
use super::exam::ExamDetail;

fn elapsed_seconds(from: Timestamp, to: Timestamp) -> u64 {
    to.saturating_sub(from) / 1000
}

// =============================================================================
// LIFECYCLE + LEDGER FIELDS
// =============================================================================

/// Status and violation state of an attempt.
///
/// Only reachable through a [`SubmissionCell`] lock, so every method runs
/// inside the per-record critical section.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    status: SubmissionStatus,
    started_at: Timestamp,
    submitted_at: Option<Timestamp>,
    time_spent_seconds: u64,
    violation_count: u32,
    violation_log: Vec<ViolationEvent>,
    disqualification_reason: Option<String>,
}

impl SubmissionRecord {
    /// Fresh IN_PROGRESS attempt.
    pub fn start(started_at: Timestamp) -> Self {
        Self {
            status: SubmissionStatus::InProgress,
            started_at,
            submitted_at: None,
            time_spent_seconds: 0,
            violation_count: 0,
            violation_log: Vec::new(),
            disqualification_reason: None,
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn submitted_at(&self) -> Option<Timestamp> {
        self.submitted_at
    }

    pub fn time_spent_seconds(&self) -> u64 {
        self.time_spent_seconds
    }

    pub fn violation_count(&self) -> u32 {
        self.violation_count
    }

    pub fn violation_log(&self) -> &[ViolationEvent] {
        &self.violation_log
    }

    pub fn is_disqualified(&self) -> bool {
        self.status == SubmissionStatus::Disqualified
    }

    pub fn disqualification_reason(&self) -> Option<&str> {
        self.disqualification_reason.as_deref()
    }

    fn ensure_in_progress(&self, to: SubmissionStatus) -> LifecycleResult<()> {
        if self.is_terminal() {
            return Err(LifecycleError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        Ok(())
    }

    /// Appends `event` to the violation log, incrementing the counter when
    /// the exam counts its kind. Returns the updated count.
    ///
    /// Ledger-owned.
    pub fn record_violation(&mut self, event: ViolationEvent, counted: bool) -> LifecycleResult<u32> {
        self.ensure_in_progress(self.status)?;
        self.violation_log.push(event);
        if counted {
            self.violation_count = self.violation_count.saturating_add(1);
        }
        Ok(self.violation_count)
    }

    /// IN_PROGRESS → DISQUALIFIED, frozen at the disqualifying event's time.
    ///
    /// Ledger-owned.
    pub fn disqualify(&mut self, reason: impl Into<String>, at: Timestamp) -> LifecycleResult<()> {
        self.ensure_in_progress(SubmissionStatus::Disqualified)?;
        self.status = SubmissionStatus::Disqualified;
        self.disqualification_reason = Some(reason.into());
        self.submitted_at = Some(at);
        self.time_spent_seconds = elapsed_seconds(self.started_at, at);
        Ok(())
    }

    /// IN_PROGRESS → SUBMITTED.
    pub fn submit(&mut self, now: Timestamp) -> LifecycleResult<()> {
        self.finalize(SubmissionStatus::Submitted, now)
    }

    /// IN_PROGRESS → TIMEOUT.
    pub fn time_out(&mut self, now: Timestamp) -> LifecycleResult<()> {
        self.finalize(SubmissionStatus::Timeout, now)
    }

    fn finalize(&mut self, to: SubmissionStatus, now: Timestamp) -> LifecycleResult<()> {
        self.ensure_in_progress(to)?;
        self.status = to;
        self.submitted_at = Some(now);
        self.time_spent_seconds = elapsed_seconds(self.started_at, now);
        Ok(())
    }

    /// Auto-save progress. Ignored once terminal.
    pub fn touch_time_spent(&mut self, now: Timestamp) -> LifecycleResult<u64> {
        self.ensure_in_progress(self.status)?;
        self.time_spent_seconds = elapsed_seconds(self.started_at, now);
        Ok(self.time_spent_seconds)
    }
}

// =============================================================================
// CODE FIELDS
// =============================================================================

/// Latest code text of an attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDraft {
    pub html: String,
    pub css: String,
    pub javascript: String,
    pub last_saved_at: Option<Timestamp>,
}

// =============================================================================
// PER-RECORD CELL
// =============================================================================

/// Unit of concurrency control for one submission.
///
/// Lock order when both are needed: `record` before `code`.
#[derive(Debug)]
pub struct SubmissionCell {
    key: SubmissionKey,
    record: Mutex<SubmissionRecord>,
    code: Mutex<CodeDraft>,
}

impl SubmissionCell {
    pub fn new(key: SubmissionKey, record: SubmissionRecord) -> Self {
        Self {
            key,
            record: Mutex::new(record),
            code: Mutex::new(CodeDraft::default()),
        }
    }

    pub fn key(&self) -> &SubmissionKey {
        &self.key
    }

    pub fn student_id(&self) -> &StudentId {
        &self.key.student_id
    }

    pub fn exam_id(&self) -> &ExamId {
        &self.key.exam_id
    }

    /// Enter the per-record critical section.
    pub fn lock(&self) -> MutexGuard<'_, SubmissionRecord> {
        self.record.lock()
    }

    /// Take only after [`Self::lock`] when both are needed.
    pub fn lock_code(&self) -> MutexGuard<'_, CodeDraft> {
        self.code.lock()
    }

    #[cfg(test)]
    pub(crate) fn record_is_locked(&self) -> bool {
        self.record.is_locked()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.record.lock().status()
    }

    pub fn snapshot(&self) -> SubmissionSnapshot {
        let record = self.record.lock();
        let code = self.code.lock();
        SubmissionSnapshot::from_parts(&self.key, &record, &code)
    }
}

/// Read-only view of a submission, as returned to clients and admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSnapshot {
    pub student_id: StudentId,
    pub exam_id: ExamId,
    pub status: SubmissionStatus,
    pub started_at: Timestamp,
    pub submitted_at: Option<Timestamp>,
    pub time_spent_seconds: u64,
    pub violation_count: u32,
    pub violation_log: Vec<ViolationEvent>,
    pub is_disqualified: bool,
    pub disqualification_reason: Option<String>,
    pub html: String,
    pub css: String,
    pub javascript: String,
    pub last_saved_at: Option<Timestamp>,
}

impl SubmissionSnapshot {
    fn from_parts(key: &SubmissionKey, record: &SubmissionRecord, code: &CodeDraft) -> Self {
        Self {
            student_id: key.student_id.clone(),
            exam_id: key.exam_id.clone(),
            status: record.status,
            started_at: record.started_at,
            submitted_at: record.submitted_at,
            time_spent_seconds: record.time_spent_seconds,
            violation_count: record.violation_count,
            violation_log: record.violation_log.clone(),
            is_disqualified: record.is_disqualified(),
            disqualification_reason: record.disqualification_reason.clone(),
            html: code.html.clone(),
            css: code.css.clone(),
            javascript: code.javascript.clone(),
            last_saved_at: code.last_saved_at,
        }
    }
}

/// Response to a start: the attempt and the exam being taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedAttempt {
    pub submission: SubmissionSnapshot,
    pub exam: ExamDetail,
}
