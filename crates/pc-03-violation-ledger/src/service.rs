//! Violation Ledger Service

use std::sync::Arc;

use parking_lot::Mutex;
use pc_04_submission_lifecycle::{LifecycleError, SystemTimeSource};
use proctor_telemetry::{
    metric_inc, AUDIT_ONLY_EVENTS, DISQUALIFICATIONS, LEDGER_COUNTED, LEDGER_EVENTS, SUBMISSIONS,
};
use shared_bus::EventReplayCache;
use shared_types::{
    ExamId, Severity, StudentId, SubmissionStatus, ViolationEvent, ViolationKind,
};
use tracing::{debug, info, warn};

use crate::domain::{
    decide, disqualification_reason, AppendOutcome, Decision, LedgerResult, LedgerResultOf,
};
use crate::ports::{ActivityLog, ExamCatalog, SubmissionStore, TimeSource, ViolationLedgerApi};

/// Dependencies for ViolationLedger
pub struct LedgerDependencies {
    pub store: Arc<dyn SubmissionStore>,
    pub catalog: Arc<dyn ExamCatalog>,
    pub activity_log: Arc<dyn ActivityLog>,
    pub replay_cache: EventReplayCache,
}

pub struct ViolationLedger {
    store: Arc<dyn SubmissionStore>,
    catalog: Arc<dyn ExamCatalog>,
    activity_log: Arc<dyn ActivityLog>,
    replay_cache: Mutex<EventReplayCache>,
    time_source: Arc<dyn TimeSource>,
}

impl ViolationLedger {
    pub fn new(deps: LedgerDependencies) -> Self {
        Self {
            store: deps.store,
            catalog: deps.catalog,
            activity_log: deps.activity_log,
            replay_cache: Mutex::new(deps.replay_cache),
            time_source: Arc::new(SystemTimeSource),
        }
    }

    /// Set custom time source (for testing)
    #[must_use]
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    fn current_state(&self, event: &ViolationEvent) -> LedgerResultOf<LedgerResult> {
        let Some(key) = event.submission_key() else {
            return Ok(LedgerResult::audit_only());
        };
        Ok(match self.store.get(&key)? {
            Some(cell) => {
                let record = cell.lock();
                LedgerResult::unevaluated(
                    AppendOutcome::Duplicate,
                    record.violation_count(),
                    record.status(),
                )
            }
            None => LedgerResult {
                outcome: AppendOutcome::Duplicate,
                ..LedgerResult::audit_only()
            },
        })
    }

    fn record_in_submission(&self, event: ViolationEvent) -> LedgerResultOf<LedgerResult> {
        let Some(key) = event.submission_key() else {
            metric_inc!(AUDIT_ONLY_EVENTS);
            return Ok(LedgerResult::audit_only());
        };
        let Some(cell) = self.store.get(&key)? else {
            metric_inc!(AUDIT_ONLY_EVENTS);
            debug!(submission = %key, kind = %event.kind, "No submission, recorded for audit only");
            return Ok(LedgerResult::audit_only());
        };
        let policy = self.catalog.get_policy(&key.exam_id)?;
        let counted = policy.counts(event.kind);
        let occurred_at = event.occurred_at;
        let kind = event.kind;

        // Per-record critical section: read, increment, decide and
        // transition happen under one lock.
        let mut record = cell.lock();

        if record.is_terminal() {
            metric_inc!(AUDIT_ONLY_EVENTS);
            debug!(
                submission = %key,
                status = %record.status(),
                kind = %kind,
                "Event after finalization, counters unchanged"
            );
            return Ok(LedgerResult::unevaluated(
                AppendOutcome::Terminal,
                record.violation_count(),
                record.status(),
            ));
        }

        let violation_count = record.record_violation(event, counted)?;
        if !counted {
            return Ok(LedgerResult::unevaluated(
                AppendOutcome::Uncounted,
                violation_count,
                record.status(),
            ));
        }
        metric_inc!(LEDGER_COUNTED);

        let decision = decide(violation_count, &policy);
        match decision {
            Decision::Disqualify => {
                let reason = disqualification_reason(&policy);
                record.disqualify(reason.clone(), occurred_at)?;

                let entry = ViolationEvent::new(
                    key.student_id.clone(),
                    Some(key.exam_id.clone()),
                    ViolationKind::SuspiciousActivity,
                    Severity::Critical,
                    format!("Disqualified: {reason}"),
                    occurred_at,
                )
                .with_metadata("violationCount", violation_count);
                // The transition is already committed; the client must still
                // learn about it, so a failed log write is not an append error.
                if let Err(e) = self.activity_log.record(&entry) {
                    warn!(submission = %key, error = %e, "Disqualification entry not logged");
                }

                metric_inc!(DISQUALIFICATIONS);
                metric_inc!(SUBMISSIONS, &[SubmissionStatus::Disqualified.as_str()]);
                info!(
                    student_id = %key.student_id,
                    exam_id = %key.exam_id,
                    kind = %kind,
                    violation_count,
                    decision = %decision,
                    "Submission disqualified"
                );
            }
            Decision::Warn => {
                warn!(
                    student_id = %key.student_id,
                    exam_id = %key.exam_id,
                    kind = %kind,
                    violation_count,
                    decision = %decision,
                    "Final warning issued"
                );
            }
            Decision::Continue => {
                debug!(
                    student_id = %key.student_id,
                    exam_id = %key.exam_id,
                    kind = %kind,
                    violation_count,
                    "Violation counted"
                );
            }
        }

        Ok(LedgerResult {
            outcome: AppendOutcome::Counted,
            violation_count: Some(violation_count),
            decision,
            status: Some(record.status()),
        })
    }
}

impl ViolationLedgerApi for ViolationLedger {
    fn append(&self, event: ViolationEvent) -> LedgerResultOf<LedgerResult> {
        if let Some(exam_id) = &event.exam_id {
            if self.catalog.get_exam(exam_id).is_none() {
                return Err(LifecycleError::ExamNotFound(exam_id.clone()).into());
            }
        }

        let now = self.time_source.now();
        let event_id = event.event_id;

        if let Err(e) = self.replay_cache.lock().check_and_insert(event_id, now) {
            debug!(error = %e, "Ignoring re-delivered event");
            return self.current_state(&event);
        }

        metric_inc!(LEDGER_EVENTS, &[event.kind.as_str()]);

        if let Err(e) = self.activity_log.record(&event) {
            // Not recorded: let a later retry of the same id through.
            self.replay_cache.lock().forget(&event_id);
            warn!(error = %e, kind = %event.kind, "Activity log write failed");
            return Err(e.into());
        }

        self.record_in_submission(event)
    }

    fn student_activity(&self, student_id: &StudentId, limit: usize) -> Vec<ViolationEvent> {
        self.activity_log.by_student(student_id, limit)
    }

    fn exam_activity(&self, exam_id: &ExamId, limit: usize) -> Vec<ViolationEvent> {
        self.activity_log.by_exam(exam_id, limit)
    }
}
