//! Submission Lifecycle Service
//!
//! Drives the student- and clock-initiated transitions. The DISQUALIFIED
//! transition is never taken here; it belongs to the violation ledger.

use std::sync::Arc;

use proctor_telemetry::{metric_inc, SUBMISSIONS};
use shared_types::{
    ExamId, SaveCodeAck, SaveCodeRequest, Severity, StudentId, SubmissionKey, SubmissionStatus,
    Timestamp, ViolationEvent, ViolationKind,
};
use tracing::{debug, info, warn};

use crate::domain::{
    ExamSummary, LifecycleConfig, LifecycleError, LifecycleResult, StartedAttempt,
    SubmissionRecord, SubmissionSnapshot,
};
use crate::ports::{
    AuditSink, ExamCatalog, StudentDirectory, SubmissionLifecycleApi, SubmissionStore,
    SystemTimeSource, TimeSource,
};

/// Dependencies for LifecycleService
pub struct LifecycleDependencies {
    pub store: Arc<dyn SubmissionStore>,
    pub catalog: Arc<dyn ExamCatalog>,
    pub directory: Arc<dyn StudentDirectory>,
    pub audit: Arc<dyn AuditSink>,
    pub config: LifecycleConfig,
}

pub struct LifecycleService {
    store: Arc<dyn SubmissionStore>,
    catalog: Arc<dyn ExamCatalog>,
    directory: Arc<dyn StudentDirectory>,
    audit: Arc<dyn AuditSink>,
    config: LifecycleConfig,
    time_source: Arc<dyn TimeSource>,
}

impl LifecycleService {
    pub fn new(deps: LifecycleDependencies) -> Self {
        Self {
            store: deps.store,
            catalog: deps.catalog,
            directory: deps.directory,
            audit: deps.audit,
            config: deps.config,
            time_source: Arc::new(SystemTimeSource),
        }
    }

    /// Set custom time source (for testing)
    #[must_use]
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    fn key(&self, exam_id: &ExamId, student: &str) -> LifecycleResult<SubmissionKey> {
        let student_id = self.directory.resolve(student)?;
        Ok(SubmissionKey::new(student_id, exam_id.clone()))
    }

    fn log_server_event(
        &self,
        key: &SubmissionKey,
        kind: ViolationKind,
        description: String,
        at: Timestamp,
    ) -> LifecycleResult<()> {
        let event = ViolationEvent::new(
            key.student_id.clone(),
            Some(key.exam_id.clone()),
            kind,
            Severity::Low,
            description,
            at,
        );
        self.audit.record(&event)?;
        Ok(())
    }
}

impl SubmissionLifecycleApi for LifecycleService {
    fn start_exam(&self, exam_id: &ExamId, student: &str) -> LifecycleResult<StartedAttempt> {
        let exam = self
            .catalog
            .get_exam(exam_id)
            .ok_or_else(|| LifecycleError::ExamNotFound(exam_id.clone()))?;
        let key = self.key(exam_id, student)?;
        let now = self.time_source.now();

        if let Some(cell) = self.store.get(&key)? {
            match cell.status() {
                SubmissionStatus::Submitted => {
                    return Err(LifecycleError::AlreadySubmitted(key));
                }
                // Lets the client discover a prior disqualification or timeout.
                SubmissionStatus::Disqualified | SubmissionStatus::Timeout => {
                    debug!(submission = %key, status = %cell.status(), "Start on finalized attempt");
                    return Ok(StartedAttempt {
                        submission: cell.snapshot(),
                        exam: exam.detail(),
                    });
                }
                SubmissionStatus::InProgress => {}
            }
        }

        if !exam.accepts_start_at(now) {
            return Err(LifecycleError::ExamNotActive(exam_id.clone()));
        }

        let (cell, created) = self.store.insert_if_absent(&key, SubmissionRecord::start(now))?;
        if created {
            metric_inc!(SUBMISSIONS, &[SubmissionStatus::InProgress.as_str()]);
            info!(
                student_id = %key.student_id,
                exam_id = %key.exam_id,
                "Exam attempt started"
            );
        }

        self.log_server_event(
            &key,
            ViolationKind::ExamStarted,
            format!("Started exam: {}", exam.title),
            now,
        )?;

        Ok(StartedAttempt {
            submission: cell.snapshot(),
            exam: exam.detail(),
        })
    }

    fn submit_exam(&self, exam_id: &ExamId, student: &str) -> LifecycleResult<SubmissionSnapshot> {
        let key = self.key(exam_id, student)?;
        let cell = self
            .store
            .get(&key)?
            .ok_or_else(|| LifecycleError::SubmissionNotFound(key.clone()))?;
        let now = self.time_source.now();

        let time_spent = {
            let mut record = cell.lock();
            if record.is_terminal() {
                return Err(LifecycleError::AlreadyFinalized {
                    key,
                    status: record.status(),
                });
            }
            record.submit(now)?;
            record.time_spent_seconds()
        };

        metric_inc!(SUBMISSIONS, &[SubmissionStatus::Submitted.as_str()]);
        info!(
            student_id = %key.student_id,
            exam_id = %key.exam_id,
            time_spent_seconds = time_spent,
            "Exam submitted"
        );

        let title = self
            .catalog
            .get_exam(exam_id)
            .map(|exam| exam.title)
            .unwrap_or_else(|| exam_id.to_string());
        self.log_server_event(
            &key,
            ViolationKind::ExamSubmitted,
            format!("Submitted exam: {title}"),
            now,
        )?;

        Ok(cell.snapshot())
    }

    fn save_code(&self, request: SaveCodeRequest) -> LifecycleResult<SaveCodeAck> {
        let exam_id = ExamId::new(request.exam_id.trim());
        let key = self.key(&exam_id, &request.student_id)?;
        let cell = self
            .store
            .get(&key)?
            .ok_or_else(|| LifecycleError::NoActiveSubmission(key.clone()))?;
        let now = self.time_source.now();

        // Record lock held across the code write so a concurrent submit
        // cannot finalize in between. Lock order: record, then code.
        let time_spent_seconds = {
            let mut record = cell.lock();
            let time_spent_seconds = record
                .touch_time_spent(now)
                .map_err(|_| LifecycleError::NoActiveSubmission(key.clone()))?;
            let mut code = cell.lock_code();
            code.html = request.html;
            code.css = request.css;
            code.javascript = request.javascript;
            code.last_saved_at = Some(now);
            time_spent_seconds
        };

        debug!(submission = %key, time_spent_seconds, "Code saved");
        self.log_server_event(&key, ViolationKind::CodeSaved, "Code auto-saved".to_string(), now)?;

        Ok(SaveCodeAck {
            success: true,
            time_spent_seconds,
        })
    }

    fn get_submission(&self, exam_id: &ExamId, student: &str) -> LifecycleResult<SubmissionSnapshot> {
        let key = self.key(exam_id, student)?;
        self.store
            .get(&key)?
            .map(|cell| cell.snapshot())
            .ok_or(LifecycleError::SubmissionNotFound(key))
    }

    fn list_submissions(&self, exam_id: &ExamId) -> LifecycleResult<Vec<SubmissionSnapshot>> {
        if self.catalog.get_exam(exam_id).is_none() {
            return Err(LifecycleError::ExamNotFound(exam_id.clone()));
        }
        Ok(self
            .store
            .list_by_exam(exam_id)?
            .iter()
            .map(|cell| cell.snapshot())
            .collect())
    }

    fn list_active_exams(&self) -> Vec<ExamSummary> {
        self.catalog.list_active()
    }

    fn get_exam(&self, exam_id: &ExamId) -> LifecycleResult<ExamSummary> {
        self.catalog
            .get_exam(exam_id)
            .map(|exam| exam.summary())
            .ok_or_else(|| LifecycleError::ExamNotFound(exam_id.clone()))
    }

    fn sweep_timeouts(&self) -> LifecycleResult<usize> {
        let now = self.time_source.now();
        let grace = self.config.grace_ms();
        let mut timed_out = 0;

        for cell in self.store.list_all()? {
            if cell.status().is_terminal() {
                continue;
            }
            let Some(exam) = self.catalog.get_exam(cell.exam_id()) else {
                warn!(submission = %cell.key(), "Submission references unknown exam");
                continue;
            };
            if now <= exam.end_time.saturating_add(grace) {
                continue;
            }

            // Re-check under the lock: a submit or disqualification may have
            // landed since the unlocked status read.
            let transitioned = {
                let mut record = cell.lock();
                !record.is_terminal() && record.time_out(now).is_ok()
            };
            if !transitioned {
                continue;
            }

            timed_out += 1;
            metric_inc!(SUBMISSIONS, &[SubmissionStatus::Timeout.as_str()]);
            info!(
                student_id = %cell.student_id(),
                exam_id = %cell.exam_id(),
                "Exam attempt timed out"
            );
            // Transition is committed; a failed log entry must not stop the sweep.
            if let Err(e) = self.log_server_event(
                cell.key(),
                ViolationKind::ExamTimeout,
                format!("Exam time expired: {}", exam.title),
                now,
            ) {
                warn!(submission = %cell.key(), error = %e, "Timeout log entry failed");
            }
        }

        Ok(timed_out)
    }

    fn resolve_student(&self, raw: &str) -> LifecycleResult<StudentId> {
        self.directory.resolve(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryExamCatalog, InMemorySubmissionStore, RosterDirectory};
    use crate::domain::ExamDefinition;
    use crate::ports::{MockAuditSink, MockTimeSource};
    use std::sync::atomic::Ordering;

    const STUDENT: &str = "23JR1A05A4";
    const START: Timestamp = 1_000_000;
    const END: Timestamp = START + 3_600_000;

    struct Harness {
        service: LifecycleService,
        store: Arc<InMemorySubmissionStore>,
        audit: Arc<MockAuditSink>,
        clock: Arc<MockTimeSource>,
    }

    fn harness() -> Harness {
        let store = Arc::new(InMemorySubmissionStore::new());
        let audit = Arc::new(MockAuditSink::default());
        let clock = Arc::new(MockTimeSource::new(START + 1_000));
        let mut landing = ExamDefinition::new(ExamId::new("exam-1"), "Landing Page", START, END);
        landing.question = "Build a responsive landing page".into();
        let catalog = InMemoryExamCatalog::new([landing]);

        let service = LifecycleService::new(LifecycleDependencies {
            store: store.clone(),
            catalog: Arc::new(catalog),
            directory: Arc::new(RosterDirectory::new(
                [(STUDENT, "Asha"), ("23JR1A05B7", "Ravi")],
                false,
            )),
            audit: audit.clone(),
            config: LifecycleConfig::default(),
        })
        .with_time_source(clock.clone());

        Harness {
            service,
            store,
            audit,
            clock,
        }
    }

    fn exam() -> ExamId {
        ExamId::new("exam-1")
    }

    #[test]
    fn test_start_creates_in_progress_attempt() {
        let h = harness();
        let started = h.service.start_exam(&exam(), "23jr1a05a4").unwrap();
        let snapshot = started.submission;

        assert_eq!(snapshot.status, SubmissionStatus::InProgress);
        assert_eq!(snapshot.started_at, START + 1_000);
        assert_eq!(snapshot.student_id.as_str(), STUDENT);
        assert_eq!(h.audit.kinds(), vec![ViolationKind::ExamStarted]);
    }

    #[test]
    fn test_start_reveals_question_listing_does_not() {
        let h = harness();
        let summary = h.service.get_exam(&exam()).unwrap();
        assert_eq!(summary.title, "Landing Page");
        assert!(matches!(
            h.service.get_exam(&ExamId::new("ghost")),
            Err(LifecycleError::ExamNotFound(_))
        ));

        let started = h.service.start_exam(&exam(), STUDENT).unwrap();
        assert_eq!(started.exam.question, "Build a responsive landing page");
        assert_eq!(started.exam.summary, summary);
    }

    #[test]
    fn test_start_twice_resumes_same_attempt() {
        let h = harness();
        h.service.start_exam(&exam(), STUDENT).unwrap();
        h.clock.advance(10_000);
        let resumed = h.service.start_exam(&exam(), STUDENT).unwrap().submission;

        assert_eq!(resumed.started_at, START + 1_000);
        assert_eq!(h.store.len(), 1);
    }

    #[test]
    fn test_start_after_submit_is_conflict() {
        let h = harness();
        h.service.start_exam(&exam(), STUDENT).unwrap();
        h.service.submit_exam(&exam(), STUDENT).unwrap();

        let err = h.service.start_exam(&exam(), STUDENT).unwrap_err();
        assert!(matches!(err, LifecycleError::AlreadySubmitted(_)));
    }

    #[test]
    fn test_start_after_disqualification_returns_snapshot() {
        let h = harness();
        h.service.start_exam(&exam(), STUDENT).unwrap();
        let cell = h
            .store
            .get(&SubmissionKey::new(StudentId::new(STUDENT), exam()))
            .unwrap()
            .unwrap();
        cell.lock().disqualify("Exceeded maximum violations (3)", START + 5_000).unwrap();

        let snapshot = h.service.start_exam(&exam(), STUDENT).unwrap().submission;
        assert!(snapshot.is_disqualified);
        assert_eq!(snapshot.status, SubmissionStatus::Disqualified);
    }

    #[test]
    fn test_late_start_rejected() {
        let h = harness();
        h.clock.set(END + 1);
        let err = h.service.start_exam(&exam(), STUDENT).unwrap_err();
        assert!(matches!(err, LifecycleError::ExamNotActive(_)));
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_early_start_rejected() {
        let h = harness();
        h.clock.set(START - 1);
        assert!(matches!(
            h.service.start_exam(&exam(), STUDENT),
            Err(LifecycleError::ExamNotActive(_))
        ));
    }

    #[test]
    fn test_unknown_exam_and_student() {
        let h = harness();
        assert!(matches!(
            h.service.start_exam(&ExamId::new("nope"), STUDENT),
            Err(LifecycleError::ExamNotFound(_))
        ));
        assert!(matches!(
            h.service.start_exam(&exam(), "23JR1A05Z9"),
            Err(LifecycleError::StudentNotFound(_))
        ));
    }

    #[test]
    fn test_submit_stamps_time_spent() {
        let h = harness();
        h.service.start_exam(&exam(), STUDENT).unwrap();
        h.clock.advance(90_000);

        let snapshot = h.service.submit_exam(&exam(), STUDENT).unwrap();
        assert_eq!(snapshot.status, SubmissionStatus::Submitted);
        assert_eq!(snapshot.time_spent_seconds, 90);
        assert_eq!(snapshot.submitted_at, Some(START + 91_000));
        assert_eq!(
            h.audit.kinds(),
            vec![ViolationKind::ExamStarted, ViolationKind::ExamSubmitted]
        );
    }

    #[test]
    fn test_second_submit_already_finalized_and_unchanged() {
        let h = harness();
        h.service.start_exam(&exam(), STUDENT).unwrap();
        let first = h.service.submit_exam(&exam(), STUDENT).unwrap();
        h.clock.advance(5_000);

        let err = h.service.submit_exam(&exam(), STUDENT).unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::AlreadyFinalized {
                status: SubmissionStatus::Submitted,
                ..
            }
        ));
        let after = h.service.get_submission(&exam(), STUDENT).unwrap();
        assert_eq!(after.submitted_at, first.submitted_at);
    }

    #[test]
    fn test_late_submit_while_in_progress_accepted() {
        let h = harness();
        h.service.start_exam(&exam(), STUDENT).unwrap();
        h.clock.set(END + 10);
        let snapshot = h.service.submit_exam(&exam(), STUDENT).unwrap();
        assert_eq!(snapshot.status, SubmissionStatus::Submitted);
    }

    #[test]
    fn test_submit_without_start() {
        let h = harness();
        assert!(matches!(
            h.service.submit_exam(&exam(), STUDENT),
            Err(LifecycleError::SubmissionNotFound(_))
        ));
    }

    #[test]
    fn test_save_code_updates_draft() {
        let h = harness();
        h.service.start_exam(&exam(), STUDENT).unwrap();
        h.clock.advance(30_000);

        let ack = h
            .service
            .save_code(SaveCodeRequest {
                student_id: STUDENT.into(),
                exam_id: "exam-1".into(),
                html: "<p>hi</p>".into(),
                css: "p{}".into(),
                javascript: String::new(),
            })
            .unwrap();
        assert!(ack.success);
        assert_eq!(ack.time_spent_seconds, 30);

        let snapshot = h.service.get_submission(&exam(), STUDENT).unwrap();
        assert_eq!(snapshot.html, "<p>hi</p>");
        assert_eq!(snapshot.last_saved_at, Some(START + 31_000));
        assert!(h.audit.kinds().contains(&ViolationKind::CodeSaved));
    }

    #[test]
    fn test_save_code_on_terminal_attempt() {
        let h = harness();
        h.service.start_exam(&exam(), STUDENT).unwrap();
        h.service.submit_exam(&exam(), STUDENT).unwrap();

        let err = h
            .service
            .save_code(SaveCodeRequest {
                student_id: STUDENT.into(),
                exam_id: "exam-1".into(),
                html: "late".into(),
                css: String::new(),
                javascript: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, LifecycleError::NoActiveSubmission(_)));
        assert_eq!(h.service.get_submission(&exam(), STUDENT).unwrap().html, "");
    }

    #[test]
    fn test_submit_waits_for_in_flight_save() {
        let h = harness();
        h.service.start_exam(&exam(), STUDENT).unwrap();
        let cell = h
            .store
            .get(&SubmissionKey::new(StudentId::new(STUDENT), exam()))
            .unwrap()
            .unwrap();

        let code_guard = cell.lock_code();
        std::thread::scope(|scope| {
            let save = scope.spawn(|| {
                h.service.save_code(SaveCodeRequest {
                    student_id: STUDENT.into(),
                    exam_id: "exam-1".into(),
                    html: "<main></main>".into(),
                    css: String::new(),
                    javascript: String::new(),
                })
            });
            while !cell.record_is_locked() {
                std::thread::yield_now();
            }

            let submit = scope.spawn(|| h.service.submit_exam(&exam(), STUDENT));
            std::thread::sleep(std::time::Duration::from_millis(50));
            assert!(!submit.is_finished(), "submit must not finalize mid-save");

            drop(code_guard);
            assert!(save.join().unwrap().is_ok());
            assert!(submit.join().unwrap().is_ok());
        });

        let snapshot = h.service.get_submission(&exam(), STUDENT).unwrap();
        assert_eq!(snapshot.status, SubmissionStatus::Submitted);
        assert_eq!(snapshot.html, "<main></main>");
        assert!(snapshot.last_saved_at <= snapshot.submitted_at);
    }

    #[test]
    fn test_sweep_times_out_after_grace() {
        let h = harness();
        h.service.start_exam(&exam(), STUDENT).unwrap();

        h.clock.set(END + h.service.config().grace_ms());
        assert_eq!(h.service.sweep_timeouts().unwrap(), 0);

        h.clock.advance(1);
        assert_eq!(h.service.sweep_timeouts().unwrap(), 1);
        let snapshot = h.service.get_submission(&exam(), STUDENT).unwrap();
        assert_eq!(snapshot.status, SubmissionStatus::Timeout);
        assert!(h.audit.kinds().contains(&ViolationKind::ExamTimeout));

        // Idempotent
        assert_eq!(h.service.sweep_timeouts().unwrap(), 0);
    }

    #[test]
    fn test_sweep_continues_when_audit_log_fails() {
        let h = harness();
        h.service.start_exam(&exam(), STUDENT).unwrap();
        h.service.start_exam(&exam(), "23JR1A05B7").unwrap();
        h.audit.fail.store(true, Ordering::SeqCst);

        h.clock.set(END * 2);
        assert_eq!(h.service.sweep_timeouts().unwrap(), 2);
        for student in [STUDENT, "23JR1A05B7"] {
            assert_eq!(
                h.service.get_submission(&exam(), student).unwrap().status,
                SubmissionStatus::Timeout
            );
        }
    }

    #[test]
    fn test_sweep_skips_terminal_attempts() {
        let h = harness();
        h.service.start_exam(&exam(), STUDENT).unwrap();
        h.service.submit_exam(&exam(), STUDENT).unwrap();
        h.clock.set(END * 2);
        assert_eq!(h.service.sweep_timeouts().unwrap(), 0);
        assert_eq!(
            h.service.get_submission(&exam(), STUDENT).unwrap().status,
            SubmissionStatus::Submitted
        );
    }

    #[test]
    fn test_audit_failure_surfaces_as_storage_error() {
        let h = harness();
        h.audit.fail.store(true, Ordering::SeqCst);
        let err = h.service.start_exam(&exam(), STUDENT).unwrap_err();
        assert!(matches!(err, LifecycleError::Storage(_)));
    }

    #[test]
    fn test_list_submissions_for_unknown_exam() {
        let h = harness();
        assert!(matches!(
            h.service.list_submissions(&ExamId::new("ghost")),
            Err(LifecycleError::ExamNotFound(_))
        ));
        h.service.start_exam(&exam(), STUDENT).unwrap();
        assert_eq!(h.service.list_submissions(&exam()).unwrap().len(), 1);
    }
}
