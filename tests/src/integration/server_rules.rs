//! Server-side counting rules under concurrency and after finalization.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;

use pc_03_violation_ledger::{AppendOutcome, Decision, ViolationLedgerApi};
use pc_04_submission_lifecycle::{LifecycleError, SubmissionLifecycleApi};
use proctor_runtime::TimeoutSweeper;
use shared_types::{ExamId, Severity, StudentId, SubmissionStatus, ViolationEvent, ViolationKind};
use std::time::Duration;

use super::support::{ExamSetup, Server, EXAM, STUDENT};

fn event(server: &Server, kind: ViolationKind) -> ViolationEvent {
    ViolationEvent::new(
        StudentId::new(STUDENT),
        Some(ExamId::new(EXAM)),
        kind,
        Severity::High,
        "reported",
        server.now(),
    )
}

#[test]
fn test_concurrent_reports_disqualify_exactly_once() {
    let server = Server::new(ExamSetup::max(3));
    server.start();

    const REPORTERS: usize = 16;
    let barrier = Barrier::new(REPORTERS);
    let disqualifications = AtomicUsize::new(0);
    let terminal = AtomicUsize::new(0);

    std::thread::scope(|scope| {
        for _ in 0..REPORTERS {
            scope.spawn(|| {
                let report = event(&server, ViolationKind::WindowBlur);
                barrier.wait();
                let result = server.container.ledger.append(report).unwrap();
                if result.decision == Decision::Disqualify {
                    disqualifications.fetch_add(1, Ordering::SeqCst);
                }
                if result.outcome == AppendOutcome::Terminal {
                    terminal.fetch_add(1, Ordering::SeqCst);
                    assert!(result.ack().disqualified);
                }
            });
        }
    });

    assert_eq!(disqualifications.load(Ordering::SeqCst), 1);
    assert_eq!(terminal.load(Ordering::SeqCst), REPORTERS - 3);

    let submission = server.submission();
    assert_eq!(submission.status, SubmissionStatus::Disqualified);
    assert_eq!(submission.violation_count, 3);
    assert_eq!(submission.violation_log.len(), 3);

    let disqualified_entries = server
        .container
        .ledger
        .student_activity(&StudentId::new(STUDENT), 100)
        .into_iter()
        .filter(|e| e.description.starts_with("Disqualified:"))
        .count();
    assert_eq!(disqualified_entries, 1);
}

#[test]
fn test_submit_racing_final_violation_has_one_winner() {
    for _ in 0..20 {
        let server = Server::new(ExamSetup::max(1));
        server.start();
        let barrier = Barrier::new(2);

        let (submitted, disqualified) = std::thread::scope(|scope| {
            let submit = scope.spawn(|| {
                barrier.wait();
                server
                    .container
                    .lifecycle
                    .submit_exam(&Server::exam_id(), STUDENT)
                    .is_ok()
            });
            let violation = scope.spawn(|| {
                let report = event(&server, ViolationKind::TabSwitch);
                barrier.wait();
                server.container.ledger.append(report).unwrap().decision == Decision::Disqualify
            });
            (submit.join().unwrap(), violation.join().unwrap())
        });

        assert!(submitted ^ disqualified, "exactly one transition must win");
        let status = server.submission().status;
        if submitted {
            assert_eq!(status, SubmissionStatus::Submitted);
            assert_eq!(server.submission().violation_count, 0);
        } else {
            assert_eq!(status, SubmissionStatus::Disqualified);
        }
    }
}

#[test]
fn test_redelivered_event_counts_once() {
    let server = Server::new(ExamSetup::max(3));
    server.start();
    let report = event(&server, ViolationKind::WindowBlur);

    let first = server.container.ledger.append(report.clone()).unwrap();
    let again = server.container.ledger.append(report).unwrap();

    assert_eq!(first.outcome, AppendOutcome::Counted);
    assert_eq!(again.outcome, AppendOutcome::Duplicate);
    assert_eq!(again.violation_count, Some(1));
    assert_eq!(server.submission().violation_count, 1);
}

#[test]
fn test_finalized_attempt_is_idempotent() {
    let server = Server::new(ExamSetup::max(2));
    server.start();
    let exam = Server::exam_id();
    let lifecycle = &server.container.lifecycle;

    server
        .container
        .ledger
        .append(event(&server, ViolationKind::WindowBlur))
        .unwrap();
    let submitted = lifecycle.submit_exam(&exam, STUDENT).unwrap();
    assert_eq!(submitted.violation_count, 1);

    let late = server
        .container
        .ledger
        .append(event(&server, ViolationKind::WindowBlur))
        .unwrap();
    assert_eq!(late.outcome, AppendOutcome::Terminal);
    assert!(!late.ack().disqualified);

    assert!(matches!(
        lifecycle.submit_exam(&exam, STUDENT),
        Err(LifecycleError::AlreadyFinalized { status: SubmissionStatus::Submitted, .. })
    ));
    assert!(matches!(
        lifecycle.start_exam(&exam, STUDENT),
        Err(LifecycleError::AlreadySubmitted(_))
    ));

    server.expire();
    assert_eq!(lifecycle.sweep_timeouts().unwrap(), 0);

    let after = server.submission();
    assert_eq!(after.status, SubmissionStatus::Submitted);
    assert_eq!(after.violation_count, 1);
    assert_eq!(after.submitted_at, submitted.submitted_at);
}

#[test]
fn test_timed_out_attempt_ignores_late_reports() {
    let server = Server::new(ExamSetup::max(1));
    server.start();
    server.expire();

    let sweeper = TimeoutSweeper::new(server.container.lifecycle.clone(), Duration::from_secs(30));
    assert_eq!(sweeper.sweep_once(), 1);

    let late = server
        .container
        .ledger
        .append(event(&server, ViolationKind::TabSwitch))
        .unwrap();
    assert_eq!(late.outcome, AppendOutcome::Terminal);

    let submission = server.submission();
    assert_eq!(submission.status, SubmissionStatus::Timeout);
    assert_eq!(submission.violation_count, 0);

    let kinds: Vec<_> = server
        .container
        .ledger
        .exam_activity(&Server::exam_id(), 10)
        .into_iter()
        .map(|e| e.kind)
        .collect();
    assert!(kinds.contains(&ViolationKind::ExamTimeout));
}
