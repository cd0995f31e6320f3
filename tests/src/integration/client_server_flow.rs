//! Browser signals travelling all the way to the ledger and back.

use pc_01_detectors::{BrowserSignal, Disposition, KeyChord};
use pc_03_violation_ledger::ViolationLedgerApi;
use pc_04_submission_lifecycle::{LifecycleError, SubmissionLifecycleApi};
use shared_types::{StudentId, SubmissionStatus, ViolationKind};

use super::support::{Client, ExamSetup, Server, STUDENT};

#[tokio::test]
async fn test_three_blurs_warn_then_lock_the_page() {
    let server = Server::new(ExamSetup::max(3));
    server.start();
    let mut client = Client::connect(server.transport(), server.policy());
    let now = server.now();

    client.signal(BrowserSignal::WindowBlur, now);
    client.settle(1).await;
    assert_eq!(client.warnings(), 0);
    assert!(!client.is_locked());

    client.signal(BrowserSignal::WindowBlur, now + 1_000);
    client.settle(2).await;
    assert_eq!(client.warnings(), 1);
    assert!(!client.is_locked());

    client.signal(BrowserSignal::WindowBlur, now + 2_000);
    client.settle(3).await;
    assert!(client.is_locked());
    assert_eq!(client.ui.lockdowns(), 1);

    // Locked page: detectors go quiet and nothing else is sent.
    let response = client.signal(BrowserSignal::WindowBlur, now + 3_000);
    assert_eq!(response.reported, 0);
    assert_eq!(client.detectors.suppressed(), 1);

    let stats = client.run.await.unwrap();
    assert_eq!(stats.delivered, 3);

    let submission = server.submission();
    assert_eq!(submission.status, SubmissionStatus::Disqualified);
    assert_eq!(submission.violation_count, 3);
    assert_eq!(
        submission.disqualification_reason.as_deref(),
        Some("Exceeded maximum violations (3)")
    );

    let err = server
        .container
        .lifecycle
        .submit_exam(&Server::exam_id(), STUDENT)
        .unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::AlreadyFinalized { status: SubmissionStatus::Disqualified, .. }
    ));
}

#[tokio::test]
async fn test_blur_then_return_counts_twice() {
    let server = Server::new(ExamSetup::max(3));
    server.start();
    let mut client = Client::connect(server.transport(), server.policy());
    let now = server.now();

    assert_eq!(client.signal(BrowserSignal::WindowBlur, now).reported, 1);
    assert_eq!(client.signal(BrowserSignal::WindowFocus, now + 4_500).reported, 1);
    client.settle(2).await;

    let submission = server.submission();
    assert_eq!(submission.violation_count, 2);
    let kinds: Vec<_> = submission.violation_log.iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&ViolationKind::WindowBlur));
    assert!(kinds.contains(&ViolationKind::TabSwitch));
    assert_eq!(client.warnings(), 1);
}

#[tokio::test]
async fn test_zero_threshold_locks_on_first_counted_event() {
    let server = Server::new(ExamSetup::max(0));
    server.start();
    let mut client = Client::connect(server.transport(), server.policy());

    client.signal(BrowserSignal::VisibilityChanged { hidden: true }, server.now());
    client.settle(1).await;

    assert!(client.is_locked());
    assert_eq!(server.submission().status, SubmissionStatus::Disqualified);
    assert_eq!(server.submission().violation_count, 1);
}

#[tokio::test]
async fn test_right_click_is_logged_but_not_counted() {
    let server = Server::new(ExamSetup::max(1));
    server.start();
    let mut client = Client::connect(server.transport(), server.policy());

    let response = client.signal(BrowserSignal::ContextMenu, server.now());
    assert_eq!(response.disposition, Disposition::PreventDefault);
    assert_eq!(response.reported, 1);
    client.settle(1).await;

    assert!(!client.is_locked());
    let submission = server.submission();
    assert_eq!(submission.status, SubmissionStatus::InProgress);
    assert_eq!(submission.violation_count, 0);
    assert_eq!(submission.violation_log.len(), 1);

    let activity = server
        .container
        .ledger
        .student_activity(&StudentId::new(STUDENT), 10);
    assert_eq!(activity[0].kind, ViolationKind::RightClick);
}

#[tokio::test]
async fn test_copy_paste_allowed_exam_stays_silent() {
    let server = Server::new(ExamSetup {
        allow_copy_paste: true,
        ..ExamSetup::default()
    });
    server.start();
    let mut client = Client::connect(server.transport(), server.policy());

    let response = client.signal(BrowserSignal::Paste, server.now());
    assert_eq!(response.reported, 0);
    assert_eq!(response.disposition, Disposition::Allow);
    assert!(!client.detectors.armed().contains(&"clipboard"));
    assert_eq!(server.submission().violation_count, 0);
}

#[tokio::test]
async fn test_paste_blocked_and_counted_when_not_allowed() {
    let server = Server::new(ExamSetup::max(3));
    server.start();
    let mut client = Client::connect(server.transport(), server.policy());

    let response = client.signal(BrowserSignal::Paste, server.now());
    assert_eq!(response.disposition, Disposition::PreventDefault);
    client.settle(1).await;
    assert_eq!(server.submission().violation_count, 1);
}

#[tokio::test]
async fn test_devtools_shortcut_is_blocked_and_counted_once_per_opening() {
    let server = Server::new(ExamSetup::max(5));
    server.start();
    let mut client = Client::connect(server.transport(), server.policy());
    let now = server.now();

    let response = client.signal(BrowserSignal::KeyDown(KeyChord::new("F12")), now);
    assert_eq!(response.disposition, Disposition::PreventDefault);

    let wide = BrowserSignal::ViewportMeasured {
        outer_width: 1600,
        inner_width: 1200,
        outer_height: 900,
        inner_height: 880,
    };
    assert_eq!(client.signal(wide.clone(), now + 500).reported, 1);
    assert_eq!(client.signal(wide, now + 1_000).reported, 0);
    client.settle(2).await;

    let submission = server.submission();
    assert_eq!(submission.violation_count, 2);
    assert!(submission
        .violation_log
        .iter()
        .all(|e| e.kind == ViolationKind::DevtoolsOpened));
}

#[tokio::test]
async fn test_events_before_start_are_audit_only() {
    let server = Server::new(ExamSetup::max(1));
    let mut client = Client::connect(server.transport(), server.policy());

    client.signal(BrowserSignal::WindowBlur, server.now());
    client.settle(1).await;

    assert!(!client.is_locked());
    assert_eq!(client.reporter.stats().delivered, 1);
    let activity = server
        .container
        .ledger
        .student_activity(&StudentId::new(STUDENT), 10);
    assert_eq!(activity.len(), 1);
    assert!(matches!(
        server.container.lifecycle.get_submission(&Server::exam_id(), STUDENT),
        Err(LifecycleError::SubmissionNotFound(_))
    ));
}

#[tokio::test]
async fn test_reports_after_submit_leave_the_record_alone() {
    let server = Server::new(ExamSetup::max(1));
    server.start();
    server
        .container
        .lifecycle
        .submit_exam(&Server::exam_id(), STUDENT)
        .unwrap();
    let mut client = Client::connect(server.transport(), server.policy());

    client.signal(BrowserSignal::WindowBlur, server.now());
    client.settle(1).await;

    assert!(!client.is_locked());
    let submission = server.submission();
    assert_eq!(submission.status, SubmissionStatus::Submitted);
    assert_eq!(submission.violation_count, 0);
    assert!(submission.violation_log.is_empty());
}
