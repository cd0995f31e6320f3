//! The production HTTP transport against a bound server.

use std::sync::Arc;

use pc_01_detectors::BrowserSignal;
use pc_02_event_reporter::{HttpTransport, ReportTransport, TransportConfig, TransportError};
use proctor_runtime::ProctorRuntime;
use shared_types::{ActivityReport, SubmissionStatus};
use tokio::net::TcpListener;

use super::support::{Client, ExamSetup, Server};

struct Running {
    server: Server,
    runtime: ProctorRuntime,
    base_url: String,
}

async fn run(setup: ExamSetup) -> Running {
    let server = Server::new(setup);
    let runtime = ProctorRuntime::with_container(server.config.clone(), server.container.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let handles = runtime.start_on(listener).unwrap();
    let base_url = format!("http://{}/api", handles.local_addr);

    Running {
        server,
        runtime,
        base_url,
    }
}

fn transport(base_url: &str) -> Arc<HttpTransport> {
    Arc::new(HttpTransport::new(&TransportConfig::with_base_url(base_url)).unwrap())
}

#[tokio::test]
async fn test_disqualification_over_http() {
    let running = run(ExamSetup::max(2)).await;
    running.server.start();
    let mut client = Client::connect(transport(&running.base_url), running.server.policy());
    let now = running.server.now();

    client.signal(BrowserSignal::WindowBlur, now);
    client.settle(1).await;
    assert_eq!(client.warnings(), 1);

    client.signal(BrowserSignal::VisibilityChanged { hidden: true }, now + 10);
    client.settle(2).await;
    assert!(client.is_locked());
    assert_eq!(client.ui.lockdowns(), 1);
    assert_eq!(running.server.submission().status, SubmissionStatus::Disqualified);

    running.runtime.shutdown();
}

#[tokio::test]
async fn test_unknown_student_is_rejected_not_retried() {
    let running = run(ExamSetup::default()).await;

    let report = ActivityReport {
        event_id: None,
        student_id: "23JR1A05Z9".into(),
        exam_id: None,
        kind: "LOGIN".into(),
        description: String::new(),
        severity: None,
        metadata: None,
        occurred_at: None,
    };
    let err = transport(&running.base_url).send(&report).await.unwrap_err();
    assert!(matches!(&err, TransportError::Rejected { status: 404, .. }));
    assert!(!err.is_transient());

    running.runtime.shutdown();
}

#[tokio::test]
async fn test_unreachable_server_drops_reports() {
    let server = Server::new(ExamSetup::default());
    let mut client = Client::connect(transport("http://127.0.0.1:9/api"), server.policy());

    client.signal(BrowserSignal::WindowBlur, server.now());
    client.settle(1).await;

    let stats = client.reporter.stats();
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.delivered, 0);
    assert!(!client.is_locked());
}
