//! Shared harness: an in-process server and a simulated exam page.
//!
//! ```text
//! Client: BrowserSignal → DetectorSet → bus → EventReporter ─┐
//!                                                            │ ReportTransport
//! Server: Router (/api/activity) → ViolationLedger ◄─────────┘
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use parking_lot::Mutex;
use pc_01_detectors::{session_phase, BrowserSignal, DetectorSet, SessionContext, SignalResponse, UiDirective};
use pc_02_event_reporter::{
    EventReporter, ExamUi, ReportTransport, ReporterDependencies, ReporterStats, TransportError,
};
use pc_04_submission_lifecycle::{ExamCatalog, MockTimeSource, SubmissionLifecycleApi, SubmissionSnapshot};
use proctor_runtime::{ProctorConfig, ProctorContainer};
use shared_bus::{bounded, BusPublisher};
use shared_types::{ActivityAck, ActivityReport, ExamId, ExamPolicy, StudentId};
use tokio::task::JoinHandle;
use tower::ServiceExt;

pub const STUDENT: &str = "23JR1A05A4";
pub const EXAM: &str = "web-basics";

/// 2026-03-01T09:00:00Z
pub const START_MS: u64 = 1_772_355_600_000;
const EXAM_LENGTH_MS: u64 = 2 * 60 * 60 * 1000;

/// Exam flags for one scenario.
#[derive(Debug, Clone, Copy)]
pub struct ExamSetup {
    pub max_violation_count: i32,
    pub allow_copy_paste: bool,
    pub require_full_screen: bool,
}

impl Default for ExamSetup {
    fn default() -> Self {
        Self {
            max_violation_count: 3,
            allow_copy_paste: false,
            require_full_screen: true,
        }
    }
}

impl ExamSetup {
    pub fn max(max_violation_count: i32) -> Self {
        Self {
            max_violation_count,
            ..Self::default()
        }
    }

    pub fn config(&self) -> ProctorConfig {
        ProctorConfig::from_toml(&format!(
            r#"
[admin]
api_key = "test-admin-key"

[students]
roster = [{{ roll_no = "{STUDENT}", name = "Asha" }}]

[lifecycle]
sweep_interval = "1h"
grace_period = "1m"

[[exams]]
id = "{EXAM}"
title = "Web Basics"
start_time = "2026-03-01T09:00:00Z"
end_time = "2026-03-01T11:00:00Z"
max_violation_count = {max}
allow_copy_paste = {copy}
require_full_screen = {fullscreen}
"#,
            max = self.max_violation_count,
            copy = self.allow_copy_paste,
            fullscreen = self.require_full_screen,
        ))
        .expect("test config parses")
    }
}

/// Server side of a scenario, on a controllable clock.
pub struct Server {
    pub config: ProctorConfig,
    pub container: ProctorContainer,
    pub clock: Arc<MockTimeSource>,
    pub router: Router,
}

impl Server {
    pub fn new(setup: ExamSetup) -> Self {
        let config = setup.config();
        let clock = Arc::new(MockTimeSource::new(START_MS + 60_000));
        let container =
            ProctorContainer::with_time_source(&config, clock.clone()).expect("container builds");
        let router = container.gateway(&config).expect("gateway builds").router();
        Self {
            config,
            container,
            clock,
            router,
        }
    }

    pub fn exam_id() -> ExamId {
        ExamId::new(EXAM)
    }

    pub fn policy(&self) -> ExamPolicy {
        self.container
            .catalog
            .get_policy(&Self::exam_id())
            .expect("exam configured")
    }

    pub fn start(&self) -> SubmissionSnapshot {
        self.container
            .lifecycle
            .start_exam(&Self::exam_id(), STUDENT)
            .expect("exam starts")
            .submission
    }

    pub fn submission(&self) -> SubmissionSnapshot {
        self.container
            .lifecycle
            .get_submission(&Self::exam_id(), STUDENT)
            .expect("submission exists")
    }

    pub fn now(&self) -> u64 {
        use pc_04_submission_lifecycle::TimeSource;
        self.clock.now()
    }

    /// Moves the server clock past the exam end plus grace.
    pub fn expire(&self) {
        self.clock.set(START_MS + EXAM_LENGTH_MS + 61_000);
    }

    pub fn transport(&self) -> Arc<RouterTransport> {
        Arc::new(RouterTransport {
            router: self.router.clone(),
        })
    }
}

/// Posts reports straight into the gateway router.
pub struct RouterTransport {
    router: Router,
}

#[async_trait]
impl ReportTransport for RouterTransport {
    async fn send(&self, report: &ActivityReport) -> Result<ActivityAck, TransportError> {
        let body = serde_json::to_vec(report).map_err(|e| TransportError::Parse(e.to_string()))?;
        let request = Request::builder()
            .method("POST")
            .uri("/api/activity")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .map_err(|e| TransportError::Config(e.to_string()))?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            let code = serde_json::from_slice::<serde_json::Value>(&bytes)
                .ok()
                .and_then(|v| v["code"].as_str().map(str::to_string))
                .unwrap_or_default();
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                code,
            });
        }
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Parse(e.to_string()))
    }
}

/// Exam page stand-in that records what it was asked to show.
#[derive(Default)]
pub struct RecordingUi {
    shown: Mutex<Vec<UiDirective>>,
    lockdowns: AtomicUsize,
}

impl RecordingUi {
    pub fn shown(&self) -> Vec<UiDirective> {
        self.shown.lock().clone()
    }

    pub fn lockdowns(&self) -> usize {
        self.lockdowns.load(Ordering::SeqCst)
    }
}

impl ExamUi for RecordingUi {
    fn show(&self, directive: &UiDirective) {
        self.shown.lock().push(directive.clone());
    }

    fn lock_down(&self, _title: &str, _message: &str) {
        self.lockdowns.fetch_add(1, Ordering::SeqCst);
    }
}

/// One student's exam page: detectors publishing into a reporter task.
pub struct Client {
    pub detectors: DetectorSet<BusPublisher>,
    pub reporter: Arc<EventReporter>,
    pub ui: Arc<RecordingUi>,
    pub run: JoinHandle<ReporterStats>,
}

impl Client {
    pub fn connect(transport: Arc<dyn ReportTransport>, policy: ExamPolicy) -> Self {
        let (controller, watch) = session_phase();
        let (publisher, receiver) = bounded(64);
        let ui = Arc::new(RecordingUi::default());

        let session = SessionContext::new(StudentId::new(STUDENT), policy);
        let detectors =
            DetectorSet::standard(session, publisher, watch, START_MS).expect("detectors build");

        let reporter = Arc::new(EventReporter::new(ReporterDependencies {
            transport,
            ui: ui.clone(),
            phase: controller,
        }));
        let run = tokio::spawn(reporter.clone().run(receiver));

        Self {
            detectors,
            reporter,
            ui,
            run,
        }
    }

    pub fn signal(&mut self, signal: BrowserSignal, now: u64) -> SignalResponse {
        self.detectors.handle(&signal, now)
    }

    /// Waits until `count` reports have been resolved one way or another.
    pub async fn settle(&self, count: u64) {
        let reporter = self.reporter.clone();
        tokio::time::timeout(Duration::from_secs(5), async move {
            loop {
                let stats = reporter.stats();
                if stats.delivered + stats.dropped + stats.suppressed >= count {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("reports settle");
    }

    pub fn is_locked(&self) -> bool {
        self.reporter.phase().is_locked()
    }

    pub fn warnings(&self) -> usize {
        self.ui
            .shown()
            .iter()
            .filter(|d| matches!(d, UiDirective::Toast { message, .. } if message == shared_types::Verdict::WARNING_TEXT))
            .count()
    }
}
