//! Prometheus metrics for the exam-proctor services.
//!
//! All metrics follow the naming convention: `proctor_<area>_<metric>`
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `proctor_ledger_events_total` | Counter | `kind` |
//! | `proctor_ledger_counted_total` | Counter | |
//! | `proctor_disqualifications_total` | Counter | |
//! | `proctor_submissions_total` | Counter | `status` |
//! | `proctor_audit_only_total` | Counter | |
//! | `proctor_http_requests_total` | Counter | `route`, `status` |

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // LEDGER METRICS
    // =========================================================================

    /// Every event handed to the ledger, by kind
    pub static ref LEDGER_EVENTS: CounterVec = CounterVec::new(
        Opts::new("proctor_ledger_events_total", "Events appended to the violation ledger"),
        &["kind"]
    ).expect("metric creation failed");

    /// Events that incremented a violation counter
    pub static ref LEDGER_COUNTED: Counter = Counter::new(
        "proctor_ledger_counted_total",
        "Events that incremented a submission's violation count"
    ).expect("metric creation failed");

    pub static ref DISQUALIFICATIONS: Counter = Counter::new(
        "proctor_disqualifications_total",
        "Submissions transitioned to DISQUALIFIED"
    ).expect("metric creation failed");

    /// Events recorded with no matching in-progress submission
    pub static ref AUDIT_ONLY_EVENTS: Counter = Counter::new(
        "proctor_audit_only_total",
        "Events recorded for audit only (no submission or terminal submission)"
    ).expect("metric creation failed");

    // =========================================================================
    // LIFECYCLE METRICS
    // =========================================================================

    /// Submission transitions, by resulting status
    pub static ref SUBMISSIONS: CounterVec = CounterVec::new(
        Opts::new("proctor_submissions_total", "Submission lifecycle transitions"),
        &["status"]  // IN_PROGRESS on start, then SUBMITTED/DISQUALIFIED/TIMEOUT
    ).expect("metric creation failed");

    // =========================================================================
    // HTTP METRICS
    // =========================================================================

    pub static ref HTTP_REQUESTS: CounterVec = CounterVec::new(
        Opts::new("proctor_http_requests_total", "HTTP requests served"),
        &["route", "status"]
    ).expect("metric creation failed");
}

pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Ledger
        Box::new(LEDGER_EVENTS.clone()),
        Box::new(LEDGER_COUNTED.clone()),
        Box::new(DISQUALIFICATIONS.clone()),
        Box::new(AUDIT_ONLY_EVENTS.clone()),
        // Lifecycle
        Box::new(SUBMISSIONS.clone()),
        // HTTP
        Box::new(HTTP_REQUESTS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Render the registry in the Prometheus text exposition format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
