//! # Event Reporter Service
//!
//! ```text
//! EventReceiver ──→ run() ──spawn per event──→ report() ──→ ReportTransport
//!                                                  │
//!                                                  └──→ apply_verdict()
//!                                                         ├─ warning → toast
//!                                                         └─ disqualified → lock
//! ```
//!
//! Reports are independent tasks; their completion order is not preserved.
//! A failed report is dropped and never retried.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use pc_01_detectors::{PhaseController, PhaseWatch, UiDirective};
use shared_bus::EventReceiver;
use shared_types::{ActivityReport, Verdict, ViolationEvent};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::domain::{ReportError, LOCKDOWN_MESSAGE, LOCKDOWN_TITLE};
use crate::ports::{EventReporterApi, ExamUi, ReportTransport};

/// Dependencies for the Event Reporter.
pub struct ReporterDependencies {
    pub transport: Arc<dyn ReportTransport>,
    pub ui: Arc<dyn ExamUi>,
    pub phase: PhaseController,
}

#[derive(Debug, Default)]
struct Counters {
    delivered: AtomicU64,
    dropped: AtomicU64,
    suppressed: AtomicU64,
}

/// Point-in-time reporter counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReporterStats {
    pub delivered: u64,
    pub dropped: u64,
    pub suppressed: u64,
}

pub struct EventReporter {
    transport: Arc<dyn ReportTransport>,
    ui: Arc<dyn ExamUi>,
    phase: PhaseController,
    counters: Counters,
}

impl EventReporter {
    pub fn new(deps: ReporterDependencies) -> Self {
        Self {
            transport: deps.transport,
            ui: deps.ui,
            phase: deps.phase,
            counters: Counters::default(),
        }
    }

    /// Receiver side of the session phase, for detectors and UI.
    pub fn phase(&self) -> PhaseWatch {
        self.phase.watch()
    }

    pub fn stats(&self) -> ReporterStats {
        ReporterStats {
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
            suppressed: self.counters.suppressed.load(Ordering::Relaxed),
        }
    }

    /// Like [`EventReporterApi::report`], but says why nothing came back.
    pub async fn try_report(&self, event: &ViolationEvent) -> Result<Verdict, ReportError> {
        if self.phase.current().is_locked() {
            return Err(ReportError::Locked);
        }
        let ack = self
            .transport
            .send(&ActivityReport::from_event(event))
            .await?;
        Ok(ack.verdict())
    }

    /// Drains `events` until the channel closes or the session locks,
    /// sending each event as its own task.
    pub async fn run(self: Arc<Self>, mut events: EventReceiver) -> ReporterStats {
        let mut phase = self.phase();
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                next = events.recv() => {
                    let Some(event) = next else { break };
                    let reporter = Arc::clone(&self);
                    in_flight.spawn(async move {
                        reporter.report(event).await;
                    });
                }
                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
                _ = phase.locked() => {
                    debug!("Session locked, reporter stopping");
                    events.close();
                    break;
                }
            }
        }

        while in_flight.join_next().await.is_some() {}
        self.stats()
    }
}

#[async_trait]
impl EventReporterApi for EventReporter {
    async fn report(&self, event: ViolationEvent) -> Option<Verdict> {
        match self.try_report(&event).await {
            Ok(verdict) => {
                self.counters.delivered.fetch_add(1, Ordering::Relaxed);
                debug!(
                    event_id = %event.event_id,
                    kind = event.kind.as_str(),
                    disqualified = verdict.disqualified,
                    "Report delivered"
                );
                self.apply_verdict(&verdict);
                Some(verdict)
            }
            Err(ReportError::Locked) => {
                self.counters.suppressed.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(ReportError::Transport(e)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    event_id = %event.event_id,
                    kind = event.kind.as_str(),
                    code = e.code(),
                    error = %e,
                    "Report dropped"
                );
                None
            }
        }
    }

    fn apply_verdict(&self, verdict: &Verdict) {
        if verdict.disqualified {
            if self.phase.lock() {
                info!("Session locked after disqualification");
                self.ui.lock_down(LOCKDOWN_TITLE, LOCKDOWN_MESSAGE);
            }
            return;
        }
        if let Some(message) = &verdict.warning_message {
            if !self.phase.current().is_locked() {
                self.ui.show(&UiDirective::warning(message.clone()));
            }
        }
    }
}
