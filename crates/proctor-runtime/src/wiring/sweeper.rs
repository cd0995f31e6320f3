//! Periodic timeout sweep.
//!
//! Moves IN_PROGRESS attempts whose exam window (plus grace) has passed to
//! TIMEOUT. A failed sweep is logged and retried on the next tick.

use std::sync::Arc;
use std::time::Duration;

use pc_04_submission_lifecycle::SubmissionLifecycleApi;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Runs sweeps against a lifecycle service.
pub struct TimeoutSweeper {
    lifecycle: Arc<dyn SubmissionLifecycleApi>,
    interval: Duration,
}

impl TimeoutSweeper {
    pub fn new(lifecycle: Arc<dyn SubmissionLifecycleApi>, interval: Duration) -> Self {
        Self {
            lifecycle,
            interval,
        }
    }

    /// One sweep. Returns how many attempts were timed out.
    pub fn sweep_once(&self) -> usize {
        match self.lifecycle.sweep_timeouts() {
            Ok(0) => {
                debug!("Timeout sweep found nothing to expire");
                0
            }
            Ok(count) => {
                info!(timed_out = count, "Timeout sweep completed");
                count
            }
            Err(e) => {
                warn!(error = %e, "Timeout sweep failed");
                0
            }
        }
    }

    /// Sweeps every interval until `shutdown` flips to `true` or its sender
    /// is dropped. Returns the total number of attempts timed out.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> usize {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut total = 0;

        info!(interval = ?self.interval, "Timeout sweeper started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    total += self.sweep_once();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!(timed_out = total, "Timeout sweeper stopping");
                        return total;
                    }
                }
            }
        }
    }
}

/// Spawns a [`TimeoutSweeper`] on the current runtime.
pub fn run_timeout_sweeper(
    lifecycle: Arc<dyn SubmissionLifecycleApi>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<usize> {
    tokio::spawn(TimeoutSweeper::new(lifecycle, interval).run(shutdown))
}
