//! # Inbound Port - EventReporterApi

use async_trait::async_trait;
use shared_types::{Verdict, ViolationEvent};

#[async_trait]
pub trait EventReporterApi: Send + Sync {
    /// Sends `event` and enacts the verdict.
    ///
    /// `None` when the report was dropped (network failure, rejection) or
    /// suppressed (session locked). Never retried.
    async fn report(&self, event: ViolationEvent) -> Option<Verdict>;

    /// Applies a verdict obtained elsewhere, e.g. a resumed submission that
    /// is already disqualified.
    fn apply_verdict(&self, verdict: &Verdict);
}
