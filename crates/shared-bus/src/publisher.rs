//! # Event Publisher
//!
//! Defines the producing side of the detector channel.

use crate::subscriber::EventReceiver;
use shared_types::ViolationEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Result of handing an event to the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Queued for the reporter.
    Queued,
    /// Channel full; event dropped.
    DroppedFull,
    /// Reporter gone; event dropped.
    Closed,
}

/// Trait for publishing detector output.
///
/// Detectors run synchronously inside UI callbacks, so publishing never
/// awaits.
pub trait EventPublisher: Send + Sync {
    /// Hand an event to the reporter.
    fn publish(&self, event: ViolationEvent) -> PublishOutcome;

    /// Total events offered to the bus, including dropped ones.
    fn events_published(&self) -> u64;
}

/// Counters shared by every clone of a publisher.
#[derive(Debug, Default)]
pub struct BusStats {
    pub published: AtomicU64,
    pub dropped: AtomicU64,
}

impl BusStats {
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Cloneable producer handle over a bounded `tokio::sync::mpsc` channel.
#[derive(Clone)]
pub struct BusPublisher {
    sender: mpsc::Sender<ViolationEvent>,
    stats: Arc<BusStats>,
}

/// Create a bounded channel with the given capacity.
///
/// # Panics
///
/// Panics if `capacity` is zero (tokio requirement).
#[must_use]
pub fn bounded(capacity: usize) -> (BusPublisher, EventReceiver) {
    let (sender, receiver) = mpsc::channel(capacity);
    let stats = Arc::new(BusStats::default());
    (
        BusPublisher {
            sender,
            stats: Arc::clone(&stats),
        },
        EventReceiver::new(receiver, stats),
    )
}

impl BusPublisher {
    /// Shared counters.
    pub fn stats(&self) -> Arc<BusStats> {
        Arc::clone(&self.stats)
    }

    /// Whether the consuming side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl EventPublisher for BusPublisher {
    fn publish(&self, event: ViolationEvent) -> PublishOutcome {
        self.stats.published.fetch_add(1, Ordering::Relaxed);
        let kind = event.kind;

        match self.sender.try_send(event) {
            Ok(()) => {
                debug!(kind = %kind, "Event queued for reporter");
                PublishOutcome::Queued
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(kind = %kind, "Event dropped (channel full)");
                PublishOutcome::DroppedFull
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                debug!(kind = %kind, "Event dropped (reporter closed)");
                PublishOutcome::Closed
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.stats.published.load(Ordering::Relaxed)
    }
}
