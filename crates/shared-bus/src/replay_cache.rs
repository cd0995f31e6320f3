//! # Event Replay Cache
//!
//! Discards re-deliveries of an event id the server has already recorded.
//!
//! A reporter that retries after a lost response may send the same event
//! twice. Distinct events (distinct ids) are never collapsed, even when their
//! content is identical.
//!
//! ## Memory Bound
//!
//! - Ids are remembered for `retention_ms` after first sight
//! - Expired ids are garbage-collected every `gc_interval_ms`

use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use shared_types::Timestamp;

/// Errors from replay cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The event id was already recorded.
    #[error("Event {event_id} was already recorded at {first_seen}")]
    AlreadySeen { event_id: Uuid, first_seen: Timestamp },
}

/// Time-bounded set of recently recorded event ids.
///
/// Callers pass the clock reading so that tests stay deterministic.
pub struct EventReplayCache {
    /// Map of event id -> time it was first recorded.
    seen: HashMap<Uuid, Timestamp>,

    retention_ms: u64,

    last_gc: Timestamp,

    gc_interval_ms: u64,
}

impl EventReplayCache {
    /// Default retention: 10 minutes.
    pub const DEFAULT_RETENTION_MS: u64 = 10 * 60 * 1000;

    /// Default garbage collection interval.
    pub const DEFAULT_GC_INTERVAL_MS: u64 = 10 * 1000;

    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Self::DEFAULT_RETENTION_MS, Self::DEFAULT_GC_INTERVAL_MS)
    }

    #[must_use]
    pub fn with_config(retention_ms: u64, gc_interval_ms: u64) -> Self {
        Self {
            seen: HashMap::new(),
            retention_ms,
            last_gc: 0,
            gc_interval_ms,
        }
    }

    /// Record `event_id`, or reject it if it is still remembered.
    ///
    /// # Errors
    ///
    /// - `ReplayError::AlreadySeen` - id recorded within the retention window
    pub fn check_and_insert(&mut self, event_id: Uuid, now: Timestamp) -> Result<(), ReplayError> {
        if now.saturating_sub(self.last_gc) >= self.gc_interval_ms {
            self.garbage_collect(now);
            self.last_gc = now;
        }

        if let Some(&first_seen) = self.seen.get(&event_id) {
            if now.saturating_sub(first_seen) <= self.retention_ms {
                return Err(ReplayError::AlreadySeen {
                    event_id,
                    first_seen,
                });
            }
        }

        self.seen.insert(event_id, now);
        Ok(())
    }

    /// Forget an id, e.g. when recording it failed after the check.
    pub fn forget(&mut self, event_id: &Uuid) {
        self.seen.remove(event_id);
    }

    /// Remove ids older than the retention window.
    pub fn garbage_collect(&mut self, now: Timestamp) {
        let cutoff = now.saturating_sub(self.retention_ms);
        self.seen.retain(|_, first_seen| *first_seen >= cutoff);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl Default for EventReplayCache {
    fn default() -> Self {
        Self::new()
    }
}
