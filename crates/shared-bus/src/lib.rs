//! # Shared Bus - Detector Event Channel
//!
//! Carries `ViolationEvent`s from the independent detectors of one exam
//! session to the single event reporter that delivers them to the server.
//!
//! ## Topology
//!
//! ```text
//! ┌───────────┐ ┌───────────┐ ┌───────────┐
//! │  Focus    │ │ Clipboard │ │ Inactivity│   ... independent producers
//! └─────┬─────┘ └─────┬─────┘ └─────┬─────┘
//!       │ publish()   │             │
//!       └─────────────┼─────────────┘
//!                     ▼
//!            ┌─────────────────┐
//!            │ bounded channel │  (drops when full, never blocks a detector)
//!            └────────┬────────┘
//!                     ▼ recv()
//!            ┌─────────────────┐
//!            │ Event Reporter  │
//!            └─────────────────┘
//! ```
//!
//! ## Delivery Rules
//!
//! - Producers never block: a full channel drops the event and counts it.
//! - One consumer per session.
//! - The server side uses [`EventReplayCache`] to discard re-deliveries of an
//!   event id it has already recorded.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod publisher;
pub mod replay_cache;
pub mod subscriber;

// Re-export main types
pub use publisher::{bounded, BusPublisher, BusStats, EventPublisher, PublishOutcome};
pub use replay_cache::{EventReplayCache, ReplayError};
pub use subscriber::{EventReceiver, EventStream};

/// Maximum events buffered between detectors and the reporter.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
