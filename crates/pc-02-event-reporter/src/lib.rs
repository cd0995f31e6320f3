//! # Event Reporter (pc-02)
//!
//! Delivers detector output to the proctoring server and enacts the verdict
//! that comes back.
//!
//! | Verdict | Client effect |
//! |---------|---------------|
//! | no message | none |
//! | `warningMessage` | transient toast, inputs untouched |
//! | `disqualified` | [`SessionPhase`](pc_01_detectors::SessionPhase) → LOCKED, inputs disabled, terminal overlay |
//!
//! Delivery is fire-and-forget: network failures drop the report, nothing is
//! retried, and the student is never shown a transport error.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::{EventReporter, ReporterDependencies, ReporterStats};
