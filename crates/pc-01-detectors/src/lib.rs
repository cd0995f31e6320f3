//! # Detector Set (pc-01)
//!
//! Client-side monitors for one proctored exam session. The host page turns
//! DOM events into [`BrowserSignal`]s; the [`DetectorSet`] turns them into
//! [`shared_types::ViolationEvent`]s on the reporter channel and tells the
//! host which default actions to suppress and what to show.
//!
//! ## Rules
//!
//! - Detectors are independent. Duplicate reports for one real switch (blur
//!   plus hidden) are expected and kept.
//! - Detectors never decide disqualification.
//! - Shortcut interception happens even when the report cannot be queued.
//! - After the session locks, nothing is emitted.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod detectors;
pub mod domain;
pub mod set;

pub use detectors::*;
pub use domain::*;
pub use set::{DetectorSet, DetectorSetBuilder, SignalResponse};
