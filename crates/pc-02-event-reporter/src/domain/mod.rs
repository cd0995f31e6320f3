//! # Domain Layer - Event Reporter

pub mod config;
pub mod errors;

pub use config::*;
pub use errors::*;

/// Terminal overlay shown on lock-down.
pub const LOCKDOWN_TITLE: &str = "DISQUALIFIED";
pub const LOCKDOWN_MESSAGE: &str =
    "You have been disqualified from this exam due to multiple violations.";
