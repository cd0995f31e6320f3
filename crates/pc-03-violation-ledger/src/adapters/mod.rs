//! Adapters for the Violation Ledger subsystem.

pub mod activity_log;

pub use activity_log::*;
