//! Subsystem container: configuration plus the shared service instances.

pub mod config;
mod subsystems;

pub use config::{ConfigError, ExamEntry, LedgerConfig, ProctorConfig, StudentEntry, StudentsConfig};
pub use subsystems::ProctorContainer;
