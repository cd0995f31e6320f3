//! Ports for the Violation Ledger subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
