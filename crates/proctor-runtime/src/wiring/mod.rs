//! Background tasks spawned next to the HTTP server.

mod sweeper;

pub use sweeper::{run_timeout_sweeper, TimeoutSweeper};
