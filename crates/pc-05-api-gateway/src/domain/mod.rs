//! Domain layer for the API Gateway.

pub mod config;
pub mod error;

pub use config::*;
pub use error::*;
