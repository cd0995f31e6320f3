//! # API Gateway (pc-05)
//!
//! HTTP surface of the proctoring server.
//!
//! ## Error Body
//!
//! ```json
//! {"success": false, "code": "ALREADY_FINALIZED", "message": "..."}
//! ```
//!
//! See [`domain::error`] for the status mapping and [`routes`] for the
//! route table.
//!
//! ## Security
//!
//! - Admin reads require `X-API-Key` (or a bearer token), compared in
//!   constant time. No configured key means no admin access.
//! - Request bodies are size-limited and every request has a timeout.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod middleware;
pub mod routes;
pub mod service;

pub use domain::*;
pub use routes::AppState;
pub use service::{ApiGatewayService, GatewayDependencies};
