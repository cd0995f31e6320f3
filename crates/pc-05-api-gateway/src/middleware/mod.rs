//! Middleware stack.
//!
//! ```text
//! request → CORS → trace → timeout → body limit → [admin key] → metrics → handler
//! ```

pub mod auth;
pub mod cors;
pub mod metrics;

pub use auth::{constant_time_compare, require_admin_key, AdminKey};
pub use cors::create_cors_layer;
pub use metrics::track_requests;
