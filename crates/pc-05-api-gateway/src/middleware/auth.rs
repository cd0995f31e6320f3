//! Admin API key check for `/api/admin/*`.
//!
//! Accepted headers: `X-API-Key: <key>` or `Authorization: Bearer <key>`.
//! With no key configured every admin request is refused.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::domain::ApiError;

/// Configured admin key, shared by every request.
#[derive(Clone, Default)]
pub struct AdminKey(Option<Arc<str>>);

impl AdminKey {
    pub fn new(key: Option<String>) -> Self {
        Self(key.map(Arc::from))
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }
}

fn presented_key(req: &Request) -> Option<&str> {
    let headers = req.headers();
    if let Some(key) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        return Some(key);
    }
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

pub async fn require_admin_key(
    State(expected): State<AdminKey>,
    req: Request,
    next: Next,
) -> Response {
    let Some(expected) = expected.0.as_deref() else {
        return ApiError::forbidden("Admin API is disabled").into_response();
    };

    match presented_key(&req) {
        Some(key) if constant_time_compare(key, expected) => next.run(req).await,
        Some(_) => {
            warn!(path = %req.uri().path(), "Admin request with wrong API key");
            ApiError::unauthorized("Invalid API key").into_response()
        }
        None => ApiError::unauthorized("API key required").into_response(),
    }
}

/// Constant-time string comparison.
///
/// Both inputs are padded to the longer length with different fill bytes,
/// so a length mismatch never short-circuits.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    let max_len = std::cmp::max(a.len(), b.len());
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);
    (lengths_equal & contents_equal).into()
}
