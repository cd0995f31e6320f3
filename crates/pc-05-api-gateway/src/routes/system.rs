//! Health and metrics.

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::domain::ApiError;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "exam-proctor",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let body = proctor_telemetry::encode_metrics().map_err(|e| ApiError::internal(e.to_string()))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
