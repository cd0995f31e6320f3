//! Request counter: `proctor_http_requests_total{route, status}`.
//!
//! Installed with `route_layer`, so the label is the matched route template
//! (`/api/exams/:id/start`), never a raw path.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use proctor_telemetry::{metric_inc, HTTP_REQUESTS};

pub async fn track_requests(req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(req).await;
    metric_inc!(HTTP_REQUESTS, &[route.as_str(), response.status().as_str()]);
    response
}
