//! API Gateway service.
//!
//! Owns the router and the HTTP server lifecycle. Handlers are thin: every
//! rule lives in the lifecycle service or the violation ledger.

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use pc_03_violation_ledger::ViolationLedgerApi;
use pc_04_submission_lifecycle::{SubmissionLifecycleApi, TimeSource};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::domain::{GatewayConfig, GatewayError};
use crate::middleware::{create_cors_layer, require_admin_key, track_requests, AdminKey};
use crate::routes::{activity, admin, exams, system, AppState};

/// Dependencies for the API Gateway.
pub struct GatewayDependencies {
    pub lifecycle: Arc<dyn SubmissionLifecycleApi>,
    pub ledger: Arc<dyn ViolationLedgerApi>,
    pub clock: Arc<dyn TimeSource>,
}

pub struct ApiGatewayService {
    config: GatewayConfig,
    state: AppState,
}

impl ApiGatewayService {
    pub fn new(config: GatewayConfig, deps: GatewayDependencies) -> Result<Self, GatewayError> {
        config.validate()?;
        Ok(Self {
            config,
            state: AppState {
                lifecycle: deps.lifecycle,
                ledger: deps.ledger,
                clock: deps.clock,
            },
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Full router with middleware.
    pub fn router(&self) -> Router {
        let admin_routes = Router::new()
            .route("/api/admin/exams/:id/submissions", get(admin::exam_submissions))
            .route("/api/admin/logs/:student_id", get(admin::student_logs))
            .route_layer(from_fn_with_state(
                AdminKey::new(self.config.admin.api_key.clone()),
                require_admin_key,
            ));

        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&self.config.cors))
            .layer(TimeoutLayer::new(self.config.http.request_timeout));

        Router::new()
            .route("/api/activity", post(activity::record))
            .route("/api/activity/log", post(activity::record))
            .route("/api/exams", get(exams::list_active))
            .route("/api/exams/save", post(exams::save_code))
            .route("/api/exams/:id", get(exams::exam))
            .route("/api/exams/:id/start", post(exams::start))
            .route("/api/exams/:id/submit", post(exams::submit))
            .route("/api/exams/:id/submission/:student_id", get(exams::submission))
            .merge(admin_routes)
            .route("/health", get(system::health))
            .route("/metrics", get(system::metrics))
            .route_layer(from_fn(track_requests))
            .layer(DefaultBodyLimit::max(self.config.http.body_limit_bytes))
            .layer(middleware)
            .with_state(self.state.clone())
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })?;
        self.serve_on(listener, shutdown).await
    }

    /// Serves on an already bound listener.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        if self.config.admin.api_key.is_none() {
            info!("Admin API disabled (no api_key configured)");
        }
        info!(addr = ?listener.local_addr().ok(), "API Gateway listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(GatewayError::Serve)?;

        info!("API Gateway stopped");
        Ok(())
    }
}
