//! Route handlers.
//!
//! | Route | Handler | Backed by |
//! |-------|---------|-----------|
//! | `POST /api/activity`, `POST /api/activity/log` | `activity::record` | ledger |
//! | `GET /api/exams` | `exams::list_active` | lifecycle |
//! | `GET /api/exams/:id` | `exams::exam` | lifecycle |
//! | `POST /api/exams/save` | `exams::save_code` | lifecycle |
//! | `POST /api/exams/:id/start` | `exams::start` | lifecycle |
//! | `POST /api/exams/:id/submit` | `exams::submit` | lifecycle |
//! | `GET /api/exams/:id/submission/:student_id` | `exams::submission` | lifecycle |
//! | `GET /api/admin/exams/:id/submissions` | `admin::exam_submissions` | lifecycle |
//! | `GET /api/admin/logs/:student_id` | `admin::student_logs` | ledger |
//! | `GET /health` | `system::health` | - |
//! | `GET /metrics` | `system::metrics` | telemetry |

pub mod activity;
pub mod admin;
pub mod exams;
pub mod system;

use std::sync::Arc;

use axum::extract::FromRequest;
use pc_03_violation_ledger::ViolationLedgerApi;
use pc_04_submission_lifecycle::{SubmissionLifecycleApi, TimeSource};

use crate::domain::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<dyn SubmissionLifecycleApi>,
    pub ledger: Arc<dyn ViolationLedgerApi>,
    pub clock: Arc<dyn TimeSource>,
}

/// `Json` whose rejection uses the gateway error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
