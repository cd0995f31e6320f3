//! Admin reads. Mounted behind the API key middleware.

use axum::extract::{Path, Query, State};
use axum::Json;
use pc_04_submission_lifecycle::SubmissionSnapshot;
use serde::Deserialize;
use shared_types::{ExamId, ViolationEvent};

use super::AppState;
use crate::domain::ApiError;

pub const DEFAULT_LOG_LIMIT: usize = 100;
pub const MAX_LOG_LIMIT: usize = 1000;

#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    pub limit: Option<usize>,
}

pub async fn exam_submissions(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> Result<Json<Vec<SubmissionSnapshot>>, ApiError> {
    Ok(Json(state.lifecycle.list_submissions(&ExamId::new(exam_id))?))
}

/// Newest first.
pub async fn student_logs(
    State(state): State<AppState>,
    Path(student): Path<String>,
    Query(query): Query<LogQuery>,
) -> Result<Json<Vec<ViolationEvent>>, ApiError> {
    let student_id = state.lifecycle.resolve_student(&student)?;
    let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT);
    Ok(Json(state.ledger.student_activity(&student_id, limit)))
}
