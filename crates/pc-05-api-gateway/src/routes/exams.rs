//! Exam attempt lifecycle.

use axum::extract::{Path, State};
use axum::Json;
use pc_04_submission_lifecycle::{ExamSummary, StartedAttempt, SubmissionSnapshot};
use shared_types::{ExamId, SaveCodeAck, SaveCodeRequest, StudentRequest};

use super::{ApiJson, AppState};
use crate::domain::ApiError;

pub async fn list_active(State(state): State<AppState>) -> Json<Vec<ExamSummary>> {
    Json(state.lifecycle.list_active_exams())
}

pub async fn exam(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
) -> Result<Json<ExamSummary>, ApiError> {
    Ok(Json(state.lifecycle.get_exam(&ExamId::new(exam_id))?))
}

/// Returns the attempt together with the question.
pub async fn start(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
    ApiJson(body): ApiJson<StudentRequest>,
) -> Result<Json<StartedAttempt>, ApiError> {
    let started = state
        .lifecycle
        .start_exam(&ExamId::new(exam_id), &body.student_id)?;
    Ok(Json(started))
}

pub async fn submit(
    State(state): State<AppState>,
    Path(exam_id): Path<String>,
    ApiJson(body): ApiJson<StudentRequest>,
) -> Result<Json<SubmissionSnapshot>, ApiError> {
    let snapshot = state
        .lifecycle
        .submit_exam(&ExamId::new(exam_id), &body.student_id)?;
    Ok(Json(snapshot))
}

pub async fn save_code(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SaveCodeRequest>,
) -> Result<Json<SaveCodeAck>, ApiError> {
    Ok(Json(state.lifecycle.save_code(body)?))
}

pub async fn submission(
    State(state): State<AppState>,
    Path((exam_id, student)): Path<(String, String)>,
) -> Result<Json<SubmissionSnapshot>, ApiError> {
    let snapshot = state
        .lifecycle
        .get_submission(&ExamId::new(exam_id), &student)?;
    Ok(Json(snapshot))
}
