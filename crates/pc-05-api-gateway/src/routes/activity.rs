//! Activity reports from the event reporter.

use axum::extract::State;
use axum::Json;
use shared_types::{ActivityAck, ActivityReport};
use tracing::debug;

use super::{ApiJson, AppState};
use crate::domain::ApiError;

/// Records one report and returns the verdict.
///
/// The roll number is resolved first, so reports from unknown students are
/// rejected before anything is written.
pub async fn record(
    State(state): State<AppState>,
    ApiJson(report): ApiJson<ActivityReport>,
) -> Result<Json<ActivityAck>, ApiError> {
    let student_id = state.lifecycle.resolve_student(&report.student_id)?;
    let event = report.into_event(student_id, state.clock.now())?;
    let event_id = event.event_id;

    let result = state.ledger.append(event)?;
    debug!(
        %event_id,
        outcome = result.outcome.as_str(),
        violation_count = ?result.violation_count,
        "Activity recorded"
    );
    Ok(Json(result.ack()))
}
