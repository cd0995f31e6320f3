//! # Wire Contracts
//!
//! JSON bodies exchanged between the event reporter and the gateway.
//!
//! Incoming bodies keep `kind` and `severity` as plain strings so that a
//! malformed value surfaces as a [`ValidationError`] instead of a generic
//! deserialization failure.
//!
//! | Route | Request | Response |
//! |-------|---------|----------|
//! | `POST /activity` | `ActivityReport` | `ActivityAck` |
//! | `POST /exams/{id}/start` | `StudentRequest` | submission snapshot |
//! | `POST /exams/{id}/submit` | `StudentRequest` | submission snapshot |
//! | `POST /exams/save` | `SaveCodeRequest` | `SaveCodeAck` |

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{
    ExamId, Severity, StudentId, Timestamp, Verdict, ViolationEvent, ViolationKind,
};
use crate::errors::ValidationError;

/// Metadata key under which the client's own clock reading is preserved.
pub const CLIENT_OCCURRED_AT: &str = "clientOccurredAt";

/// Body of `POST /activity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,
    #[serde(alias = "rollNo")]
    pub student_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_id: Option<String>,
    #[serde(alias = "activityType")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<Timestamp>,
}

impl ActivityReport {
    /// Builds the wire body for an event produced by a local detector.
    pub fn from_event(event: &ViolationEvent) -> Self {
        Self {
            event_id: Some(event.event_id),
            student_id: event.student_id.as_str().to_string(),
            exam_id: event.exam_id.as_ref().map(|id| id.as_str().to_string()),
            kind: event.kind.as_str().to_string(),
            description: event.description.clone(),
            severity: Some(event.severity.as_str().to_string()),
            metadata: Some(serde_json::Value::Object(event.metadata.clone())),
            occurred_at: Some(event.occurred_at),
        }
    }

    /// Validates the body and turns it into a server-side event.
    ///
    /// `student_id` must already be resolved by the student directory.
    /// The server clock (`received_at`) becomes `occurred_at`; the client's
    /// own reading is kept in metadata only.
    pub fn into_event(
        self,
        student_id: StudentId,
        received_at: Timestamp,
    ) -> Result<ViolationEvent, ValidationError> {
        let kind: ViolationKind = self.kind.parse()?;
        let severity = match self.severity.as_deref() {
            None | Some("") => Severity::Low,
            Some(raw) => raw.parse()?,
        };

        let mut metadata = match self.metadata {
            None | Some(serde_json::Value::Null) => serde_json::Map::new(),
            Some(serde_json::Value::Object(map)) => map,
            Some(_) => {
                return Err(ValidationError::InvalidField {
                    field: "metadata",
                    reason: "must be a JSON object".into(),
                })
            }
        };
        if let Some(client_ts) = self.occurred_at {
            metadata.insert(CLIENT_OCCURRED_AT.to_string(), client_ts.into());
        }

        let exam_id = match self.exam_id {
            Some(id) if id.trim().is_empty() => None,
            Some(id) => Some(ExamId::new(id.trim())),
            None => None,
        };

        Ok(ViolationEvent {
            event_id: self.event_id.unwrap_or_else(Uuid::new_v4),
            student_id,
            exam_id,
            kind,
            severity,
            description: self.description,
            occurred_at: received_at,
            metadata,
        })
    }
}

/// Response to `POST /activity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityAck {
    /// The event was recorded (in the submission ledger or the audit log).
    pub accepted: bool,
    pub disqualified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_count: Option<u32>,
}

impl ActivityAck {
    pub fn verdict(&self) -> Verdict {
        Verdict {
            disqualified: self.disqualified,
            warning_message: self.warning_message.clone(),
        }
    }
}

/// Body of `POST /exams/{id}/start` and `POST /exams/{id}/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRequest {
    #[serde(alias = "rollNo")]
    pub student_id: String,
}

/// Body of `POST /exams/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCodeRequest {
    #[serde(alias = "rollNo")]
    pub student_id: String,
    pub exam_id: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub javascript: String,
}

/// Response to `POST /exams/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCodeAck {
    pub success: bool,
    pub time_spent_seconds: u64,
}
