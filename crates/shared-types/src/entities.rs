//! # Core Domain Entities
//!
//! Defines the proctoring entities shared between the client-side detector
//! set and the server-side ledger.
//!
//! ## Clusters
//!
//! - **Identity**: `StudentId`, `ExamId`, `Timestamp`
//! - **Observation**: `ViolationKind`, `Severity`, `ViolationEvent`
//! - **Policy**: `ExamPolicy`
//! - **Outcome**: `SubmissionStatus`, `Verdict`

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Milliseconds since UNIX epoch.
pub type Timestamp = u64;

/// Opaque student identifier issued by the account store (a roll number).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    /// Wraps an already-normalised identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Exam identifier as issued by the exam catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExamId(String);

impl ExamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of a submission: one attempt per (student, exam).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionKey {
    pub student_id: StudentId,
    pub exam_id: ExamId,
}

impl SubmissionKey {
    pub fn new(student_id: StudentId, exam_id: ExamId) -> Self {
        Self {
            student_id,
            exam_id,
        }
    }
}

impl fmt::Display for SubmissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.student_id, self.exam_id)
    }
}

// =============================================================================
// CLUSTER B: OBSERVATION
// =============================================================================

/// Every activity kind the platform records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    Login,
    Logout,
    TabSwitch,
    WindowBlur,
    CopyAttempt,
    PasteAttempt,
    DevtoolsOpened,
    FullscreenExit,
    CodeSaved,
    ExamStarted,
    ExamSubmitted,
    ExamTimeout,
    RightClick,
    SuspiciousActivity,
}

impl ViolationKind {
    /// All kinds, in declaration order.
    pub const ALL: [ViolationKind; 14] = [
        ViolationKind::Login,
        ViolationKind::Logout,
        ViolationKind::TabSwitch,
        ViolationKind::WindowBlur,
        ViolationKind::CopyAttempt,
        ViolationKind::PasteAttempt,
        ViolationKind::DevtoolsOpened,
        ViolationKind::FullscreenExit,
        ViolationKind::CodeSaved,
        ViolationKind::ExamStarted,
        ViolationKind::ExamSubmitted,
        ViolationKind::ExamTimeout,
        ViolationKind::RightClick,
        ViolationKind::SuspiciousActivity,
    ];

    /// Kinds that count toward disqualification unless an exam says otherwise.
    pub const CHEATING_KINDS: [ViolationKind; 6] = [
        ViolationKind::TabSwitch,
        ViolationKind::WindowBlur,
        ViolationKind::CopyAttempt,
        ViolationKind::PasteAttempt,
        ViolationKind::DevtoolsOpened,
        ViolationKind::FullscreenExit,
    ];

    /// Wire name (`TAB_SWITCH`, `WINDOW_BLUR`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::TabSwitch => "TAB_SWITCH",
            Self::WindowBlur => "WINDOW_BLUR",
            Self::CopyAttempt => "COPY_ATTEMPT",
            Self::PasteAttempt => "PASTE_ATTEMPT",
            Self::DevtoolsOpened => "DEVTOOLS_OPENED",
            Self::FullscreenExit => "FULLSCREEN_EXIT",
            Self::CodeSaved => "CODE_SAVED",
            Self::ExamStarted => "EXAM_STARTED",
            Self::ExamSubmitted => "EXAM_SUBMITTED",
            Self::ExamTimeout => "EXAM_TIMEOUT",
            Self::RightClick => "RIGHT_CLICK",
            Self::SuspiciousActivity => "SUSPICIOUS_ACTIVITY",
        }
    }

    pub fn is_cheating_kind(&self) -> bool {
        Self::CHEATING_KINDS.contains(self)
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownKind(s.to_string()))
    }
}

/// Severity assigned by the detector that produced an event.
///
/// Never recomputed downstream.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            other => Err(ValidationError::UnknownSeverity(other.to_string())),
        }
    }
}

/// An observed fact about a student's session.
///
/// Created by a detector (or by the server for lifecycle entries), never
/// mutated afterwards, persisted append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationEvent {
    /// Client-generated identity, used to discard network re-deliveries.
    pub event_id: Uuid,
    pub student_id: StudentId,
    /// `None` for pre-exam activity such as LOGIN.
    pub exam_id: Option<ExamId>,
    pub kind: ViolationKind,
    pub severity: Severity,
    pub description: String,
    pub occurred_at: Timestamp,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ViolationEvent {
    /// Creates an event with a fresh id and empty metadata.
    pub fn new(
        student_id: StudentId,
        exam_id: Option<ExamId>,
        kind: ViolationKind,
        severity: Severity,
        description: impl Into<String>,
        occurred_at: Timestamp,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            student_id,
            exam_id,
            kind,
            severity,
            description: description.into(),
            occurred_at,
            metadata: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// The submission this event targets, if it names an exam.
    pub fn submission_key(&self) -> Option<SubmissionKey> {
        self.exam_id
            .as_ref()
            .map(|exam_id| SubmissionKey::new(self.student_id.clone(), exam_id.clone()))
    }
}

// =============================================================================
// CLUSTER C: POLICY
// =============================================================================

/// Per-exam proctoring configuration, owned by the exam catalog.
///
/// Immutable for the duration of an exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPolicy {
    pub exam_id: ExamId,
    /// May be zero or negative; see the evaluator for how that is treated.
    pub max_violation_count: i32,
    pub counted_kinds: BTreeSet<ViolationKind>,
    pub require_full_screen: bool,
    pub allow_copy_paste: bool,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

impl ExamPolicy {
    /// Counted kinds implied by the exam flags.
    ///
    /// Clipboard kinds are not counted when copy/paste is allowed, and
    /// FULLSCREEN_EXIT is not counted when fullscreen is not required.
    pub fn default_counted_kinds(
        allow_copy_paste: bool,
        require_full_screen: bool,
    ) -> BTreeSet<ViolationKind> {
        ViolationKind::CHEATING_KINDS
            .iter()
            .copied()
            .filter(|kind| match kind {
                ViolationKind::CopyAttempt | ViolationKind::PasteAttempt => !allow_copy_paste,
                ViolationKind::FullscreenExit => require_full_screen,
                _ => true,
            })
            .collect()
    }

    /// Whether `kind` increments the violation counter under this policy.
    pub fn counts(&self, kind: ViolationKind) -> bool {
        self.counted_kinds.contains(&kind)
    }

    /// Whether `now` falls inside the exam window (inclusive).
    pub fn is_open_at(&self, now: Timestamp) -> bool {
        now >= self.start_time && now <= self.end_time
    }

    pub fn has_ended_at(&self, now: Timestamp) -> bool {
        now > self.end_time
    }
}

// =============================================================================
// CLUSTER D: OUTCOME
// =============================================================================

/// Lifecycle state of an exam attempt.
///
/// ```text
/// [IN_PROGRESS] ──submit──→ [SUBMITTED]
///       │
///       ├──── evaluator DISQUALIFY ──→ [DISQUALIFIED]
///       │
///       └──── end time passed ──→ [TIMEOUT]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    #[default]
    InProgress,
    Submitted,
    Disqualified,
    Timeout,
}

impl SubmissionStatus {
    /// Terminal states have no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Submitted => "SUBMITTED",
            Self::Disqualified => "DISQUALIFIED",
            Self::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the server tells the reporter after an event is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub disqualified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_message: Option<String>,
}

impl Verdict {
    pub const WARNING_TEXT: &'static str = "Warning: One more violation will disqualify you";
    pub const DISQUALIFIED_TEXT: &'static str = "You have been disqualified";

    /// No message, no lock-down.
    pub fn proceed() -> Self {
        Self::default()
    }

    pub fn warn() -> Self {
        Self {
            disqualified: false,
            warning_message: Some(Self::WARNING_TEXT.to_string()),
        }
    }

    pub fn disqualified() -> Self {
        Self {
            disqualified: true,
            warning_message: Some(Self::DISQUALIFIED_TEXT.to_string()),
        }
    }
}
