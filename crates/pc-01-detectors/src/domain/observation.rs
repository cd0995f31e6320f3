//! What a detector hands back for one signal.

use serde::Serialize;
use shared_types::{Severity, ViolationKind};

/// A violation a detector wants reported. Session identity and timestamp are
/// stamped by the detector set.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub kind: ViolationKind,
    pub severity: Severity,
    pub description: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Detection {
    pub fn new(kind: ViolationKind, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            description: description.into(),
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Warning,
    Critical,
}

impl ToastLevel {
    /// How long the host keeps the toast on screen.
    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::Warning => 3_000,
            Self::Critical => 5_000,
        }
    }
}

/// Instruction for the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiDirective {
    Toast { level: ToastLevel, message: String },
    /// Blocking "FULLSCREEN REQUIRED" overlay. Inputs stay interactive.
    ShowFullscreenPrompt,
    HideFullscreenPrompt,
    /// Overwrite the clipboard after a screenshot key.
    ClearClipboard,
}

impl UiDirective {
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Toast {
            level: ToastLevel::Warning,
            message: message.into(),
        }
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::Toast {
            level: ToastLevel::Critical,
            message: message.into(),
        }
    }
}

/// Whether the host must suppress the DOM event's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Disposition {
    #[default]
    Allow,
    PreventDefault,
}

/// Accumulated output of every detector for one signal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    pub detections: Vec<Detection>,
    pub directives: Vec<UiDirective>,
    pub disposition: Disposition,
}

impl Observation {
    pub fn detect(&mut self, detection: Detection) {
        self.detections.push(detection);
    }

    pub fn show(&mut self, directive: UiDirective) {
        self.directives.push(directive);
    }

    /// Once any detector prevents the default action it stays prevented.
    pub fn prevent_default(&mut self) {
        self.disposition = Disposition::PreventDefault;
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
            && self.directives.is_empty()
            && self.disposition == Disposition::Allow
    }
}
