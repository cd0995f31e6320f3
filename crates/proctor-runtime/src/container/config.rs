//! Runtime configuration.
//!
//! Loaded from a TOML file, then overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `PROCTOR_HTTP_PORT` | `http.port` |
//! | `PROCTOR_ADMIN_API_KEY` | `admin.api_key` |
//! | `PROCTOR_LOG_LEVEL` / `RUST_LOG` | `telemetry.log_level` |
//!
//! Exam windows are RFC 3339 strings and must be quoted in the file:
//!
//! ```toml
//! [[exams]]
//! id = "web-basics"
//! title = "Web Basics"
//! start_time = "2026-03-01T09:00:00Z"
//! end_time = "2026-03-01T11:00:00Z"
//! max_violation_count = 3
//! ```

use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pc_04_submission_lifecycle::{ExamDefinition, LifecycleConfig, DEFAULT_MAX_VIOLATIONS};
use pc_05_api_gateway::{AdminConfig, ConfigError as GatewayConfigError, CorsConfig, GatewayConfig, HttpConfig};
use proctor_telemetry::TelemetryConfig;
use serde::Deserialize;
use shared_bus::EventReplayCache;
use shared_types::{ExamId, Timestamp, ViolationKind};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid environment override {name}={value}")]
    InvalidOverride { name: &'static str, value: String },

    #[error(transparent)]
    Gateway(#[from] GatewayConfigError),

    #[error("duplicate exam id: {0}")]
    DuplicateExam(String),

    #[error("exam {0} must end after it starts")]
    InvalidWindow(String),

    #[error("exam {0} has a timestamp before the Unix epoch")]
    InvalidTimestamp(String),

    #[error("exam id cannot be empty")]
    EmptyExamId,

    #[error("lifecycle.sweep_interval cannot be 0")]
    ZeroSweepInterval,

    #[error("ledger.replay_window cannot be 0")]
    ZeroReplayWindow,
}

/// Complete server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProctorConfig {
    pub http: HttpConfig,
    pub cors: CorsConfig,
    pub admin: AdminConfig,
    pub exams: Vec<ExamEntry>,
    pub students: StudentsConfig,
    pub lifecycle: LifecycleConfig,
    pub ledger: LedgerConfig,
    pub telemetry: TelemetryConfig,
}

/// One catalog entry as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ExamEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub question: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Derived from the window when absent.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default = "default_max_violations")]
    pub max_violation_count: i32,
    #[serde(default = "default_true")]
    pub require_full_screen: bool,
    #[serde(default)]
    pub allow_copy_paste: bool,
    #[serde(default)]
    pub counted_kinds: Option<BTreeSet<ViolationKind>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_max_violations() -> i32 {
    DEFAULT_MAX_VIOLATIONS
}

fn default_true() -> bool {
    true
}

fn to_millis(id: &str, at: &DateTime<Utc>) -> Result<Timestamp, ConfigError> {
    Timestamp::try_from(at.timestamp_millis())
        .map_err(|_| ConfigError::InvalidTimestamp(id.to_string()))
}

impl ExamEntry {
    pub fn to_definition(&self) -> Result<ExamDefinition, ConfigError> {
        let start = to_millis(&self.id, &self.start_time)?;
        let end = to_millis(&self.id, &self.end_time)?;
        if end <= start {
            return Err(ConfigError::InvalidWindow(self.id.clone()));
        }

        let mut exam = ExamDefinition::new(ExamId::new(self.id.trim()), self.title.clone(), start, end);
        exam.description = self.description.clone();
        exam.question = self.question.clone();
        if let Some(minutes) = self.duration_minutes {
            exam.duration_minutes = minutes;
        }
        exam.max_violation_count = self.max_violation_count;
        exam.require_full_screen = self.require_full_screen;
        exam.allow_copy_paste = self.allow_copy_paste;
        exam.counted_kinds = self.counted_kinds.clone();
        exam.is_active = self.is_active;
        Ok(exam)
    }
}

/// Known students.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentsConfig {
    /// Accept any well-formed roll number, not only the roster.
    pub open_enrollment: bool,
    pub roster: Vec<StudentEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudentEntry {
    pub roll_no: String,
    #[serde(default)]
    pub name: String,
}

/// Duplicate-report suppression.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    #[serde(with = "humantime_serde")]
    pub replay_window: Duration,
    #[serde(with = "humantime_serde")]
    pub replay_gc_interval: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            replay_window: Duration::from_millis(EventReplayCache::DEFAULT_RETENTION_MS),
            replay_gc_interval: Duration::from_millis(EventReplayCache::DEFAULT_GC_INTERVAL_MS),
        }
    }
}

impl LedgerConfig {
    pub fn replay_cache(&self) -> EventReplayCache {
        EventReplayCache::with_config(
            u64::try_from(self.replay_window.as_millis()).unwrap_or(u64::MAX),
            u64::try_from(self.replay_gc_interval.as_millis()).unwrap_or(u64::MAX),
        )
    }
}

impl ProctorConfig {
    /// Reads `path` (defaults when `None`), applies environment overrides
    /// and validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };

        let config = config.with_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Applies overrides looked up through `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("PROCTOR_HTTP_PORT") {
            self.http.port = value.trim().parse().map_err(|_| ConfigError::InvalidOverride {
                name: "PROCTOR_HTTP_PORT",
                value,
            })?;
        }
        if let Some(key) = lookup("PROCTOR_ADMIN_API_KEY") {
            self.admin.api_key = Some(key);
        }
        self.telemetry = self.telemetry.with_overrides_from(&lookup);
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway().validate()?;

        if self.lifecycle.sweep_interval.is_zero() {
            return Err(ConfigError::ZeroSweepInterval);
        }
        if self.ledger.replay_window.is_zero() {
            return Err(ConfigError::ZeroReplayWindow);
        }

        let mut seen = HashSet::new();
        for entry in &self.exams {
            let id = entry.id.trim();
            if id.is_empty() {
                return Err(ConfigError::EmptyExamId);
            }
            if !seen.insert(id) {
                return Err(ConfigError::DuplicateExam(id.to_string()));
            }
            entry.to_definition()?;
        }
        Ok(())
    }

    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            http: self.http.clone(),
            cors: self.cors.clone(),
            admin: self.admin.clone(),
        }
    }

    pub fn exam_definitions(&self) -> Result<Vec<ExamDefinition>, ConfigError> {
        self.exams.iter().map(ExamEntry::to_definition).collect()
    }
}
