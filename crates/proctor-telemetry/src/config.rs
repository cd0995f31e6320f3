//! Telemetry configuration from the config file and environment variables.

use serde::Deserialize;
use std::env;

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or full directive
    pub log_level: String,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Whether to write logs to stdout at all
    pub console_output: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "exam-proctor".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            console_output: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PROCTOR_SERVICE_NAME`: Service name (default: exam-proctor)
    /// - `PROCTOR_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `PROCTOR_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `PROCTOR_CONSOLE_OUTPUT`: Enable console output (default: true)
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment variables on top of file-provided values.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| env::var(name).ok())
    }

    /// Same as [`Self::with_env_overrides`], reading variables through `lookup`.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        if let Some(name) = lookup("PROCTOR_SERVICE_NAME") {
            self.service_name = name;
        }
        if let Some(level) = lookup("PROCTOR_LOG_LEVEL").or_else(|| lookup("RUST_LOG")) {
            self.log_level = level;
        }
        self.json_logs = lookup("PROCTOR_JSON_LOGS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(self.json_logs || is_container);
        if let Some(v) = lookup("PROCTOR_CONSOLE_OUTPUT") {
            self.console_output = v.to_lowercase() != "false" && v != "0";
        }
        self
    }
}
