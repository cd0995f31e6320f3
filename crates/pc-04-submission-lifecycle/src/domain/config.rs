//! Lifecycle configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout sweep settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// How often the sweeper looks for expired attempts.
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,

    /// Slack after `endTime` before an attempt is timed out, covering
    /// client clock skew and a final in-flight submit.
    #[serde(with = "humantime_serde")]
    pub grace_period: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(30),
            grace_period: Duration::from_secs(60),
        }
    }
}

impl LifecycleConfig {
    pub fn grace_ms(&self) -> u64 {
        u64::try_from(self.grace_period.as_millis()).unwrap_or(u64::MAX)
    }
}
