// ABOUTME: HTTP health check policy for newly started instances.
// ABOUTME: Endpoint, per-attempt timeout, retry interval, and attempt budget.

use serde::Deserialize;
use std::time::Duration;

/// How a new instance is probed before it receives traffic.
///
/// An empty `endpoint` disables health checking entirely.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthCheckPolicy {
    #[serde(default)]
    pub endpoint: String,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_interval_seconds() -> u64 {
    5
}

fn default_max_retries() -> u32 {
    3
}

impl Default for HealthCheckPolicy {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_seconds: default_timeout_seconds(),
            interval_seconds: default_interval_seconds(),
            max_retries: default_max_retries(),
        }
    }
}

impl HealthCheckPolicy {
    /// Policy probing `endpoint` with the default schedule.
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.endpoint.is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries
    }
}
