// ABOUTME: HTTP health polling for freshly started instances.
// ABOUTME: Bounded attempts with an injectable clock for the waits between them.

use crate::config::HealthCheckPolicy;
use crate::http::{self, Outgoing};
use async_trait::async_trait;
use std::time::Duration;

/// Source of delays between health attempts.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real time, backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HealthError {
    #[error("{url} did not become healthy after {attempts} attempts (last: {last_failure})")]
    Unhealthy {
        url: String,
        attempts: u32,
        last_failure: String,
    },
}

/// Join a base URL and an endpoint path, dropping one leading `/` from the endpoint.
pub fn health_url(base_url: &str, endpoint: &str) -> String {
    let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
    format!("{}/{}", base_url.trim_end_matches('/'), endpoint)
}

/// Poll `<base_url>/<endpoint>` until it answers 2xx or the attempt budget runs out.
///
/// An empty endpoint or base URL succeeds immediately without any request.
/// The clock is consulted between attempts only, so `n` attempts sleep `n - 1` times.
pub async fn wait_healthy(
    base_url: &str,
    policy: &HealthCheckPolicy,
    clock: &dyn Clock,
) -> Result<(), HealthError> {
    if !policy.is_enabled() || base_url.is_empty() {
        tracing::debug!("health check disabled");
        return Ok(());
    }

    let url = health_url(base_url, &policy.endpoint);
    let attempts = policy.max_attempts().max(1);
    let mut last_failure = String::new();

    for attempt in 1..=attempts {
        match http::send(Outgoing::get(&url), policy.timeout()).await {
            Ok(resp) if resp.status.is_success() => {
                tracing::debug!(%url, attempt, "instance healthy");
                return Ok(());
            }
            Ok(resp) => {
                last_failure = format!("status {}", resp.status.as_u16());
            }
            Err(e) => {
                last_failure = e.to_string();
            }
        }

        tracing::debug!(%url, attempt, attempts, failure = %last_failure, "health attempt failed");

        if attempt < attempts {
            clock.sleep(policy.interval()).await;
        }
    }

    Err(HealthError::Unhealthy {
        url,
        attempts,
        last_failure,
    })
}
