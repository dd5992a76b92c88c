// ABOUTME: Caddy admin API client used for configuration cutover.
// ABOUTME: Pushes a rendered Caddyfile to the /load endpoint.

use crate::http::{self, HttpError, Outgoing};
use async_trait::async_trait;
use hyper::StatusCode;
use std::time::Duration;

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("failed to reach proxy admin API: {0}")]
    Transport(#[from] HttpError),

    #[error("proxy rejected configuration with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Reverse proxy administration.
#[async_trait]
pub trait ProxyAdmin: Send + Sync {
    /// Replace the proxy's active configuration with `document`.
    async fn load(&self, document: &str) -> Result<(), ProxyError>;
}

/// Client for Caddy's admin API.
#[derive(Debug, Clone)]
pub struct CaddyClient {
    admin_api: String,
}

impl CaddyClient {
    pub fn new(admin_api: impl Into<String>) -> Self {
        Self {
            admin_api: admin_api.into(),
        }
    }

    fn load_url(&self) -> String {
        format!("{}/load", self.admin_api.trim_end_matches('/'))
    }
}

#[async_trait]
impl ProxyAdmin for CaddyClient {
    async fn load(&self, document: &str) -> Result<(), ProxyError> {
        let url = self.load_url();
        tracing::debug!(%url, bytes = document.len(), "loading caddy configuration");

        let resp = http::send(
            Outgoing::post(&url, "text/caddyfile", document.to_string()),
            LOAD_TIMEOUT,
        )
        .await?;

        if resp.status != StatusCode::OK {
            return Err(ProxyError::Rejected {
                status: resp.status.as_u16(),
                body: resp.body_text().trim().to_string(),
            });
        }

        Ok(())
    }
}
