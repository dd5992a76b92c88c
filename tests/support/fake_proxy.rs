// ABOUTME: In-memory proxy admin that records loaded documents.
// ABOUTME: Can be told to reject every load with a status code.

use async_trait::async_trait;
use parking_lot::Mutex;
use slick::caddy::{ProxyAdmin, ProxyError};

#[derive(Debug, Default)]
pub struct FakeProxy {
    loaded: Mutex<Vec<String>>,
    reject_with: Option<u16>,
}

impl FakeProxy {
    pub fn rejecting(status: u16) -> Self {
        Self {
            loaded: Mutex::new(Vec::new()),
            reject_with: Some(status),
        }
    }

    /// Documents accepted so far.
    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().clone()
    }
}

#[async_trait]
impl ProxyAdmin for FakeProxy {
    async fn load(&self, document: &str) -> Result<(), ProxyError> {
        if let Some(status) = self.reject_with {
            return Err(ProxyError::Rejected {
                status,
                body: "invalid configuration".to_string(),
            });
        }
        self.loaded.lock().push(document.to_string());
        Ok(())
    }
}
