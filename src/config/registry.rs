// ABOUTME: Registry credentials used when pulling private images.
// ABOUTME: The password may name an environment variable holding the secret.

use crate::runtime::RegistryAuth;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Registry host, e.g. `ghcr.io`. Inferred from the image when absent.
    #[serde(default)]
    pub server: Option<String>,
}

impl RegistryConfig {
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Replace the password with the value of the environment variable it
    /// names, if such a variable is set.
    pub(crate) fn resolve_password(&mut self) {
        if !self.is_complete() {
            return;
        }
        if let Ok(secret) = std::env::var(&self.password) {
            self.password = secret;
        }
    }

    /// Credentials for the runtime, or `None` for anonymous pulls.
    pub fn auth(&self, image_registry: Option<&str>) -> Option<RegistryAuth> {
        if !self.is_complete() {
            return None;
        }
        Some(RegistryAuth {
            username: self.username.clone(),
            password: self.password.clone(),
            server: self
                .server
                .clone()
                .or_else(|| image_registry.map(str::to_string)),
        })
    }
}
