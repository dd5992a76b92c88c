// ABOUTME: Configuration types and parsing for slick.yml.
// ABOUTME: Handles YAML parsing, defaults, env var interpolation, and validation.

mod caddy;
mod env_value;
mod healthcheck;
mod registry;

pub use caddy::{
    CaddyConfig, DEFAULT_ADMIN_API, GlobalOptions, Handle, HeaderUp, OnDemandTls, ReverseProxy,
    Rule,
};
pub use env_value::{expand_env_placeholders, resolve_passthrough};
pub use healthcheck::HealthCheckPolicy;
pub use registry::RegistryConfig;

use crate::error::{Error, Result};
use crate::types::ImageRef;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "slick.yml";
pub const CONFIG_FILENAME_ALT: &str = "slick.yaml";
pub const ENV_FILENAME: &str = ".env";

/// Everything needed to deploy one application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,

    #[serde(default)]
    pub caddy: CaddyConfig,

    #[serde(default)]
    pub health_check: HealthCheckPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub name: String,

    pub image: ImageRef,

    #[serde(default)]
    pub registry: Option<RegistryConfig>,

    pub container_port: u16,

    #[serde(default)]
    pub network: Option<String>,

    /// Environment passthrough: `NAME` or `NAME=VALUE`.
    #[serde(default)]
    pub env: Vec<String>,

    #[serde(default)]
    pub port_range: PortRange,

    /// Bind mounts in `source:target[:options]` form.
    #[serde(default)]
    pub volumes: Vec<String>,
}

/// Inclusive range of host ports offered to new instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PortRange {
    #[serde(default = "default_port_start")]
    pub start: u16,

    #[serde(default = "default_port_end")]
    pub end: u16,
}

fn default_port_start() -> u16 {
    8000
}

fn default_port_end() -> u16 {
    9000
}

impl Default for PortRange {
    fn default() -> Self {
        Self {
            start: default_port_start(),
            end: default_port_end(),
        }
    }
}

impl AppConfig {
    /// Network to attach the container to, if any.
    pub fn network(&self) -> Option<&str> {
        self.network.as_deref().filter(|n| !n.is_empty())
    }

    /// Resolved environment for the container.
    pub fn container_env(&self) -> BTreeMap<String, String> {
        resolve_passthrough(&self.env)
    }

    /// Display name, falling back to the image.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            self.image.base_name()
        } else {
            self.name.clone()
        }
    }
}

impl Config {
    /// Parse, interpolate, and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut config: Config = serde_yaml::from_str(yaml)?;
        config.interpolate();
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Load `slick.yml` (or `slick.yaml`) from `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        [CONFIG_FILENAME, CONFIG_FILENAME_ALT]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map(|path| Self::load(&path))
            .unwrap_or_else(|| Err(Error::ConfigNotFound(dir.to_path_buf())))
    }

    fn interpolate(&mut self) {
        for rule in &mut self.caddy.rules {
            if let Some(tls) = rule.tls.as_mut() {
                *tls = expand_env_placeholders(tls);
            }
        }

        if let Some(registry) = self.app.registry.as_mut() {
            registry.resolve_password();
        }
    }

    fn validate(&self) -> Result<()> {
        if self.app.container_port == 0 {
            return Err(Error::InvalidConfig(
                "app.container_port must be non-zero".to_string(),
            ));
        }

        let range = self.app.port_range;
        if range.start == 0 || range.start > range.end {
            return Err(Error::InvalidConfig(format!(
                "app.port_range is empty: {}..={}",
                range.start, range.end
            )));
        }

        if self.health_check.max_retries == 0 {
            return Err(Error::InvalidConfig(
                "health_check.max_retries must be at least 1".to_string(),
            ));
        }

        for (idx, rule) in self.caddy.rules.iter().enumerate() {
            if rule.matcher.trim().is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "caddy.rules[{idx}].match cannot be empty"
                )));
            }
        }

        Ok(())
    }
}

/// Load variables from a dotenv file into the process environment.
///
/// Without an explicit path, `.env` in the working directory is loaded if it
/// exists. An explicit path must exist.
pub fn load_env_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|source| Error::EnvFile {
                path: path.to_path_buf(),
                source,
            })?;
        }
        None => match dotenvy::from_filename(ENV_FILENAME) {
            Ok(_) => {}
            Err(e) if e.not_found() => {
                tracing::debug!("no {} file found, skipping", ENV_FILENAME);
            }
            Err(source) => {
                return Err(Error::EnvFile {
                    path: ENV_FILENAME.into(),
                    source,
                });
            }
        },
    }
    Ok(())
}
