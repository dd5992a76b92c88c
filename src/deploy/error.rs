// ABOUTME: Error types for deployment operations.
// ABOUTME: One variant per failure the orchestrator can surface, plus a kind for matching.

use crate::caddy::ProxyError;
use crate::health::HealthError;
use crate::port::PortError;
use crate::runtime::{ContainerError, ImageError};
use crate::types::ContainerId;

/// Errors that can occur during deployment state transitions.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("failed to pull image {image}: {source}")]
    ImageAcquisitionFailed { image: String, source: ImageError },

    #[error("failed to look up the running instance: {0}")]
    DiscoveryFailed(ContainerError),

    #[error(transparent)]
    NoPortsAvailable(#[from] PortError),

    #[error("failed to start new instance: {0}")]
    InstanceStartFailed(ContainerError),

    #[error(transparent)]
    Unhealthy(#[from] HealthError),

    #[error("proxy cutover failed: {0}")]
    ProxyCutoverFailed(#[from] ProxyError),

    #[error("failed to retire old instance {container}: {source}")]
    OldInstanceRetireFailed {
        container: ContainerId,
        source: ContainerError,
    },

    #[error("deployment cancelled")]
    Cancelled,
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    ImageAcquisitionFailed,
    DiscoveryFailed,
    NoPortsAvailable,
    InstanceStartFailed,
    Unhealthy,
    ProxyCutoverFailed,
    OldInstanceRetireFailed,
    Cancelled,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::ImageAcquisitionFailed { .. } => DeployErrorKind::ImageAcquisitionFailed,
            DeployError::DiscoveryFailed(_) => DeployErrorKind::DiscoveryFailed,
            DeployError::NoPortsAvailable(_) => DeployErrorKind::NoPortsAvailable,
            DeployError::InstanceStartFailed(_) => DeployErrorKind::InstanceStartFailed,
            DeployError::Unhealthy(_) => DeployErrorKind::Unhealthy,
            DeployError::ProxyCutoverFailed(_) => DeployErrorKind::ProxyCutoverFailed,
            DeployError::OldInstanceRetireFailed { .. } => {
                DeployErrorKind::OldInstanceRetireFailed
            }
            DeployError::Cancelled => DeployErrorKind::Cancelled,
        }
    }
}
