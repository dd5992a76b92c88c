// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::collections::HashMap;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::caddy::{self, ProxyAdmin};
use crate::diagnostics::{Diagnostics, Warning};
use crate::health::{self, Clock};
use crate::port::PortAllocator;
use crate::runtime::{ContainerConfig, ContainerError, ContainerOps, ImageOps, PortMapping};
use crate::types::{ContainerId, ImageRef};

use super::Deployment;
use super::error::DeployError;
use super::outcome::RunningInstance;
use super::state::{
    Completed, CutOver, Discovered, HealthChecked, ImagePulled, Initialized, InstanceStarted,
    PortAllocated,
};

/// Result type for transitions that may need rollback on failure.
pub type TransitionResult<T, S> = Result<Deployment<T>, (Deployment<S>, DeployError)>;

/// Grace period given to a container to exit before it is killed.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(15);

/// Label marking containers created by this tool.
pub const MANAGED_LABEL: &str = "slick.managed";
/// Label carrying the application name.
pub const APP_LABEL: &str = "slick.app";

/// Stop a container, then force-remove it.
///
/// A container that already stopped is not an error.
pub async fn stop_and_remove<R: ContainerOps + ?Sized>(
    runtime: &R,
    id: &ContainerId,
) -> Result<(), ContainerError> {
    match runtime.stop_container(id, STOP_TIMEOUT).await {
        Ok(()) | Err(ContainerError::NotRunning(_)) => {}
        Err(e) => {
            tracing::warn!(container = %id, error = %e, "stop failed, forcing removal");
        }
    }
    runtime.remove_container(id, true).await
}

/// Find a running container started from `image`, ignoring tags.
///
/// Containers that can't be inspected are skipped with a warning. The first
/// match wins.
pub async fn find_running_instance<R: ContainerOps + ?Sized>(
    runtime: &R,
    image: &ImageRef,
    diagnostics: &mut Diagnostics,
) -> Result<Option<ContainerId>, ContainerError> {
    for summary in runtime.list_containers(false).await? {
        let info = match runtime.inspect_container(&summary.id).await {
            Ok(info) => info,
            Err(e) => {
                diagnostics.warn(Warning::discovery(format!(
                    "skipping container {}: {}",
                    summary.id.short(),
                    e
                )));
                continue;
            }
        };

        if image.same_repository(&info.image) {
            tracing::debug!(container = %info.id, image = %info.image, "found running instance");
            return Ok(Some(info.id));
        }
    }

    Ok(None)
}

// =============================================================================
// Initialized -> ImagePulled
// =============================================================================

impl Deployment<Initialized> {
    /// Pull the configured image, with registry credentials when configured.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::ImageAcquisitionFailed` if the image cannot be pulled.
    #[must_use = "deployment state must be used"]
    pub async fn pull_image<R: ImageOps + ?Sized>(
        self,
        runtime: &R,
    ) -> Result<Deployment<ImagePulled>, DeployError> {
        let image = &self.config.app.image;
        let auth = self
            .config
            .app
            .registry
            .as_ref()
            .and_then(|r| r.auth(image.registry()));

        runtime
            .pull_image(image, auth.as_ref())
            .await
            .map_err(|source| DeployError::ImageAcquisitionFailed {
                image: image.to_string(),
                source,
            })?;

        Ok(self.transition(ImagePulled))
    }
}

// =============================================================================
// ImagePulled -> Discovered
// =============================================================================

impl Deployment<ImagePulled> {
    /// Record the running instance of this image, if any. No match means this
    /// is a first deploy.
    #[must_use = "deployment state must be used"]
    pub async fn discover_old_instance<R: ContainerOps + ?Sized>(
        mut self,
        runtime: &R,
        diagnostics: &mut Diagnostics,
    ) -> Result<Deployment<Discovered>, DeployError> {
        self.old_instance =
            find_running_instance(runtime, &self.config.app.image, diagnostics)
                .await
                .map_err(DeployError::DiscoveryFailed)?;

        Ok(self.transition(Discovered))
    }
}

// =============================================================================
// Discovered -> PortAllocated
// =============================================================================

impl Deployment<Discovered> {
    /// Reserve a free host port from the configured range.
    #[must_use = "deployment state must be used"]
    pub fn allocate_port(
        self,
        allocator: &PortAllocator,
    ) -> Result<Deployment<PortAllocated>, DeployError> {
        let range = self.config.app.port_range;
        let port = allocator.allocate(range.start, range.end, 1)?;
        Ok(self.transition(PortAllocated { port }))
    }
}

// =============================================================================
// PortAllocated -> InstanceStarted
// =============================================================================

impl Deployment<PortAllocated> {
    pub fn port(&self) -> u16 {
        self.state.port
    }

    /// Create and start the new instance bound to the allocated port.
    ///
    /// If the container is created but fails to start it is removed before
    /// the error is returned, so nothing is left behind.
    #[must_use = "deployment state must be used"]
    pub async fn start_instance<R: ContainerOps + ?Sized>(
        self,
        runtime: &R,
    ) -> Result<Deployment<InstanceStarted>, DeployError> {
        let config = self.build_container_config();
        let id = runtime
            .create_container(&config)
            .await
            .map_err(DeployError::InstanceStartFailed)?;

        if let Err(e) = runtime.start_container(&id).await {
            if let Err(cleanup) = runtime.remove_container(&id, true).await {
                tracing::warn!(container = %id, error = %cleanup, "failed to remove unstarted container");
            }
            return Err(DeployError::InstanceStartFailed(e));
        }

        let port = self.state.port;
        tracing::info!(container = %id, port, "new instance started");
        Ok(self.transition(InstanceStarted {
            instance: RunningInstance { id, port },
        }))
    }

    fn build_container_config(&self) -> ContainerConfig {
        let app = &self.config.app;

        let mut labels = HashMap::new();
        labels.insert(MANAGED_LABEL.to_string(), "true".to_string());
        labels.insert(APP_LABEL.to_string(), app.display_name());

        ContainerConfig {
            name: None,
            image: app.image.clone(),
            env: app.container_env(),
            labels,
            ports: vec![PortMapping::tcp(self.state.port, app.container_port)],
            binds: app.volumes.clone(),
            network: app.network().map(str::to_string),
        }
    }
}

// =============================================================================
// InstanceStarted -> HealthChecked
// =============================================================================

impl Deployment<InstanceStarted> {
    /// Wait for the new instance to pass its health check.
    ///
    /// The wait races `cancel`; whichever finishes first wins and the other
    /// is dropped.
    ///
    /// # Errors
    ///
    /// Returns `(self, error)` on failure to allow rollback.
    #[must_use = "deployment state must be used"]
    pub async fn await_health(
        self,
        clock: &dyn Clock,
        cancel: &CancellationToken,
    ) -> TransitionResult<HealthChecked, InstanceStarted> {
        let result = {
            let base_url = self.state.instance.base_url();
            let policy = &self.config.health_check;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(DeployError::Cancelled),
                res = health::wait_healthy(&base_url, policy, clock) => res.map_err(DeployError::from),
            }
        };

        match result {
            Ok(()) => {
                let instance = self.state.instance.clone();
                Ok(self.transition(HealthChecked { instance }))
            }
            Err(e) => Err((self, e)),
        }
    }

    /// Rollback: stop and remove the new instance.
    pub async fn rollback<R: ContainerOps + ?Sized>(
        self,
        runtime: &R,
    ) -> Result<(), ContainerError> {
        stop_and_remove(runtime, &self.state.instance.id).await
    }
}

// =============================================================================
// HealthChecked -> CutOver
// =============================================================================

impl Deployment<HealthChecked> {
    /// Render the routing rules for the new port and push them to the proxy.
    ///
    /// With no routing rules there is nothing to push and the proxy is left
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns `(self, error)` on failure to allow rollback.
    #[must_use = "deployment state must be used"]
    pub async fn cutover<P: ProxyAdmin + ?Sized>(
        self,
        proxy: &P,
    ) -> TransitionResult<CutOver, HealthChecked> {
        let caddy_config = &self.config.caddy;

        if caddy_config.rules.is_empty() {
            tracing::debug!("no routing rules configured, skipping proxy update");
        } else {
            let document = caddy::render(
                &caddy_config.rules,
                &caddy_config.global,
                self.state.instance.port,
            );
            if let Err(e) = proxy.load(&document).await {
                return Err((self, DeployError::from(e)));
            }
        }

        let instance = self.state.instance.clone();
        Ok(self.transition(CutOver { instance }))
    }

    /// Rollback: stop and remove the new instance.
    pub async fn rollback<R: ContainerOps + ?Sized>(
        self,
        runtime: &R,
    ) -> Result<(), ContainerError> {
        stop_and_remove(runtime, &self.state.instance.id).await
    }
}

// =============================================================================
// CutOver -> Completed
// =============================================================================

impl Deployment<CutOver> {
    /// Stop and remove the previous instance, if there was one.
    ///
    /// Traffic already reaches the new instance, so a failure here does not
    /// undo the deployment; it is handed back for reporting.
    #[must_use = "deployment state must be used"]
    pub async fn retire_old_instance<R: ContainerOps + ?Sized>(
        self,
        runtime: &R,
    ) -> (Deployment<Completed>, Option<DeployError>) {
        let failure = match &self.old_instance {
            Some(old) => stop_and_remove(runtime, old).await.err().map(|source| {
                DeployError::OldInstanceRetireFailed {
                    container: old.clone(),
                    source,
                }
            }),
            None => None,
        };

        let instance = self.state.instance.clone();
        (self.transition(Completed { instance }), failure)
    }
}

// =============================================================================
// Completed - Terminal State
// =============================================================================

impl Deployment<Completed> {
    /// Consume the deployment and return the instance now serving traffic.
    pub fn finish(self) -> RunningInstance {
        self.state.instance
    }
}
