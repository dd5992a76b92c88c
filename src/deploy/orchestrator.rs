// ABOUTME: Drives a deployment through every state and owns rollback.
// ABOUTME: Runtime, proxy admin, port allocator, and clock are injected.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::caddy::ProxyAdmin;
use crate::config::Config;
use crate::diagnostics::{Diagnostics, Warning};
use crate::health::{Clock, TokioClock};
use crate::output::{Output, OutputMode};
use crate::port::PortAllocator;
use crate::runtime::{ContainerOps, ImageOps};

use super::Deployment;
use super::error::DeployError;
use super::outcome::{DeploymentOutcome, RunningInstance};
use super::phase::Phase;

/// Runs deployments against a container runtime and a reverse proxy.
pub struct Orchestrator<R, P: ?Sized> {
    runtime: Arc<R>,
    proxy: Arc<P>,
    allocator: Arc<PortAllocator>,
    clock: Arc<dyn Clock>,
    output: Output,
}

impl<R, P> Orchestrator<R, P>
where
    R: ImageOps + ContainerOps,
    P: ProxyAdmin + ?Sized,
{
    pub fn new(runtime: Arc<R>, proxy: Arc<P>) -> Self {
        Self {
            runtime,
            proxy,
            allocator: Arc::new(PortAllocator::new()),
            clock: Arc::new(TokioClock),
            output: Output::new(OutputMode::Quiet),
        }
    }

    pub fn with_allocator(mut self, allocator: Arc<PortAllocator>) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    fn enter(&self, phase: Phase, detail: &str) {
        tracing::info!(%phase, "{}", detail);
        self.output.progress(detail);
    }

    /// Deploy `config`, rolling back on failure.
    ///
    /// Cancellation aborts an image pull, stops the run before a container is
    /// created, and rolls back a new instance while it is waiting to become
    /// healthy. Once the proxy has switched, the deployment runs to the end.
    pub async fn run(&self, config: &Config, cancel: CancellationToken) -> DeploymentOutcome {
        let mut diagnostics = Diagnostics::default();
        let mut old_instance_serving = false;

        let result = self
            .drive(config, &cancel, &mut diagnostics, &mut old_instance_serving)
            .await;

        match result {
            Ok(instance) => {
                tracing::info!(phase = %Phase::Succeeded, container = %instance.id, port = instance.port);
                DeploymentOutcome::Succeeded {
                    instance,
                    warnings: diagnostics.into_warnings(),
                }
            }
            Err(error) => {
                tracing::info!(phase = %Phase::Failed, kind = ?error.kind(), "{}", error);
                DeploymentOutcome::Failed {
                    error,
                    old_instance_serving,
                    warnings: diagnostics.into_warnings(),
                }
            }
        }
    }

    async fn drive(
        &self,
        config: &Config,
        cancel: &CancellationToken,
        diagnostics: &mut Diagnostics,
        old_instance_serving: &mut bool,
    ) -> Result<RunningInstance, DeployError> {
        let runtime = self.runtime.as_ref();
        let deployment = Deployment::new(config.clone());

        self.enter(
            Phase::PullingImage,
            &format!("Pulling image {}", deployment.image()),
        );
        let deployment = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DeployError::Cancelled),
            res = deployment.pull_image(runtime) => res?,
        };

        self.enter(
            Phase::DiscoveringOldInstance,
            "Looking for running instance",
        );
        let deployment = deployment
            .discover_old_instance(runtime, diagnostics)
            .await?;
        match deployment.old_instance() {
            Some(old) => {
                *old_instance_serving = true;
                self.output
                    .progress(&format!("Found running instance {}", old.short()));
            }
            None => self.output.progress("No running instance, first deploy"),
        }

        self.enter(Phase::AllocatingPort, "Allocating port");
        let deployment = deployment.allocate_port(&self.allocator)?;

        // Last point where stopping leaves nothing behind.
        if cancel.is_cancelled() {
            return Err(DeployError::Cancelled);
        }

        self.enter(
            Phase::StartingNewInstance,
            &format!("Starting new instance on port {}", deployment.port()),
        );
        let deployment = deployment.start_instance(runtime).await?;

        self.enter(Phase::AwaitingHealth, "Waiting for health check");
        let deployment = match deployment
            .await_health(self.clock.as_ref(), cancel)
            .await
        {
            Ok(d) => d,
            Err((failed, error)) => {
                self.enter(Phase::RollingBack, &format!("Rolling back: {error}"));
                let id = failed.new_instance().id.clone();
                if let Err(e) = failed.rollback(runtime).await {
                    diagnostics.warn(Warning::rollback_cleanup(format!(
                        "failed to remove new instance {}: {}",
                        id.short(),
                        e
                    )));
                }
                return Err(error);
            }
        };

        self.enter(Phase::CuttingOverProxy, "Switching proxy to new instance");
        let deployment = match deployment.cutover(self.proxy.as_ref()).await {
            Ok(d) => d,
            Err((failed, error)) => {
                self.enter(Phase::RollingBack, &format!("Rolling back: {error}"));
                let id = failed.new_instance().id.clone();
                if let Err(e) = failed.rollback(runtime).await {
                    diagnostics.warn(Warning::rollback_cleanup(format!(
                        "failed to remove new instance {}: {}",
                        id.short(),
                        e
                    )));
                }
                return Err(error);
            }
        };

        if deployment.old_instance().is_some() {
            self.enter(Phase::RetiringOldInstance, "Retiring old instance");
        }
        let (deployment, retire_failure) = deployment.retire_old_instance(runtime).await;
        if let Some(error) = retire_failure {
            diagnostics.warn(Warning::old_instance_retire(error.to_string()));
        }

        Ok(deployment.finish())
    }
}
