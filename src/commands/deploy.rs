// ABOUTME: Deploy command implementation.
// ABOUTME: Wires the real runtime and proxy into the orchestrator and handles signals.

use slick::caddy::CaddyClient;
use slick::config::Config;
use slick::deploy::{DeploymentOutcome, Orchestrator};
use slick::error::{Error, Result};
use slick::output::Output;
use slick::runtime::BollardRuntime;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub async fn deploy(config: Config, mut output: Output) -> Result<()> {
    output.start_timer();

    let runtime = Arc::new(BollardRuntime::connect_local().await?);
    tracing::debug!(runtime = %runtime.runtime_type(), "connected to container runtime");
    let proxy = Arc::new(CaddyClient::new(config.caddy.admin_api.clone()));

    output.progress(&format!(
        "Deploying {} ({})",
        config.app.display_name(),
        config.app.image
    ));

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_signal(cancel.clone()));

    let orchestrator = Orchestrator::new(runtime, proxy).with_output(output.clone());
    let outcome = orchestrator.run(&config, cancel).await;
    watcher.abort();

    for warning in outcome.warnings() {
        output.warning(&warning.message);
    }

    match outcome {
        DeploymentOutcome::Succeeded { instance, .. } => {
            output.success(&format!(
                "Deployed {} on port {}",
                instance.id.short(),
                instance.port
            ));
            Ok(())
        }
        DeploymentOutcome::Failed {
            error,
            old_instance_serving,
            ..
        } => {
            if old_instance_serving {
                output.progress("Previous instance is still serving traffic");
            }
            Err(Error::Deploy(error))
        }
    }
}

/// Cancel the deployment on Ctrl-C or SIGTERM.
async fn cancel_on_signal(cancel: CancellationToken) {
    wait_for_signal().await;
    tracing::warn!("interrupt received, cancelling deployment");
    cancel.cancel();
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "SIGTERM handler unavailable");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
