// ABOUTME: Result of a deployment run as reported to the caller.
// ABOUTME: Success carries the new instance; failure says whether the old one still serves.

use super::error::DeployError;
use crate::diagnostics::Warning;
use crate::types::ContainerId;

/// A container started by a deployment and the host port it listens on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningInstance {
    pub id: ContainerId,
    pub port: u16,
}

impl RunningInstance {
    /// Base URL the instance answers on from the host.
    pub fn base_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

#[derive(Debug)]
pub enum DeploymentOutcome {
    Succeeded {
        instance: RunningInstance,
        warnings: Vec<Warning>,
    },
    Failed {
        error: DeployError,
        /// A previously running instance was found and left untouched.
        old_instance_serving: bool,
        warnings: Vec<Warning>,
    },
}

impl DeploymentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeploymentOutcome::Succeeded { .. })
    }

    pub fn warnings(&self) -> &[Warning] {
        match self {
            DeploymentOutcome::Succeeded { warnings, .. }
            | DeploymentOutcome::Failed { warnings, .. } => warnings,
        }
    }

    pub fn error(&self) -> Option<&DeployError> {
        match self {
            DeploymentOutcome::Succeeded { .. } => None,
            DeploymentOutcome::Failed { error, .. } => Some(error),
        }
    }
}
