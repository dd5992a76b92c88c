// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Deployment struct, and the orchestrator.

mod deployment;
mod error;
mod orchestrator;
mod outcome;
mod phase;
mod state;
mod transitions;

pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind};
pub use orchestrator::Orchestrator;
pub use outcome::{DeploymentOutcome, RunningInstance};
pub use phase::Phase;
pub use state::{
    Completed, CutOver, Discovered, HealthChecked, ImagePulled, Initialized, InstanceStarted,
    PortAllocated,
};
pub use transitions::{
    APP_LABEL, MANAGED_LABEL, STOP_TIMEOUT, TransitionResult, find_running_instance,
    stop_and_remove,
};
