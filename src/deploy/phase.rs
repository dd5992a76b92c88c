// ABOUTME: Named phases of a deployment, used for progress reporting.
// ABOUTME: Mirrors the transitions of the typed Deployment state machine.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    PullingImage,
    DiscoveringOldInstance,
    AllocatingPort,
    StartingNewInstance,
    AwaitingHealth,
    CuttingOverProxy,
    RetiringOldInstance,
    RollingBack,
    Succeeded,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::PullingImage => "pulling image",
            Phase::DiscoveringOldInstance => "looking for running instance",
            Phase::AllocatingPort => "allocating port",
            Phase::StartingNewInstance => "starting new instance",
            Phase::AwaitingHealth => "waiting for health check",
            Phase::CuttingOverProxy => "switching proxy",
            Phase::RetiringOldInstance => "retiring old instance",
            Phase::RollingBack => "rolling back",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        };
        f.write_str(s)
    }
}
