// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Later states carry the new instance so it cannot be missing when needed.

use super::outcome::RunningInstance;

/// Nothing done yet.
/// Available actions: `pull_image()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Image present on the host.
/// Available actions: `discover_old_instance()`
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePulled;

/// Old instance (if any) identified.
/// Available actions: `allocate_port()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Discovered;

/// Host port reserved for the new instance.
/// Available actions: `start_instance()`
#[derive(Debug, Clone, Copy)]
pub struct PortAllocated {
    pub(crate) port: u16,
}

/// New instance running, not yet receiving traffic.
/// Available actions: `await_health()`, `rollback()`
#[derive(Debug, Clone)]
pub struct InstanceStarted {
    pub(crate) instance: RunningInstance,
}

/// New instance answered its health check.
/// Available actions: `cutover()`, `rollback()`
#[derive(Debug, Clone)]
pub struct HealthChecked {
    pub(crate) instance: RunningInstance,
}

/// Proxy now routes to the new instance.
/// Available actions: `retire_old_instance()`
#[derive(Debug, Clone)]
pub struct CutOver {
    pub(crate) instance: RunningInstance,
}

/// Deployment finished.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(crate) instance: RunningInstance,
}
