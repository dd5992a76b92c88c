// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::config::Config;
use crate::types::{ContainerId, ImageRef};

use super::outcome::RunningInstance;
use super::state::{Completed, CutOver, HealthChecked, InstanceStarted, Initialized};

/// A deployment in progress, parameterized by its current state.
///
/// States after `InstanceStarted` carry the new instance directly, so the
/// container id and port are always present where rollback or cutover need
/// them.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) config: Config,
    pub(crate) old_instance: Option<ContainerId>,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    pub fn new(config: Config) -> Self {
        Deployment {
            config,
            old_instance: None,
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    pub fn image(&self) -> &ImageRef {
        &self.config.app.image
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The instance serving traffic before this deployment (None on first deploy
    /// or before discovery).
    pub fn old_instance(&self) -> Option<&ContainerId> {
        self.old_instance.as_ref()
    }

    pub(crate) fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            config: self.config,
            old_instance: self.old_instance,
            state,
        }
    }
}

impl Deployment<InstanceStarted> {
    pub fn new_instance(&self) -> &RunningInstance {
        &self.state.instance
    }
}

impl Deployment<HealthChecked> {
    pub fn new_instance(&self) -> &RunningInstance {
        &self.state.instance
    }
}

impl Deployment<CutOver> {
    pub fn new_instance(&self) -> &RunningInstance {
        &self.state.instance
    }
}

impl Deployment<Completed> {
    pub fn new_instance(&self) -> &RunningInstance {
        &self.state.instance
    }
}
