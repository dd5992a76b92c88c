// ABOUTME: In-memory container runtime for orchestration tests.
// ABOUTME: Started containers answer HTTP on their host port with a configurable status.

use super::stub_server::StubServer;
use async_trait::async_trait;
use parking_lot::Mutex;
use slick::runtime::{
    ContainerConfig, ContainerError, ContainerInfo, ContainerOps, ContainerState,
    ContainerSummary, ImageError, ImageOps, RegistryAuth,
};
use slick::types::{ContainerId, ImageRef};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Pulled(String),
    Created(ContainerId),
    Started(ContainerId),
    Stopped(ContainerId),
    Removed(ContainerId),
}

#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub id: ContainerId,
    pub image: String,
    pub running: bool,
    pub host_port: Option<u16>,
    pub labels: HashMap<String, String>,
    pub env: BTreeMap<String, String>,
}

struct State {
    next_id: u32,
    containers: BTreeMap<String, FakeContainer>,
    servers: HashMap<String, StubServer>,
    events: Vec<Event>,
    health_status: u16,
    fail_pull: bool,
    fail_start: bool,
    fail_remove: Vec<ContainerId>,
    last_auth: Option<RegistryAuth>,
    cancel_on_pull: Option<CancellationToken>,
}

/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct FakeRuntime {
    state: Arc<Mutex<State>>,
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                next_id: 1,
                containers: BTreeMap::new(),
                servers: HashMap::new(),
                events: Vec::new(),
                health_status: 200,
                fail_pull: false,
                fail_start: false,
                fail_remove: Vec::new(),
                last_auth: None,
                cancel_on_pull: None,
            })),
        }
    }
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status code new instances answer health checks with.
    pub fn with_health_status(self, status: u16) -> Self {
        self.state.lock().health_status = status;
        self
    }

    pub fn failing_pull(self) -> Self {
        self.state.lock().fail_pull = true;
        self
    }

    pub fn failing_start(self) -> Self {
        self.state.lock().fail_start = true;
        self
    }

    /// Cancel `token` once the image has been pulled.
    pub fn cancelling_after_pull(self, token: CancellationToken) -> Self {
        self.state.lock().cancel_on_pull = Some(token);
        self
    }

    /// Make removal of `id` fail.
    pub fn failing_remove_of(&self, id: &ContainerId) {
        self.state.lock().fail_remove.push(id.clone());
    }

    /// Add an already running container (no HTTP listener).
    pub fn add_running(&self, image: &str) -> ContainerId {
        let mut state = self.state.lock();
        let id = next_id(&mut state);
        state.containers.insert(
            id.as_str().to_string(),
            FakeContainer {
                id: id.clone(),
                image: image.to_string(),
                running: true,
                host_port: None,
                labels: HashMap::new(),
                env: BTreeMap::new(),
            },
        );
        id
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().events.clone()
    }

    pub fn container(&self, id: &ContainerId) -> Option<FakeContainer> {
        self.state.lock().containers.get(id.as_str()).cloned()
    }

    pub fn running(&self) -> Vec<FakeContainer> {
        self.state
            .lock()
            .containers
            .values()
            .filter(|c| c.running)
            .cloned()
            .collect()
    }

    pub fn container_count(&self) -> usize {
        self.state.lock().containers.len()
    }

    pub fn last_auth(&self) -> Option<RegistryAuth> {
        self.state.lock().last_auth.clone()
    }
}

fn next_id(state: &mut State) -> ContainerId {
    let id = ContainerId::new(format!("c{:09}{}", state.next_id, "0".repeat(54)));
    state.next_id += 1;
    id
}

#[async_trait]
impl ImageOps for FakeRuntime {
    async fn pull_image(
        &self,
        reference: &ImageRef,
        auth: Option<&RegistryAuth>,
    ) -> Result<(), ImageError> {
        let mut state = self.state.lock();
        if state.fail_pull {
            return Err(ImageError::NotFound(reference.to_string()));
        }
        state.last_auth = auth.cloned();
        state.events.push(Event::Pulled(reference.to_string()));
        if let Some(token) = &state.cancel_on_pull {
            token.cancel();
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerOps for FakeRuntime {
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerId, ContainerError> {
        let mut state = self.state.lock();
        let id = next_id(&mut state);
        state.containers.insert(
            id.as_str().to_string(),
            FakeContainer {
                id: id.clone(),
                image: config.image.to_string(),
                running: false,
                host_port: config.ports.first().map(|p| p.host_port),
                labels: config.labels.clone(),
                env: config.env.clone(),
            },
        );
        state.events.push(Event::Created(id.clone()));
        Ok(id)
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        let (port, status) = {
            let mut state = self.state.lock();
            if state.fail_start {
                return Err(ContainerError::PortInUse(
                    "Bind for 0.0.0.0 failed: port is already allocated".to_string(),
                ));
            }
            let status = state.health_status;
            let container = state
                .containers
                .get_mut(id.as_str())
                .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
            container.running = true;
            let port = container.host_port;
            state.events.push(Event::Started(id.clone()));
            (port, status)
        };

        if let Some(port) = port {
            let server = StubServer::on_port(port, status)
                .await
                .map_err(|e| ContainerError::PortInUse(e.to_string()))?;
            self.state
                .lock()
                .servers
                .insert(id.as_str().to_string(), server);
        }

        Ok(())
    }

    async fn stop_container(
        &self,
        id: &ContainerId,
        _timeout: Duration,
    ) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        let container = state
            .containers
            .get_mut(id.as_str())
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        if !container.running {
            return Err(ContainerError::NotRunning(id.to_string()));
        }
        container.running = false;
        state.servers.remove(id.as_str());
        state.events.push(Event::Stopped(id.clone()));
        Ok(())
    }

    async fn remove_container(&self, id: &ContainerId, _force: bool) -> Result<(), ContainerError> {
        let mut state = self.state.lock();
        if state.fail_remove.contains(id) {
            return Err(ContainerError::Runtime(format!(
                "removal of {} is already in progress",
                id
            )));
        }
        state
            .containers
            .remove(id.as_str())
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        state.servers.remove(id.as_str());
        state.events.push(Event::Removed(id.clone()));
        Ok(())
    }

    async fn inspect_container(&self, id: &ContainerId) -> Result<ContainerInfo, ContainerError> {
        let state = self.state.lock();
        let container = state
            .containers
            .get(id.as_str())
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        Ok(ContainerInfo {
            id: container.id.clone(),
            name: format!("fake_{}", container.id.short()),
            image: container.image.clone(),
            state: if container.running {
                ContainerState::Running
            } else {
                ContainerState::Exited
            },
            labels: container.labels.clone(),
        })
    }

    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerSummary>, ContainerError> {
        let state = self.state.lock();
        Ok(state
            .containers
            .values()
            .filter(|c| all || c.running)
            .map(|c| ContainerSummary {
                id: c.id.clone(),
                names: vec![format!("fake_{}", c.id.short())],
                image: c.image.clone(),
                state: if c.running { "running" } else { "exited" }.to_string(),
                status: String::new(),
                created: 0,
                ports: Vec::new(),
            })
            .collect())
    }
}
