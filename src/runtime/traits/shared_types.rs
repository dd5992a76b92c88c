// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: ContainerConfig, ContainerInfo, ContainerSummary, RegistryAuth.

use crate::types::{ContainerId, ImageRef};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Configuration for creating a container.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Container name; the runtime generates one when absent.
    pub name: Option<String>,
    pub image: ImageRef,
    pub env: BTreeMap<String, String>,
    pub labels: HashMap<String, String>,
    pub ports: Vec<PortMapping>,
    /// Bind mounts in `source:target[:options]` form.
    pub binds: Vec<String>,
    /// Network mode / network name.
    pub network: Option<String>,
}

/// Publishes a container port on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    pub host_ip: String,
    pub host_port: u16,
    pub container_port: u16,
    pub protocol: Protocol,
}

impl PortMapping {
    /// TCP mapping on all interfaces.
    pub fn tcp(host_port: u16, container_port: u16) -> Self {
        Self {
            host_ip: "0.0.0.0".to_string(),
            host_port,
            container_port,
            protocol: Protocol::Tcp,
        }
    }

    /// Key used by the Docker API, e.g. `8080/tcp`.
    pub fn port_key(&self) -> String {
        format!("{}/{}", self.container_port, self.protocol)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => f.write_str("tcp"),
            Protocol::Udp => f.write_str("udp"),
        }
    }
}

/// Detailed information about a single container.
#[derive(Debug, Clone)]
pub struct ContainerInfo {
    pub id: ContainerId,
    pub name: String,
    /// Image as written in the container's config (not the resolved digest).
    pub image: String,
    pub state: ContainerState,
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
}

/// One row of `docker ps`.
#[derive(Debug, Clone)]
pub struct ContainerSummary {
    pub id: ContainerId,
    pub names: Vec<String>,
    pub image: String,
    pub state: String,
    pub status: String,
    /// Creation time as a unix timestamp.
    pub created: i64,
    pub ports: Vec<PublishedPort>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPort {
    pub ip: Option<String>,
    pub private_port: u16,
    pub public_port: Option<u16>,
    pub protocol: String,
}

impl fmt::Display for PublishedPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.public_port {
            Some(public) => write!(
                f,
                "{}:{}->{}/{}",
                self.ip.as_deref().unwrap_or(""),
                public,
                self.private_port,
                self.protocol
            ),
            None => write!(f, "{}/{}", self.private_port, self.protocol),
        }
    }
}

/// Registry authentication credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryAuth {
    pub username: String,
    pub password: String,
    /// Registry server (e.g., "ghcr.io").
    pub server: Option<String>,
}
