// ABOUTME: Container runtime detection on the local host.
// ABOUTME: Honors DOCKER_HOST, then checks Podman sockets, then Docker.

use super::types::{RuntimeEndpoint, RuntimeInfo, RuntimeType};
use std::path::Path;

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (checked DOCKER_HOST, Podman and Docker sockets)")]
    NoRuntimeFound,

    #[error("unsupported DOCKER_HOST (expected unix://, tcp:// or http://): {0}")]
    UnsupportedHost(String),
}

/// Detect the container runtime on this host.
///
/// Detection order:
/// 1. `DOCKER_HOST` (`unix://`, `tcp://` or `http://`)
/// 2. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 3. Rootful Podman socket (`/run/podman/podman.sock`)
/// 4. Docker socket (`/var/run/docker.sock`)
pub fn detect_local() -> Result<RuntimeInfo, DetectionError> {
    if let Ok(host) = std::env::var("DOCKER_HOST")
        && !host.is_empty()
    {
        return from_docker_host(&host);
    }

    let candidates = current_uid()
        .map(|uid| (format!("/run/user/{uid}/podman/podman.sock"), RuntimeType::Podman))
        .into_iter()
        .chain([
            (ROOTFUL_PODMAN.to_string(), RuntimeType::Podman),
            (DOCKER_SOCKET.to_string(), RuntimeType::Docker),
        ]);

    for (socket_path, runtime_type) in candidates {
        if Path::new(&socket_path).exists() {
            tracing::debug!(%runtime_type, %socket_path, "detected container runtime");
            return Ok(RuntimeInfo {
                runtime_type,
                endpoint: RuntimeEndpoint::Socket(socket_path),
            });
        }
    }

    Err(DetectionError::NoRuntimeFound)
}

fn from_docker_host(host: &str) -> Result<RuntimeInfo, DetectionError> {
    if host.starts_with("tcp://") || host.starts_with("http://") {
        // Nothing in a TCP address identifies the runtime; both speak the Docker API.
        return Ok(RuntimeInfo {
            runtime_type: RuntimeType::Docker,
            endpoint: RuntimeEndpoint::Tcp(host.to_string()),
        });
    }

    let socket_path = host
        .strip_prefix("unix://")
        .ok_or_else(|| DetectionError::UnsupportedHost(host.to_string()))?;

    let runtime_type = if socket_path.contains("podman") {
        RuntimeType::Podman
    } else {
        RuntimeType::Docker
    };

    Ok(RuntimeInfo {
        runtime_type,
        endpoint: RuntimeEndpoint::Socket(socket_path.to_string()),
    })
}

fn current_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(str::to_string)
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docker_host_unix_socket() {
        let info = from_docker_host("unix:///tmp/docker.sock").unwrap();
        assert_eq!(info.runtime_type, RuntimeType::Docker);
        assert_eq!(
            info.endpoint,
            RuntimeEndpoint::Socket("/tmp/docker.sock".to_string())
        );
    }

    #[test]
    fn docker_host_podman_socket() {
        let info = from_docker_host("unix:///run/user/1000/podman/podman.sock").unwrap();
        assert_eq!(info.runtime_type, RuntimeType::Podman);
    }

    #[test]
    fn docker_host_tcp_address() {
        let info = from_docker_host("tcp://10.0.0.1:2375").unwrap();
        assert_eq!(info.runtime_type, RuntimeType::Docker);
        assert_eq!(
            info.endpoint,
            RuntimeEndpoint::Tcp("tcp://10.0.0.1:2375".to_string())
        );
    }

    #[test]
    fn detect_local_honors_tcp_docker_host() {
        temp_env::with_var("DOCKER_HOST", Some("tcp://127.0.0.1:2375"), || {
            let info = detect_local().unwrap();
            assert_eq!(info.endpoint.to_string(), "tcp://127.0.0.1:2375");
        });
    }

    #[test]
    fn docker_host_ssh_unsupported() {
        assert!(matches!(
            from_docker_host("ssh://deploy@host"),
            Err(DetectionError::UnsupportedHost(_))
        ));
    }
}
