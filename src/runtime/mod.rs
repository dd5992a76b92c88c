// ABOUTME: Container runtime access for Docker and Podman.
// ABOUTME: Capability traits, the bollard implementation, and local detection.

mod bollard;
mod detection;
mod error;
pub mod traits;
mod types;

pub use bollard::BollardRuntime;
pub use detection::{DetectionError, detect_local};
pub use error::RuntimeError;
pub use traits::*;
pub use types::{RuntimeEndpoint, RuntimeInfo, RuntimeType};
