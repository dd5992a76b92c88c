// ABOUTME: Runtime error types with SNAFU pattern.
// ABOUTME: Unifies detection and connection failures behind one type.

use snafu::Snafu;

use super::detection::DetectionError;

/// Failure to reach a container runtime.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("runtime detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("failed to connect to {endpoint}: {source}"))]
    Connection {
        endpoint: String,
        source: bollard::errors::Error,
    },
}

impl From<DetectionError> for RuntimeError {
    fn from(source: DetectionError) -> Self {
        RuntimeError::Detection { source }
    }
}
