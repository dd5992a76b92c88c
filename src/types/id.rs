// ABOUTME: Opaque container identifier returned by the runtime.
// ABOUTME: Wraps the runtime's string ID so it can't be confused with names or images.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the abbreviated ID shown in tables.
const SHORT_LEN: usize = 10;

/// A container ID as reported by Docker or Podman.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[must_use = "IDs reference resources and should not be ignored"]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The abbreviated form used by `docker ps`.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(SHORT_LEN) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
