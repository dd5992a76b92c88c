// ABOUTME: Host port allocation for new instances.
// ABOUTME: Probes a range by binding and returns the first free port.

use parking_lot::Mutex;
use std::net::{Ipv4Addr, TcpListener};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("no available ports in range {start}-{end}")]
    NoPortsAvailable { start: u16, end: u16 },
}

/// Finds unused TCP ports on the host.
///
/// Calls are serialized so two allocations on the same allocator never probe
/// concurrently. Nothing is remembered between calls: the probe socket is
/// released as soon as the bind succeeds.
#[derive(Debug, Default)]
pub struct PortAllocator {
    lock: Mutex<()>,
}

impl PortAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the lowest port in `start..=end` (walking by `step`) that can be bound.
    pub fn allocate(&self, start: u16, end: u16, step: u16) -> Result<u16, PortError> {
        let _guard = self.lock.lock();
        let step = usize::from(step.max(1));

        let found = (start..=end)
            .step_by(step)
            .find(|&port| port != 0 && is_free(port));

        match found {
            Some(port) => {
                tracing::debug!(port, "allocated host port");
                Ok(port)
            }
            None => Err(PortError::NoPortsAvailable { start, end }),
        }
    }
}

fn is_free(port: u16) -> bool {
    TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_port() -> u16 {
        TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0))
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    #[test]
    fn inverted_range_has_no_ports() {
        let allocator = PortAllocator::new();
        assert_eq!(
            allocator.allocate(9000, 8000, 1),
            Err(PortError::NoPortsAvailable {
                start: 9000,
                end: 8000
            })
        );
    }

    #[test]
    fn zero_step_is_treated_as_one() {
        let port = free_port();
        let allocator = PortAllocator::new();
        assert_eq!(allocator.allocate(port, port, 0), Ok(port));
    }

    #[test]
    fn occupied_single_port_range_fails() {
        let holder = TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0)).unwrap();
        let port = holder.local_addr().unwrap().port();
        let allocator = PortAllocator::new();
        assert!(allocator.allocate(port, port, 1).is_err());
    }
}
