//! Addressing for the remote lock.

use std::fmt;

/// Node identifier on the network
pub type NodeId = u16;

/// One endpoint of a node, plus whether it advertises Door Lock Logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Node the endpoint belongs to
    pub node_id: NodeId,
    /// Endpoint index, 0 for the root device
    pub index: u8,
    /// Whether the endpoint advertises the Door Lock Logging command class
    pub supports_door_lock_logging: bool,
}

impl Endpoint {
    /// Root endpoint of a node that supports Door Lock Logging
    pub fn new(node_id: NodeId) -> Self {
        Self { node_id, index: 0, supports_door_lock_logging: true }
    }

    /// Use a different endpoint index
    #[must_use]
    pub fn with_index(mut self, index: u8) -> Self {
        self.index = index;
        self
    }

    /// Override the advertised command class support
    #[must_use]
    pub fn with_support(mut self, supported: bool) -> Self {
        self.supports_door_lock_logging = supported;
        self
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index == 0 {
            write!(f, "node {}", self.node_id)
        } else {
            write!(f, "node {} endpoint {}", self.node_id, self.index)
        }
    }
}
