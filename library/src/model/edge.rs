//! Edge model: directed connections between node ports.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A specific port on a specific node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    pub node: Uuid,
    pub port: String,
}

impl PortRef {
    pub fn new(node: Uuid, port: impl Into<String>) -> Self {
        Self {
            node,
            port: port.into(),
        }
    }
}

/// A directed connection from an output port to an input port.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: Uuid,
    pub source: PortRef,
    pub target: PortRef,
    /// Rendering variant. All variants currently route through the same
    /// renderer; the field survives round-trips for forward compatibility.
    pub variant: Option<String>,
}

impl Edge {
    pub fn new(source: PortRef, target: PortRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            target,
            variant: None,
        }
    }

    /// Whether this edge touches the given node on either end.
    pub fn references(&self, node_id: Uuid) -> bool {
        self.source.node == node_id || self.target.node == node_id
    }
}
