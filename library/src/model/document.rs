//! The `{nodes, edges}` document exchange format.
//!
//! This is the wire shape consumed and produced by the persistence service.
//! Node `data` payloads are opaque [`serde_json::Value`]s and must round-trip
//! unchanged. Edge handles are optional on the wire; absent handles resolve
//! to the kind's sole output/input when loading.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::edge::{Edge, PortRef};
use super::graph::Graph;
use super::node::{Node, NodeKind, Position};
use super::ports;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    pub data: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub id: Uuid,
    pub source: Uuid,
    pub target: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

/// A graph as exchanged with the persistence service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    pub fn from_graph(graph: &Graph) -> Self {
        let mut nodes: Vec<NodeRecord> = graph
            .nodes
            .values()
            .map(|n| NodeRecord {
                id: n.id,
                kind: n.kind.clone(),
                position: n.position,
                data: n.data.clone(),
            })
            .collect();
        let mut edges: Vec<EdgeRecord> = graph
            .edges
            .values()
            .map(|e| EdgeRecord {
                id: e.id,
                source: e.source.node,
                target: e.target.node,
                source_handle: Some(e.source.port.clone()),
                target_handle: Some(e.target.port.clone()),
                variant: e.variant.clone(),
            })
            .collect();
        // Deterministic output regardless of map iteration order.
        nodes.sort_by_key(|n| n.id);
        edges.sort_by_key(|e| e.id);
        Self { nodes, edges }
    }

    /// Build a graph from a document. Transient flags start cleared. Edges
    /// whose endpoints are missing from the node list are dropped with a
    /// warning rather than failing the whole load.
    pub fn into_graph(self) -> Graph {
        let mut graph = Graph::default();
        for record in self.nodes {
            let node = Node {
                id: record.id,
                kind: record.kind,
                position: record.position,
                data: record.data,
                selected: false,
                dragging: false,
            };
            graph.nodes.insert(node.id, node);
        }
        for record in self.edges {
            let Some(source_kind) = graph.nodes.get(&record.source).map(|n| n.kind.clone()) else {
                log::warn!("dropping edge {}: missing source node", record.id);
                continue;
            };
            let Some(target_kind) = graph.nodes.get(&record.target).map(|n| n.kind.clone()) else {
                log::warn!("dropping edge {}: missing target node", record.id);
                continue;
            };
            let source_port = record
                .source_handle
                .or_else(|| ports::default_output(&source_kind).map(str::to_string));
            let target_port = record
                .target_handle
                .or_else(|| ports::default_input(&target_kind).map(str::to_string));
            let (Some(source_port), Some(target_port)) = (source_port, target_port) else {
                log::warn!("dropping edge {}: unresolvable port handles", record.id);
                continue;
            };
            let edge = Edge {
                id: record.id,
                source: PortRef {
                    node: record.source,
                    port: source_port,
                },
                target: PortRef {
                    node: record.target,
                    port: target_port,
                },
                variant: record.variant,
            };
            graph.edges.insert(edge.id, edge);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_graph() -> Graph {
        let mut graph = Graph::default();
        let mut a = Node::new(NodeKind::TextInput, Position::new(0.0, 0.0));
        a.data = serde_json::json!({ "text": "sunset over water", "nested": { "k": [1, 2, 3] } });
        let b = Node::new(NodeKind::Preview, Position::new(200.0, 0.0));
        let edge = Edge::new(PortRef::new(a.id, "text"), PortRef::new(b.id, "media"));
        graph.nodes.insert(a.id, a);
        graph.nodes.insert(b.id, b);
        graph.edges.insert(edge.id, edge);
        graph
    }

    #[test]
    fn save_load_round_trip_is_identity() {
        let graph = setup_graph();
        let json = serde_json::to_string(&GraphDocument::from_graph(&graph)).unwrap();
        let doc: GraphDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(doc.into_graph(), graph);
    }

    #[test]
    fn opaque_data_survives_unchanged() {
        let graph = setup_graph();
        let doc = GraphDocument::from_graph(&graph);
        let reloaded = doc.into_graph();
        for (id, node) in &graph.nodes {
            assert_eq!(reloaded.nodes[id].data, node.data);
        }
    }

    #[test]
    fn transient_flags_reset_on_load() {
        let mut graph = setup_graph();
        for node in graph.nodes.values_mut() {
            node.selected = true;
            node.dragging = true;
        }
        let reloaded = GraphDocument::from_graph(&graph).into_graph();
        assert!(reloaded.nodes.values().all(|n| !n.selected && !n.dragging));
    }

    #[test]
    fn missing_handles_default_to_declared_ports() {
        let graph = setup_graph();
        let mut doc = GraphDocument::from_graph(&graph);
        for edge in &mut doc.edges {
            edge.source_handle = None;
            edge.target_handle = None;
        }
        let reloaded = doc.into_graph();
        let edge = reloaded.edges.values().next().unwrap();
        assert_eq!(edge.source.port, "text");
        assert_eq!(edge.target.port, "media");
    }

    #[test]
    fn dangling_edge_is_dropped_on_load() {
        let graph = setup_graph();
        let mut doc = GraphDocument::from_graph(&graph);
        doc.nodes.remove(0);
        let reloaded = doc.into_graph();
        assert!(reloaded.edges.is_empty());
    }

    #[test]
    fn unknown_node_type_still_loads() {
        let json = r#"{
            "nodes": [
                { "id": "6a8f66e1-7b9a-4b0e-9df1-000000000001",
                  "type": "lora-trainer",
                  "position": { "x": 10.0, "y": 20.0 },
                  "data": { "steps": 500 } }
            ],
            "edges": []
        }"#;
        let doc: GraphDocument = serde_json::from_str(json).unwrap();
        let graph = doc.into_graph();
        let node = graph.nodes.values().next().unwrap();
        assert_eq!(node.kind, NodeKind::Unknown("lora-trainer".into()));
        assert_eq!(node.data["steps"], 500);
    }
}
