//! The single writer for the workflow graph.
//!
//! UI layers hold a read-only view of the graph and emit change intents; the
//! owning application applies them here. Node deletion reports the edges it
//! pruned so observers (inspector panels, analytics) can react.

use serde_json::Value;
use uuid::Uuid;

use crate::error::GraphError;
use crate::model::document::GraphDocument;
use crate::model::edge::{Edge, PortRef};
use crate::model::graph::Graph;
use crate::model::node::{Node, NodeKind, Position};

/// Offset applied to a duplicated node so it does not cover the original.
const DUPLICATE_OFFSET: f32 = 40.0;

/// Result of deleting a node: the node-deletion event callers observe to
/// keep dependent state (inspector selection, run queues) consistent.
#[derive(Clone, Debug)]
pub struct NodeRemoval {
    pub node_id: Uuid,
    pub pruned_edge_ids: Vec<Uuid>,
}

/// Owns the authoritative [`Graph`] and applies every mutation to it.
#[derive(Default)]
pub struct WorkflowService {
    graph: Graph,
}

impl WorkflowService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> Uuid {
        let node = Node::new(kind, position);
        let id = node.id;
        log::debug!("add node {} ({})", id, node.kind.as_str());
        self.graph.nodes.insert(id, node);
        id
    }

    /// Remove a node and prune every edge referencing it.
    pub fn remove_node(&mut self, id: Uuid) -> Result<NodeRemoval, GraphError> {
        if !self.graph.nodes.contains_key(&id) {
            return Err(GraphError::NodeNotFound(id));
        }
        let pruned_edge_ids = self.graph.edges_referencing(id);
        for edge_id in &pruned_edge_ids {
            self.graph.edges.remove(edge_id);
        }
        self.graph.nodes.remove(&id);
        log::debug!("removed node {id}, pruned {} edge(s)", pruned_edge_ids.len());
        Ok(NodeRemoval {
            node_id: id,
            pruned_edge_ids,
        })
    }

    /// Clone a node's kind and data at an offset position.
    pub fn duplicate_node(&mut self, id: Uuid) -> Result<Uuid, GraphError> {
        let original = self.graph.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))?;
        let mut copy = Node::new(
            original.kind.clone(),
            Position::new(
                original.position.x + DUPLICATE_OFFSET,
                original.position.y + DUPLICATE_OFFSET,
            ),
        );
        copy.data = original.data.clone();
        let copy_id = copy.id;
        log::debug!("duplicated node {id} as {copy_id}");
        self.graph.nodes.insert(copy_id, copy);
        Ok(copy_id)
    }

    pub fn move_node(&mut self, id: Uuid, position: Position) -> Result<(), GraphError> {
        let node = self.graph.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        node.position = position;
        Ok(())
    }

    /// Replace a node's opaque payload.
    pub fn set_node_data(&mut self, id: Uuid, data: Value) -> Result<(), GraphError> {
        let node = self.graph.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        node.data = data;
        Ok(())
    }

    pub fn set_selection(&mut self, node_ids: &[Uuid]) {
        for node in self.graph.nodes.values_mut() {
            node.selected = node_ids.contains(&node.id);
        }
    }

    pub fn clear_selection(&mut self) {
        for node in self.graph.nodes.values_mut() {
            node.selected = false;
        }
    }

    pub fn set_dragging(&mut self, id: Uuid, dragging: bool) {
        if let Some(node) = self.graph.nodes.get_mut(&id) {
            node.dragging = dragging;
        }
    }

    /// Validate and add a connection. Duplicate source/target pairs are
    /// rejected so repeated gestures cannot stack identical edges.
    pub fn add_edge(&mut self, from: PortRef, to: PortRef) -> Result<Uuid, GraphError> {
        self.graph.validate_connection(&from, &to)?;
        if self
            .graph
            .edges
            .values()
            .any(|e| e.source == from && e.target == to)
        {
            return Err(GraphError::DuplicateEdge);
        }
        let edge = Edge::new(from, to);
        let id = edge.id;
        log::debug!("add edge {id}");
        self.graph.edges.insert(id, edge);
        Ok(id)
    }

    pub fn remove_edge(&mut self, id: Uuid) -> Result<(), GraphError> {
        self.graph
            .edges
            .remove(&id)
            .map(|_| ())
            .ok_or(GraphError::EdgeNotFound(id))
    }

    /// Wholesale graph replacement, the entry point for loading a document.
    pub fn replace_graph(&mut self, document: GraphDocument) {
        self.graph = document.into_graph();
        log::debug!(
            "graph replaced: {} node(s), {} edge(s)",
            self.graph.nodes.len(),
            self.graph.edges.len()
        );
    }

    pub fn snapshot(&self) -> GraphDocument {
        GraphDocument::from_graph(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_service() -> (WorkflowService, Uuid, Uuid) {
        let mut service = WorkflowService::new();
        let a = service.add_node(NodeKind::TextInput, Position::new(0.0, 0.0));
        let b = service.add_node(NodeKind::Preview, Position::new(200.0, 0.0));
        (service, a, b)
    }

    #[test]
    fn add_and_connect_scenario() {
        let (mut service, a, b) = setup_service();
        assert_eq!(service.graph().nodes.len(), 2);

        let id = service
            .add_edge(PortRef::new(a, "text"), PortRef::new(b, "media"))
            .unwrap();
        assert_eq!(service.graph().edges.len(), 1);
        let edge = service.graph().edge(id).unwrap();
        assert_eq!(edge.source, PortRef::new(a, "text"));
        assert_eq!(edge.target, PortRef::new(b, "media"));

        // Reversed gesture adds nothing.
        let err = service.add_edge(PortRef::new(b, "media"), PortRef::new(a, "text"));
        assert!(err.is_err());
        assert_eq!(service.graph().edges.len(), 1);
    }

    #[test]
    fn duplicate_connection_is_rejected() {
        let (mut service, a, b) = setup_service();
        service
            .add_edge(PortRef::new(a, "text"), PortRef::new(b, "media"))
            .unwrap();
        assert!(matches!(
            service.add_edge(PortRef::new(a, "text"), PortRef::new(b, "media")),
            Err(GraphError::DuplicateEdge)
        ));
        assert_eq!(service.graph().edges.len(), 1);
    }

    #[test]
    fn delete_pruning_scenario() {
        let (mut service, a, b) = setup_service();
        let edge_id = service
            .add_edge(PortRef::new(a, "text"), PortRef::new(b, "media"))
            .unwrap();

        let removal = service.remove_node(a).unwrap();
        assert_eq!(removal.node_id, a);
        assert_eq!(removal.pruned_edge_ids, vec![edge_id]);
        assert!(service.graph().node(a).is_none());
        assert!(service.graph().edges.is_empty());
        assert!(service.graph().node(b).is_some());
    }

    #[test]
    fn duplicate_node_copies_data_at_offset() {
        let (mut service, a, _) = setup_service();
        service
            .set_node_data(a, serde_json::json!({ "text": "hello" }))
            .unwrap();
        let copy = service.duplicate_node(a).unwrap();

        let original = service.graph().node(a).unwrap();
        let duplicate = service.graph().node(copy).unwrap();
        assert_ne!(duplicate.id, original.id);
        assert_eq!(duplicate.kind, original.kind);
        assert_eq!(duplicate.data, original.data);
        assert_eq!(duplicate.position.x, original.position.x + DUPLICATE_OFFSET);
    }

    #[test]
    fn selection_set_and_clear() {
        let (mut service, a, b) = setup_service();
        service.set_selection(&[a]);
        assert!(service.graph().node(a).unwrap().selected);
        assert!(!service.graph().node(b).unwrap().selected);

        service.clear_selection();
        assert!(service.graph().nodes.values().all(|n| !n.selected));
    }

    #[test]
    fn replace_graph_round_trips_snapshot() {
        let (mut service, a, b) = setup_service();
        service
            .add_edge(PortRef::new(a, "text"), PortRef::new(b, "media"))
            .unwrap();
        let snapshot = service.snapshot();

        let mut other = WorkflowService::new();
        other.replace_graph(snapshot.clone());
        assert_eq!(other.snapshot(), snapshot);
    }
}
