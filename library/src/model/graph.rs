//! The graph value type: id-keyed node and edge sets plus connection
//! validation.

use std::collections::HashMap;

use uuid::Uuid;

use super::edge::{Edge, PortRef};
use super::node::Node;
use super::ports::{self, PortDirection};
use crate::error::GraphError;

/// The pair of id-keyed collections. Order is irrelevant; lookup is O(1).
///
/// The graph itself carries no mutation helpers beyond plain map access — all
/// edits go through [`crate::WorkflowService`] so there is exactly one writer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    pub nodes: HashMap<Uuid, Node>,
    pub edges: HashMap<Uuid, Edge>,
}

impl Graph {
    pub fn node(&self, id: Uuid) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: Uuid) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Edges that reference the given node on either end. Used to prune
    /// dangling edges when a node is deleted.
    pub fn edges_referencing(&self, node_id: Uuid) -> Vec<Uuid> {
        self.edges
            .values()
            .filter(|e| e.references(node_id))
            .map(|e| e.id)
            .collect()
    }

    /// Validate a prospective connection.
    ///
    /// A connection is valid iff both nodes exist, the nodes differ, `from`
    /// names an output port and `to` names an input port. Wrong-direction
    /// attempts are an expected, frequent input; callers drop the error
    /// silently rather than surfacing it.
    pub fn validate_connection(&self, from: &PortRef, to: &PortRef) -> Result<(), GraphError> {
        let source = self
            .nodes
            .get(&from.node)
            .ok_or(GraphError::NodeNotFound(from.node))?;
        let target = self
            .nodes
            .get(&to.node)
            .ok_or(GraphError::NodeNotFound(to.node))?;

        if from.node == to.node {
            return Err(GraphError::SelfConnection(from.node));
        }

        let from_dir =
            ports::port_direction(&source.kind, &from.port).ok_or(GraphError::PortNotFound {
                node: from.node,
                port: from.port.clone(),
            })?;
        let to_dir =
            ports::port_direction(&target.kind, &to.port).ok_or(GraphError::PortNotFound {
                node: to.node,
                port: to.port.clone(),
            })?;

        if from_dir != PortDirection::Output || to_dir != PortDirection::Input {
            return Err(GraphError::InvalidDirection);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::{NodeKind, Position};

    fn setup_graph() -> (Graph, Uuid, Uuid) {
        let mut graph = Graph::default();
        let a = Node::new(NodeKind::TextInput, Position::new(0.0, 0.0));
        let b = Node::new(NodeKind::Preview, Position::new(200.0, 0.0));
        let (a_id, b_id) = (a.id, b.id);
        graph.nodes.insert(a.id, a);
        graph.nodes.insert(b.id, b);
        (graph, a_id, b_id)
    }

    #[test]
    fn output_to_input_is_valid() {
        let (graph, a, b) = setup_graph();
        let from = PortRef::new(a, "text");
        let to = PortRef::new(b, "media");
        assert!(graph.validate_connection(&from, &to).is_ok());
    }

    #[test]
    fn input_to_output_is_rejected() {
        let (graph, a, b) = setup_graph();
        // Reversed gesture: starting at the preview's input.
        let from = PortRef::new(b, "media");
        let to = PortRef::new(a, "text");
        assert!(matches!(
            graph.validate_connection(&from, &to),
            Err(GraphError::InvalidDirection)
        ));
    }

    #[test]
    fn output_to_output_is_rejected() {
        let mut graph = Graph::default();
        let a = Node::new(NodeKind::TextInput, Position::default());
        let b = Node::new(NodeKind::ImageUpload, Position::default());
        let (a_id, b_id) = (a.id, b.id);
        graph.nodes.insert(a.id, a);
        graph.nodes.insert(b.id, b);
        let from = PortRef::new(a_id, "text");
        let to = PortRef::new(b_id, "image");
        assert!(matches!(
            graph.validate_connection(&from, &to),
            Err(GraphError::InvalidDirection)
        ));
    }

    #[test]
    fn generator_output_connects_to_preview_input() {
        let mut graph = Graph::default();
        let generator = Node::new(NodeKind::ImageGenerator, Position::default());
        let preview = Node::new(NodeKind::Preview, Position::new(250.0, 0.0));
        let (gen_id, preview_id) = (generator.id, preview.id);
        graph.nodes.insert(generator.id, generator);
        graph.nodes.insert(preview.id, preview);

        // The generator also has an input named "image"; its output must not
        // be mistaken for it.
        let from = PortRef::new(gen_id, "result");
        let to = PortRef::new(preview_id, "media");
        assert!(graph.validate_connection(&from, &to).is_ok());
    }

    #[test]
    fn same_node_is_rejected_even_with_valid_directions() {
        let mut graph = Graph::default();
        let n = Node::new(NodeKind::ImageGenerator, Position::default());
        let id = n.id;
        graph.nodes.insert(n.id, n);
        // image-generator has a "result" output and a "prompt" input.
        let from = PortRef::new(id, "result");
        let to = PortRef::new(id, "prompt");
        assert!(matches!(
            graph.validate_connection(&from, &to),
            Err(GraphError::SelfConnection(_))
        ));
    }

    #[test]
    fn missing_node_is_rejected() {
        let (graph, a, _) = setup_graph();
        let from = PortRef::new(a, "text");
        let to = PortRef::new(Uuid::new_v4(), "media");
        assert!(matches!(
            graph.validate_connection(&from, &to),
            Err(GraphError::NodeNotFound(_))
        ));
    }

    #[test]
    fn unknown_port_is_rejected() {
        let (graph, a, b) = setup_graph();
        let from = PortRef::new(a, "texture");
        let to = PortRef::new(b, "media");
        assert!(matches!(
            graph.validate_connection(&from, &to),
            Err(GraphError::PortNotFound { .. })
        ));
    }
}
