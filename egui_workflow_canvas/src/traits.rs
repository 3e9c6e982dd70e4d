//! Trait decoupling the canvas from the owner's graph types.

use serde_json::Value;
use uuid::Uuid;

use crate::types::{EdgeView, NodeView, SelectionChange};

/// Read-only data source for the canvas. Handed in each frame; the widget
/// never mutates it, only emits change intents.
pub trait CanvasDataSource {
    /// Ids of every node to draw. Order does not matter.
    fn node_ids(&self) -> Vec<Uuid>;

    /// Display information for a node. Only consulted when the node's
    /// projection (selection, drag flag, position, data) has changed since
    /// the cached view was built.
    fn node_view(&self, id: Uuid) -> Option<NodeView>;

    /// Node position in graph coordinates.
    fn node_position(&self, id: Uuid) -> Option<egui::Pos2>;

    fn node_selected(&self, id: Uuid) -> bool;

    fn node_dragging(&self, id: Uuid) -> bool;

    /// The node's opaque payload, compared for equality to decide whether a
    /// cached view must be rebuilt.
    fn node_data(&self, id: Uuid) -> Value;

    /// All edges in the current graph.
    fn edges(&self) -> Vec<EdgeView>;
}

/// Mutation interface the owner implements to apply [`crate::PendingActions`].
///
/// Every method is an intent, not a guarantee: the owner validates again and
/// may refuse (errors are logged, never surfaced as UI faults).
pub trait CanvasMutator {
    /// Add a node of the given kind. `position` is in graph coordinates;
    /// `None` lets the owner pick a placement (palette adds).
    fn add_node(&mut self, kind_id: &str, position: Option<egui::Pos2>) -> Result<Uuid, String>;

    fn remove_node(&mut self, node_id: Uuid) -> Result<(), String>;

    fn move_node(&mut self, node_id: Uuid, position: egui::Pos2) -> Result<(), String>;

    fn set_dragging(&mut self, node_id: Uuid, dragging: bool);

    fn add_edge(
        &mut self,
        from_node: Uuid,
        from_port: &str,
        to_node: Uuid,
        to_port: &str,
    ) -> Result<(), String>;

    fn remove_edge(&mut self, edge_id: Uuid) -> Result<(), String>;

    fn set_selection(&mut self, change: &SelectionChange);
}
