//! Adapters connecting library types to the canvas traits.
//!
//! The canvas reads the graph through [`ServiceDataSource`] and the app
//! applies its pending actions through [`ServiceMutator`]. All validation
//! lives in the service; rejected intents are logged and dropped.

use egui::Pos2;
use egui_workflow_canvas::{
    CanvasDataSource, CanvasMutator, EdgeView, NodeView, PortView, SelectionChange,
};
use library::model::ports::{self, PortDirection};
use library::{NodeKind, PortRef, Position, WorkflowService};
use serde_json::Value;
use uuid::Uuid;

/// Read-only data source backed by the service's graph.
pub struct ServiceDataSource<'a> {
    pub service: &'a WorkflowService,
}

impl CanvasDataSource for ServiceDataSource<'_> {
    fn node_ids(&self) -> Vec<Uuid> {
        self.service.graph().nodes.keys().copied().collect()
    }

    fn node_view(&self, id: Uuid) -> Option<NodeView> {
        let node = self.service.graph().node(id)?;
        let ports = ports::ports_for(&node.kind)
            .iter()
            .map(|spec| match spec.direction {
                PortDirection::Input => PortView::input(spec.name, spec.display_name),
                PortDirection::Output => PortView::output(spec.name, spec.display_name),
            })
            .collect();
        Some(NodeView {
            kind_id: node.kind.as_str().to_string(),
            title: node.kind.display_name().to_string(),
            ports,
        })
    }

    fn node_position(&self, id: Uuid) -> Option<Pos2> {
        let node = self.service.graph().node(id)?;
        Some(Pos2::new(node.position.x, node.position.y))
    }

    fn node_selected(&self, id: Uuid) -> bool {
        self.service.graph().node(id).is_some_and(|n| n.selected)
    }

    fn node_dragging(&self, id: Uuid) -> bool {
        self.service.graph().node(id).is_some_and(|n| n.dragging)
    }

    fn node_data(&self, id: Uuid) -> Value {
        self.service
            .graph()
            .node(id)
            .map(|n| n.data.clone())
            .unwrap_or(Value::Null)
    }

    fn edges(&self) -> Vec<EdgeView> {
        self.service
            .graph()
            .edges
            .values()
            .map(|e| EdgeView {
                id: e.id,
                from_node: e.source.node,
                from_port: e.source.port.clone(),
                to_node: e.target.node,
                to_port: e.target.port.clone(),
            })
            .collect()
    }
}

/// Mutation adapter backed by the service.
pub struct ServiceMutator<'a> {
    pub service: &'a mut WorkflowService,
    /// Placement for palette adds that carry no position (viewport center).
    pub fallback_position: Position,
}

impl CanvasMutator for ServiceMutator<'_> {
    fn add_node(&mut self, kind_id: &str, position: Option<Pos2>) -> Result<Uuid, String> {
        let kind = NodeKind::from(kind_id.to_string());
        if matches!(kind, NodeKind::Unknown(_)) {
            return Err(format!("unknown node kind '{kind_id}'"));
        }
        let position = position
            .map(|p| Position::new(p.x, p.y))
            .unwrap_or(self.fallback_position);
        Ok(self.service.add_node(kind, position))
    }

    fn remove_node(&mut self, node_id: Uuid) -> Result<(), String> {
        self.service
            .remove_node(node_id)
            .map(|removal| {
                log::debug!(
                    "node {} removed, {} dependent edge(s) pruned",
                    removal.node_id,
                    removal.pruned_edge_ids.len()
                );
            })
            .map_err(|e| e.to_string())
    }

    fn move_node(&mut self, node_id: Uuid, position: Pos2) -> Result<(), String> {
        self.service
            .move_node(node_id, Position::new(position.x, position.y))
            .map_err(|e| e.to_string())
    }

    fn set_dragging(&mut self, node_id: Uuid, dragging: bool) {
        self.service.set_dragging(node_id, dragging);
    }

    fn add_edge(
        &mut self,
        from_node: Uuid,
        from_port: &str,
        to_node: Uuid,
        to_port: &str,
    ) -> Result<(), String> {
        self.service
            .add_edge(
                PortRef::new(from_node, from_port),
                PortRef::new(to_node, to_port),
            )
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn remove_edge(&mut self, edge_id: Uuid) -> Result<(), String> {
        self.service.remove_edge(edge_id).map_err(|e| e.to_string())
    }

    fn set_selection(&mut self, change: &SelectionChange) {
        match change {
            SelectionChange::Select(ids) => self.service.set_selection(ids),
            SelectionChange::Clear => self.service.clear_selection(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui_workflow_canvas::PendingActions;

    fn setup() -> (WorkflowService, Uuid, Uuid) {
        let mut service = WorkflowService::new();
        let a = service.add_node(NodeKind::TextInput, Position::new(0.0, 0.0));
        let b = service.add_node(NodeKind::Preview, Position::new(200.0, 0.0));
        (service, a, b)
    }

    fn mutator(service: &mut WorkflowService) -> ServiceMutator<'_> {
        ServiceMutator {
            service,
            fallback_position: Position::new(100.0, 100.0),
        }
    }

    #[test]
    fn connect_intent_is_applied() {
        let (mut service, a, b) = setup();
        let pending = PendingActions {
            edges_to_add: vec![(a, "text".into(), b, "media".into())],
            ..Default::default()
        };
        pending.apply(&mut mutator(&mut service));
        assert_eq!(service.graph().edges.len(), 1);
    }

    #[test]
    fn invalid_connect_intent_is_dropped_silently() {
        let (mut service, a, b) = setup();
        // Input-to-output, as emitted by nothing sane; the owner still
        // refuses it.
        let pending = PendingActions {
            edges_to_add: vec![(b, "media".into(), a, "text".into())],
            ..Default::default()
        };
        pending.apply(&mut mutator(&mut service));
        assert!(service.graph().edges.is_empty());
    }

    #[test]
    fn pane_click_clear_deselects_every_node() {
        let (mut service, a, _) = setup();
        service.set_selection(&[a]);
        assert!(service.graph().node(a).unwrap().selected);

        let pending = PendingActions {
            selection: Some(SelectionChange::Clear),
            ..Default::default()
        };
        pending.apply(&mut mutator(&mut service));
        assert!(service.graph().nodes.values().all(|n| !n.selected));
    }

    #[test]
    fn palette_add_without_position_uses_the_fallback() {
        let (mut service, _, _) = setup();
        let pending = PendingActions {
            nodes_to_add: vec![("assistant".into(), None)],
            ..Default::default()
        };
        pending.apply(&mut mutator(&mut service));
        let added = service
            .graph()
            .nodes
            .values()
            .find(|n| n.kind == NodeKind::Assistant)
            .unwrap();
        assert_eq!(added.position, Position::new(100.0, 100.0));
    }

    #[test]
    fn unknown_kind_add_is_rejected() {
        let (mut service, _, _) = setup();
        let before = service.graph().nodes.len();
        let pending = PendingActions {
            nodes_to_add: vec![("lora-trainer".into(), None)],
            ..Default::default()
        };
        pending.apply(&mut mutator(&mut service));
        assert_eq!(service.graph().nodes.len(), before);
    }

    #[test]
    fn data_source_exposes_declared_ports() {
        let (service, a, _) = setup();
        let source = ServiceDataSource { service: &service };
        let view = source.node_view(a).unwrap();
        assert_eq!(view.kind_id, "text");
        assert_eq!(view.ports.len(), 1);
        assert!(view.ports[0].is_output);
    }
}
