//! UI state for the canvas.
//!
//! Everything here is transient interaction state; the graph itself is owned
//! by the host and only read through [`crate::CanvasDataSource`].

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use uuid::Uuid;

use crate::drag_gate::DragGate;
use crate::node_rendering::{CachedNodeView, NodeProjection, NodeRegistry};
use crate::traits::CanvasDataSource;
use crate::types::NodeView;
use crate::viewport::{FitAnimation, Viewport};

#[derive(Default)]
pub struct CanvasState {
    /// Pan/zoom of the canvas.
    pub viewport: Viewport,
    /// In-flight fit-to-extent animation.
    pub fit_animation: Option<FitAnimation>,
    /// Drag permission gate (armed on header pointer-down).
    pub drag_gate: DragGate,
    /// Node drag in progress.
    pub dragging: Option<DragState>,
    /// Connection gesture in progress.
    pub connecting: Option<ConnectingState>,
    /// Edge currently under the pointer.
    pub hovered_edge: Option<Uuid>,
    /// Currently selected edges.
    pub selected_edges: HashSet<Uuid>,
    /// Lock mode: structural mutation affordances are disabled, nothing is
    /// destroyed.
    pub locked: bool,
    /// Node context menu (right-click on a node).
    pub node_menu: Option<NodeMenuState>,
    /// Node body renderer registry, built once on first show.
    pub(crate) registry: Option<Rc<NodeRegistry>>,
    /// Per-node view cache keyed on the five-field projection.
    pub(crate) render_cache: HashMap<Uuid, CachedNodeView>,
    /// Kinds already warned about as unknown, to log once per kind.
    pub(crate) warned_kinds: HashSet<String>,
}

pub struct DragState {
    pub node_id: Uuid,
    /// Position before the gesture, for cancelled drags.
    pub start_position: egui::Pos2,
}

pub struct ConnectingState {
    pub from_node: Uuid,
    pub from_port: String,
    pub is_output: bool,
    pub mouse_pos: egui::Pos2,
}

#[derive(Clone)]
pub struct NodeMenuState {
    pub screen_pos: egui::Pos2,
    pub node_id: Uuid,
}

impl CanvasState {
    /// Fetch a node's display view, reusing the cached one unless the node's
    /// projection (selection, drag flag, position, data) has changed.
    /// Incidental changes outside the projection never rebuild the view.
    pub(crate) fn view_for(
        &mut self,
        source: &dyn CanvasDataSource,
        id: Uuid,
    ) -> Option<NodeView> {
        let projection = NodeProjection {
            selected: source.node_selected(id),
            dragging: source.node_dragging(id),
            position: source.node_position(id)?,
            data: source.node_data(id),
        };
        if let Some(cached) = self.render_cache.get(&id) {
            if cached.projection == projection {
                return Some(cached.view.clone());
            }
        }
        let view = source.node_view(id)?;
        self.render_cache.insert(
            id,
            CachedNodeView {
                projection,
                view: view.clone(),
            },
        );
        Some(view)
    }

    /// Drop cache entries for nodes that no longer exist.
    pub(crate) fn prune_cache(&mut self, live: &[Uuid]) {
        self.render_cache.retain(|id, _| live.contains(id));
    }
}
