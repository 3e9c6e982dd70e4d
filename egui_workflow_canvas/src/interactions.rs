//! Interaction handling for the canvas: drag gating, connection gestures,
//! selection, and deletion. Every handler only records intents in
//! [`PendingActions`] or adjusts transient UI state; the graph is never
//! touched here.

use egui::{self, Pos2, Rect};
use uuid::Uuid;

use crate::callbacks::CallbackCell;
use crate::edge::{EDGE_HIT_WIDTH, distance_to_polyline};
use crate::state::{CanvasState, ConnectingState, DragState, NodeMenuState};
use crate::types::SelectionChange;
use crate::widget::{EdgePath, NodeHit, PendingActions, PortScreen};

/// Context passed to interaction handlers.
pub(crate) struct InteractionContext<'a> {
    pub ui: &'a egui::Ui,
    pub canvas_response: &'a egui::Response,
    /// Draw-order node records; `.rev()` visits topmost first.
    pub nodes: &'a [NodeHit],
    pub port_screens: &'a [PortScreen],
    pub edge_paths: &'a [EdgePath],
    /// Midpoint delete buttons of selected edges.
    pub delete_buttons: &'a [(Uuid, Rect)],
    pub callbacks: &'a CallbackCell,
    pub zoom: f32,
    pub hit_radius: f32,
}

pub(crate) fn handle_interactions(
    state: &mut CanvasState,
    ctx: &InteractionContext,
) -> PendingActions {
    let mut pending = PendingActions::default();
    let pointer_pos = ctx.ui.input(|i| i.pointer.hover_pos());

    handle_arm_on_press(state, ctx, pointer_pos);
    handle_drag_cancel(state, ctx, &mut pending);
    handle_active_drag(state, ctx, &mut pending);
    handle_drag_stop(state, ctx, pointer_pos, &mut pending);
    handle_drag_start(state, ctx, pointer_pos, &mut pending);
    handle_connecting_update(state, pointer_pos);
    handle_edge_hover(state, ctx, pointer_pos);
    handle_single_click(state, ctx, pointer_pos, &mut pending);
    handle_right_click(state, ctx, pointer_pos);
    render_node_menu(state, ctx);
    handle_delete_key(state, ctx, &mut pending);

    pending
}

// ---------------------------------------------------------------------------
// Hit-testing helpers
// ---------------------------------------------------------------------------

/// Find the closest port within hit_radius of pos.
pub(crate) fn find_nearest_port<'a>(
    port_screens: &'a [PortScreen],
    pos: Pos2,
    hit_radius: f32,
    exclude_node: Option<Uuid>,
    require_output: Option<bool>,
) -> Option<&'a PortScreen> {
    let mut best: Option<(f32, &PortScreen)> = None;
    for ps in port_screens {
        if exclude_node == Some(ps.node_id) {
            continue;
        }
        if let Some(req) = require_output {
            if ps.is_output != req {
                continue;
            }
        }
        let d = pos.distance(ps.pos);
        if d < hit_radius && best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, ps));
        }
    }
    best.map(|(_, ps)| ps)
}

fn topmost_node_at(nodes: &[NodeHit], pos: Pos2) -> Option<&NodeHit> {
    nodes.iter().rev().find(|n| n.rect.contains(pos))
}

fn edge_at(edge_paths: &[EdgePath], pos: Pos2) -> Option<Uuid> {
    let mut best: Option<(f32, Uuid)> = None;
    for ep in edge_paths {
        let d = distance_to_polyline(pos, &ep.path);
        if d <= EDGE_HIT_WIDTH / 2.0 && best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, ep.id));
        }
    }
    best.map(|(_, id)| id)
}

// ---------------------------------------------------------------------------
// Individual interaction handlers
// ---------------------------------------------------------------------------

/// Pointer-down on a node header arms the drag gate for that node. Nothing
/// else arms it, so gestures starting inside node bodies can never move the
/// node.
fn handle_arm_on_press(
    state: &mut CanvasState,
    ctx: &InteractionContext,
    pointer_pos: Option<Pos2>,
) {
    if !ctx.ui.input(|i| i.pointer.primary_pressed()) {
        return;
    }
    let Some(pos) = pointer_pos else { return };
    if let Some(node) = topmost_node_at(ctx.nodes, pos) {
        if node.header_rect.contains(pos) {
            state.drag_gate.arm(node.id);
            ctx.callbacks.mark_draggable(node.id);
        }
    }
}

/// Escape cancels an in-flight gesture: a drag snaps the node back to its
/// pre-gesture position, a pending connection is dropped without any intent.
fn handle_drag_cancel(
    state: &mut CanvasState,
    ctx: &InteractionContext,
    pending: &mut PendingActions,
) {
    if !ctx.ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        return;
    }
    if let Some(drag) = state.dragging.take() {
        pending.nodes_moved.push((drag.node_id, drag.start_position));
        pending.drag_flag_changes.push((drag.node_id, false));
        state.drag_gate.disarm();
    }
    state.connecting = None;
}

fn handle_active_drag(
    state: &mut CanvasState,
    ctx: &InteractionContext,
    pending: &mut PendingActions,
) {
    if !ctx.canvas_response.dragged_by(egui::PointerButton::Primary) {
        return;
    }
    let delta = ctx.canvas_response.drag_delta();
    if delta == egui::Vec2::ZERO {
        return;
    }
    if let Some(drag) = &state.dragging {
        if let Some(node) = ctx.nodes.iter().find(|n| n.id == drag.node_id) {
            let new_pos = node.graph_pos + delta / ctx.zoom;
            pending.nodes_moved.push((drag.node_id, new_pos));
        }
    }
}

fn handle_drag_stop(
    state: &mut CanvasState,
    ctx: &InteractionContext,
    pointer_pos: Option<Pos2>,
    pending: &mut PendingActions,
) {
    if !ctx
        .canvas_response
        .drag_stopped_by(egui::PointerButton::Primary)
    {
        return;
    }

    // Finish a pending connection. Only an output-to-input release across
    // two distinct nodes emits an intent; every other release cancels the
    // gesture silently with no graph effect.
    if let Some(connecting) = state.connecting.take() {
        if connecting.is_output {
            if let Some(pos) = pointer_pos {
                let target = find_nearest_port(
                    ctx.port_screens,
                    pos,
                    ctx.hit_radius,
                    Some(connecting.from_node),
                    Some(false),
                );
                if let Some(target) = target {
                    pending.edges_to_add.push((
                        connecting.from_node,
                        connecting.from_port,
                        target.node_id,
                        target.name.clone(),
                    ));
                }
            }
        }
    }

    if let Some(drag) = state.dragging.take() {
        pending.drag_flag_changes.push((drag.node_id, false));
    }
    // Disarm on every drag-stop, whatever the gesture was.
    state.drag_gate.disarm();
}

fn handle_drag_start(
    state: &mut CanvasState,
    ctx: &InteractionContext,
    pointer_pos: Option<Pos2>,
    pending: &mut PendingActions,
) {
    if !ctx
        .canvas_response
        .drag_started_by(egui::PointerButton::Primary)
    {
        return;
    }
    let Some(pos) = pointer_pos else { return };
    if state.locked {
        return;
    }

    // 1. Port hit starts a connection gesture.
    if let Some(ps) = find_nearest_port(ctx.port_screens, pos, ctx.hit_radius, None, None) {
        state.connecting = Some(ConnectingState {
            from_node: ps.node_id,
            from_port: ps.name.clone(),
            is_output: ps.is_output,
            mouse_pos: pos,
        });
        return;
    }

    // 2. Node hit: the gate decides. Only a gesture that armed this node on
    // its header may move it; anything else leaves the position untouched.
    if let Some(node) = topmost_node_at(ctx.nodes, pos) {
        if state.drag_gate.permits(node.id) {
            pending.selection = Some(SelectionChange::Select(vec![node.id]));
            state.selected_edges.clear();
            pending.drag_flag_changes.push((node.id, true));
            state.dragging = Some(DragState {
                node_id: node.id,
                start_position: node.graph_pos,
            });
        }
    }
}

fn handle_connecting_update(state: &mut CanvasState, pointer_pos: Option<Pos2>) {
    if let Some(connecting) = &mut state.connecting {
        if let Some(pos) = pointer_pos {
            connecting.mouse_pos = pos;
        }
    }
}

fn handle_edge_hover(state: &mut CanvasState, ctx: &InteractionContext, pointer_pos: Option<Pos2>) {
    state.hovered_edge = match pointer_pos {
        // Nodes occlude edges: a pointer over a node hovers no edge.
        Some(pos) if topmost_node_at(ctx.nodes, pos).is_none() => edge_at(ctx.edge_paths, pos),
        _ => None,
    };
}

fn handle_single_click(
    state: &mut CanvasState,
    ctx: &InteractionContext,
    pointer_pos: Option<Pos2>,
    pending: &mut PendingActions,
) {
    if !ctx.canvas_response.clicked() {
        return;
    }
    let Some(pos) = pointer_pos else { return };

    // Edge delete buttons sit on top of everything; a hit consumes the click
    // so the pane-deselect below never fires for the same press.
    for (edge_id, rect) in ctx.delete_buttons {
        if rect.contains(pos) {
            if !state.locked {
                pending.edges_to_remove.push(*edge_id);
                state.selected_edges.remove(edge_id);
            }
            return;
        }
    }

    if let Some(node) = topmost_node_at(ctx.nodes, pos) {
        pending.selection = Some(SelectionChange::Select(vec![node.id]));
        state.selected_edges.clear();
        state.node_menu = None;
        return;
    }

    if let Some(edge_id) = edge_at(ctx.edge_paths, pos) {
        state.selected_edges.clear();
        state.selected_edges.insert(edge_id);
        pending.selection = Some(SelectionChange::Clear);
        state.node_menu = None;
        return;
    }

    // Pane click: deselect everything.
    pending.selection = Some(SelectionChange::Clear);
    state.selected_edges.clear();
    state.node_menu = None;
}

fn handle_right_click(state: &mut CanvasState, ctx: &InteractionContext, pointer_pos: Option<Pos2>) {
    if !ctx.canvas_response.secondary_clicked() {
        return;
    }
    let Some(pos) = pointer_pos else { return };
    state.node_menu = topmost_node_at(ctx.nodes, pos).map(|node| NodeMenuState {
        screen_pos: pos,
        node_id: node.id,
    });
}

/// Node context menu: run / duplicate / delete, dispatched through the
/// callback cell so the hooks in use are always the owner's latest.
fn render_node_menu(state: &mut CanvasState, ctx: &InteractionContext) {
    let Some(menu) = state.node_menu.clone() else {
        return;
    };

    let mut close = false;
    let popup_id = ctx.ui.make_persistent_id("workflow_canvas_node_menu");
    egui::Area::new(popup_id)
        .order(egui::Order::Foreground)
        .fixed_pos(menu.screen_pos)
        .show(ctx.ui.ctx(), |ui| {
            egui::Frame::menu(ui.style()).show(ui, |ui| {
                ui.set_max_width(160.0);
                if ui.button("Run").clicked() {
                    ctx.callbacks.run(menu.node_id);
                    close = true;
                }
                if !state.locked {
                    if ui.button("Duplicate").clicked() {
                        ctx.callbacks.duplicate(menu.node_id);
                        close = true;
                    }
                    if ui.button("Delete").clicked() {
                        ctx.callbacks.delete(menu.node_id);
                        close = true;
                    }
                }
            });
        });
    if close || ctx.ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        state.node_menu = None;
    }
}

fn handle_delete_key(
    state: &mut CanvasState,
    ctx: &InteractionContext,
    pending: &mut PendingActions,
) {
    if state.locked {
        return;
    }
    if ctx
        .ui
        .input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace))
    {
        for node in ctx.nodes {
            if node.selected {
                pending.nodes_to_remove.push(node.id);
            }
        }
        pending.edges_to_remove.extend(state.selected_edges.drain());
    }
}
