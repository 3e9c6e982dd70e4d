//! Main workflow canvas widget.

use std::collections::HashMap;
use std::rc::Rc;

use egui::{self, Pos2, Rect, Stroke, Vec2};
use uuid::Uuid;

use crate::callbacks::CallbackCell;
use crate::drawing::draw_grid;
use crate::edge::{
    self, EDGE_HIT_WIDTH, delete_button_rect, draw_edge_path, edge_visual, path_midpoint,
    smooth_step_path,
};
use crate::interactions::{self, InteractionContext};
use crate::node_rendering::{self, BodyContext, NodeRegistry};
use crate::state::CanvasState;
use crate::theme::CanvasTheme;
use crate::traits::{CanvasDataSource, CanvasMutator};
use crate::types::SelectionChange;
use crate::viewport::{FitAnimation, Viewport};

// ---------------------------------------------------------------------------
// PendingActions
// ---------------------------------------------------------------------------

/// Change intents collected during the render phase, applied by the owner
/// afterwards. The widget never mutates the graph it was shown.
#[derive(Default)]
pub struct PendingActions {
    /// (kind_id, graph position). `None` position means the owner places it.
    pub nodes_to_add: Vec<(String, Option<Pos2>)>,
    pub nodes_to_remove: Vec<Uuid>,
    /// (node_id, new graph position) while a permitted drag is in progress.
    pub nodes_moved: Vec<(Uuid, Pos2)>,
    /// Transient dragging flag transitions.
    pub drag_flag_changes: Vec<(Uuid, bool)>,
    /// (from_node, from_port, to_node, to_port) — already direction-checked.
    pub edges_to_add: Vec<(Uuid, String, Uuid, String)>,
    pub edges_to_remove: Vec<Uuid>,
    pub selection: Option<SelectionChange>,
    pub undo_requested: bool,
    pub redo_requested: bool,
}

impl PendingActions {
    pub fn apply(self, mutator: &mut dyn CanvasMutator) {
        if let Some(change) = &self.selection {
            mutator.set_selection(change);
        }
        for (node_id, dragging) in self.drag_flag_changes {
            mutator.set_dragging(node_id, dragging);
        }
        for (node_id, position) in self.nodes_moved {
            if let Err(err) = mutator.move_node(node_id, position) {
                log::debug!("move rejected: {err}");
            }
        }
        for edge_id in self.edges_to_remove {
            if let Err(err) = mutator.remove_edge(edge_id) {
                log::debug!("edge removal rejected: {err}");
            }
        }
        for (from_node, from_port, to_node, to_port) in self.edges_to_add {
            if let Err(err) = mutator.add_edge(from_node, &from_port, to_node, &to_port) {
                log::debug!("connection rejected: {err}");
            }
        }
        for node_id in self.nodes_to_remove {
            if let Err(err) = mutator.remove_node(node_id) {
                log::debug!("node removal rejected: {err}");
            }
        }
        for (kind_id, position) in self.nodes_to_add {
            if let Err(err) = mutator.add_node(&kind_id, position) {
                log::debug!("node add rejected: {err}");
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes_to_add.is_empty()
            && self.nodes_to_remove.is_empty()
            && self.nodes_moved.is_empty()
            && self.drag_flag_changes.is_empty()
            && self.edges_to_add.is_empty()
            && self.edges_to_remove.is_empty()
            && self.selection.is_none()
            && !self.undo_requested
            && !self.redo_requested
    }
}

// ---------------------------------------------------------------------------
// Hit-testing records collected while drawing
// ---------------------------------------------------------------------------

/// Screen position of a rendered port.
pub struct PortScreen {
    pub pos: Pos2,
    pub node_id: Uuid,
    pub name: String,
    pub is_output: bool,
}

pub(crate) struct NodeHit {
    pub id: Uuid,
    pub rect: Rect,
    pub header_rect: Rect,
    pub graph_pos: Pos2,
    pub selected: bool,
}

pub(crate) struct EdgePath {
    pub id: Uuid,
    pub path: Vec<Pos2>,
}

// ---------------------------------------------------------------------------
// WorkflowCanvas
// ---------------------------------------------------------------------------

pub struct WorkflowCanvas<'a> {
    state: &'a mut CanvasState,
    theme: &'a CanvasTheme,
}

impl<'a> WorkflowCanvas<'a> {
    pub fn new(state: &'a mut CanvasState, theme: &'a CanvasTheme) -> Self {
        Self { state, theme }
    }

    /// Show the canvas. Returns the change intents for the owner to apply.
    ///
    /// `callbacks` seeds the body renderer registry on the first call; the
    /// registry is never rebuilt afterwards, so swapping the callbacks inside
    /// the cell never remounts node renderers.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        source: &dyn CanvasDataSource,
        callbacks: &CallbackCell,
    ) -> PendingActions {
        if self.state.viewport.zoom <= 0.0 {
            self.state.viewport = Viewport::default();
        }
        let registry = self
            .state
            .registry
            .get_or_insert_with(|| Rc::new(NodeRegistry::builtin(callbacks.clone())))
            .clone();

        let available = ui.available_rect_before_wrap();
        let (canvas_response, painter) =
            ui.allocate_painter(available.size(), egui::Sense::click_and_drag());
        let canvas_rect = canvas_response.rect;

        // Advance the fit animation before anything is placed.
        let now = ui.input(|i| i.time);
        if let Some(anim) = self.state.fit_animation {
            let (viewport, done) = anim.sample(now);
            self.state.viewport = viewport;
            if done {
                self.state.fit_animation = None;
            } else {
                ui.ctx().request_repaint();
            }
        }

        // Zoom via scroll wheel, anchored at the cursor.
        if let Some(hover) = ui.input(|i| i.pointer.hover_pos()) {
            if canvas_rect.contains(hover) {
                let scroll = ui.input(|i| i.smooth_scroll_delta.y);
                if scroll != 0.0 {
                    let new_zoom = self.state.viewport.zoom * (1.0 + scroll * 0.002);
                    self.state
                        .viewport
                        .zoom_at(hover - canvas_rect.min, new_zoom);
                    self.state.fit_animation = None;
                }
            }
        }

        // Panning (viewport only, graph untouched).
        if canvas_response.dragged_by(egui::PointerButton::Middle) {
            self.state.viewport.pan += canvas_response.drag_delta();
            self.state.fit_animation = None;
        }
        let zoom = self.state.viewport.zoom;

        painter.rect_filled(canvas_rect, 0.0, self.theme.background_color);
        draw_grid(
            &painter,
            canvas_rect,
            self.state.viewport.pan,
            self.theme.grid_color,
            self.theme.grid_spacing * zoom,
        );

        // ---- Phase 1: nodes ----
        let node_ids = source.node_ids();
        self.state.prune_cache(&node_ids);

        let mut port_screens: Vec<PortScreen> = Vec::new();
        let mut node_hits: Vec<NodeHit> = Vec::new();

        for &id in &node_ids {
            let Some(view) = self.state.view_for(source, id) else {
                continue;
            };
            let Some(graph_pos) = source.node_position(id) else {
                continue;
            };
            let screen_pos = self.state.viewport.graph_to_screen(canvas_rect.min, graph_pos);
            let layout = node_rendering::layout_node(self.theme, &view, screen_pos, zoom);
            let selected = source.node_selected(id);
            let renderer = registry.renderer(&view.kind_id);
            let is_placeholder = renderer.is_none();
            if is_placeholder && self.state.warned_kinds.insert(view.kind_id.clone()) {
                log::warn!("no renderer registered for node kind '{}'", view.kind_id);
            }

            node_rendering::draw_node_chrome(
                &painter,
                &layout,
                self.theme,
                &view.kind_id,
                &view.title,
                selected,
                is_placeholder,
                zoom,
            );
            node_rendering::draw_ports(
                &painter,
                &layout,
                self.theme,
                &view.kind_id,
                id,
                &view.ports,
                zoom,
                &mut port_screens,
            );
            match renderer {
                Some(render_body) => {
                    let data = source.node_data(id);
                    let body = BodyContext {
                        node_id: id,
                        rect: layout.body_rect.intersect(canvas_rect),
                        data: &data,
                        zoom,
                        text_color: self.theme.body_text_color,
                    };
                    if body.rect.is_positive() {
                        render_body(ui, &body);
                    }
                }
                None => {
                    painter.text(
                        layout.body_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "unsupported node",
                        egui::FontId::proportional(10.0 * zoom),
                        self.theme.body_text_color,
                    );
                }
            }

            node_hits.push(NodeHit {
                id,
                rect: layout.node_rect,
                header_rect: layout.header_rect,
                graph_pos,
                selected,
            });
        }

        // ---- Phase 2: edges ----
        let port_pos_map: HashMap<(Uuid, &str, bool), Pos2> = port_screens
            .iter()
            .map(|p| ((p.node_id, p.name.as_str(), p.is_output), p.pos))
            .collect();

        let mut edge_paths: Vec<EdgePath> = Vec::new();
        let mut delete_buttons: Vec<(Uuid, Rect)> = Vec::new();

        for conn in source.edges() {
            let from = port_pos_map.get(&(conn.from_node, conn.from_port.as_str(), true));
            let to = port_pos_map.get(&(conn.to_node, conn.to_port.as_str(), false));
            // Endpoint geometry unavailable: degrade to not drawing.
            let (Some(&from_pos), Some(&to_pos)) = (from, to) else {
                continue;
            };
            let path = smooth_step_path(from_pos, to_pos, zoom);
            let selected = self.state.selected_edges.contains(&conn.id);
            let hovered = self.state.hovered_edge == Some(conn.id);
            let visual = edge_visual(selected, hovered);
            draw_edge_path(&painter, &path, visual.stroke(self.theme, zoom), zoom);

            if selected {
                let rect = delete_button_rect(path_midpoint(&path), zoom);
                painter.circle_filled(rect.center(), rect.width() / 2.0, self.theme.edge_delete_color);
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "\u{00D7}",
                    egui::FontId::proportional(11.0 * zoom),
                    egui::Color32::WHITE,
                );
                delete_buttons.push((conn.id, rect));
            }
            edge_paths.push(EdgePath {
                id: conn.id,
                path,
            });
        }

        // Pending connection line.
        if let Some(connecting) = &self.state.connecting {
            let start = port_pos_map.get(&(
                connecting.from_node,
                connecting.from_port.as_str(),
                connecting.is_output,
            ));
            if let Some(&start_pos) = start {
                let path = smooth_step_path(start_pos, connecting.mouse_pos, zoom);
                for seg in path.windows(2) {
                    painter.line_segment(
                        [seg[0], seg[1]],
                        Stroke::new(1.5 * zoom, self.theme.connecting_color),
                    );
                }
            }
        }

        // ---- Phase 3: interactions ----
        let mut pending = {
            let ctx = InteractionContext {
                ui,
                canvas_response: &canvas_response,
                nodes: &node_hits,
                port_screens: &port_screens,
                edge_paths: &edge_paths,
                delete_buttons: &delete_buttons,
                callbacks: registry.callbacks(),
                zoom,
                hit_radius: (self.theme.port_radius * 3.0 * zoom).max(EDGE_HIT_WIDTH / 2.0),
            };
            interactions::handle_interactions(self.state, &ctx)
        };

        // ---- Phase 4: controls overlay ----
        self.controls_overlay(ui, canvas_rect, source, &mut pending);

        pending
    }

    /// Zoom / fit / lock / undo-redo controls in the canvas corner. Pure
    /// viewport and mode operations; undo/redo are forwarded to the owner.
    fn controls_overlay(
        &mut self,
        ui: &mut egui::Ui,
        canvas_rect: Rect,
        source: &dyn CanvasDataSource,
        pending: &mut PendingActions,
    ) {
        let overlay_id = ui.make_persistent_id("workflow_canvas_controls");
        egui::Area::new(overlay_id)
            .order(egui::Order::Foreground)
            .fixed_pos(canvas_rect.min + Vec2::new(8.0, 8.0))
            .show(ui.ctx(), |ui| {
                egui::Frame::menu(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.small_button("\u{2795}").on_hover_text("Zoom in").clicked() {
                            self.state.viewport.zoom_in(canvas_rect.size());
                            self.state.fit_animation = None;
                        }
                        if ui.small_button("\u{2796}").on_hover_text("Zoom out").clicked() {
                            self.state.viewport.zoom_out(canvas_rect.size());
                            self.state.fit_animation = None;
                        }
                        if ui.small_button("\u{2922}").on_hover_text("Fit view").clicked() {
                            if let Some(extent) = self.node_extent(source) {
                                let target = Viewport::fitting(extent, canvas_rect.size());
                                self.state.fit_animation = Some(FitAnimation::new(
                                    self.state.viewport,
                                    target,
                                    ui.input(|i| i.time),
                                ));
                            }
                        }
                        let lock_icon = if self.state.locked { "\u{1F512}" } else { "\u{1F513}" };
                        if ui
                            .small_button(lock_icon)
                            .on_hover_text("Toggle lock")
                            .clicked()
                        {
                            self.state.locked = !self.state.locked;
                        }
                        ui.separator();
                        if ui.small_button("\u{21B6}").on_hover_text("Undo").clicked() {
                            pending.undo_requested = true;
                        }
                        if ui.small_button("\u{21B7}").on_hover_text("Redo").clicked() {
                            pending.redo_requested = true;
                        }
                    });
                });
            });
    }

    /// Bounding rect of every node in graph coordinates.
    fn node_extent(&mut self, source: &dyn CanvasDataSource) -> Option<Rect> {
        let mut extent: Option<Rect> = None;
        for id in source.node_ids() {
            let Some(view) = self.state.view_for(source, id) else {
                continue;
            };
            let Some(pos) = source.node_position(id) else {
                continue;
            };
            let rect = Rect::from_min_size(pos, node_rendering::node_size(self.theme, &view));
            extent = Some(match extent {
                Some(e) => e.union(rect),
                None => rect,
            });
        }
        extent
    }
}
