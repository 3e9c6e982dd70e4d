//! Application shell: owns the graph, wires the canvas, applies intents.

use std::cell::RefCell;
use std::rc::Rc;

use egui_workflow_canvas::{
    CallbackCell, CanvasCallbacks, CanvasState, CanvasTheme, NodeKindInfo, PendingActions,
    WorkflowCanvas, palette,
};
use library::{NodeKind, Position, WorkflowService};
use serde_json::Value;
use uuid::Uuid;

use crate::adapter::{ServiceDataSource, ServiceMutator};
use crate::persistence;
use crate::undo::UndoHistory;

/// Node lifecycle events queued by the canvas callbacks during a frame and
/// applied to the service afterwards, once the read borrow is gone.
enum NodeEvent {
    Run(Uuid),
    Duplicate(Uuid),
    Delete(Uuid),
    DataChange(Uuid, Value),
}

pub struct WorkflowApp {
    service: WorkflowService,
    canvas_state: CanvasState,
    theme: CanvasTheme,
    callbacks: CallbackCell,
    node_events: Rc<RefCell<Vec<NodeEvent>>>,
    history: UndoHistory,
    status: String,
}

impl WorkflowApp {
    pub fn new() -> Self {
        let node_events: Rc<RefCell<Vec<NodeEvent>>> = Rc::default();
        let callbacks = CallbackCell::new();

        let queue = node_events.clone();
        let on_run = move |id| queue.borrow_mut().push(NodeEvent::Run(id));
        let queue = node_events.clone();
        let on_duplicate = move |id| queue.borrow_mut().push(NodeEvent::Duplicate(id));
        let queue = node_events.clone();
        let on_delete = move |id| queue.borrow_mut().push(NodeEvent::Delete(id));
        let queue = node_events.clone();
        let on_data_change =
            move |id, data| queue.borrow_mut().push(NodeEvent::DataChange(id, data));

        callbacks.set(CanvasCallbacks {
            on_data_change: Some(Box::new(on_data_change)),
            on_run: Some(Box::new(on_run)),
            on_duplicate: Some(Box::new(on_duplicate)),
            on_delete: Some(Box::new(on_delete)),
            on_mark_draggable: Some(Box::new(|id| log::trace!("drag armed for node {id}"))),
        });

        Self {
            service: WorkflowService::new(),
            canvas_state: CanvasState::default(),
            theme: CanvasTheme::default(),
            callbacks,
            node_events,
            history: UndoHistory::default(),
            status: String::new(),
        }
    }

    fn palette_kinds() -> Vec<NodeKindInfo> {
        NodeKind::palette()
            .iter()
            .map(|kind| NodeKindInfo {
                kind_id: kind.as_str().to_string(),
                display_name: kind.display_name().to_string(),
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Intent application
    // -----------------------------------------------------------------------

    /// Whether the frame's intents change graph structure or content (and
    /// therefore deserve an undo snapshot). Continuous move updates and
    /// selection churn do not.
    fn needs_snapshot(pending: &PendingActions, events: &[NodeEvent]) -> bool {
        !pending.nodes_to_add.is_empty()
            || !pending.nodes_to_remove.is_empty()
            || !pending.edges_to_add.is_empty()
            || !pending.edges_to_remove.is_empty()
            || pending
                .drag_flag_changes
                .iter()
                .any(|&(_, dragging)| dragging)
            || events.iter().any(|e| {
                matches!(
                    e,
                    NodeEvent::Duplicate(_) | NodeEvent::Delete(_) | NodeEvent::DataChange(..)
                )
            })
    }

    fn apply_frame(&mut self, pending: PendingActions, fallback_position: Position) {
        let events: Vec<NodeEvent> = self.node_events.borrow_mut().drain(..).collect();

        if pending.undo_requested {
            self.perform_undo();
        } else if pending.redo_requested {
            self.perform_redo();
        }

        if pending.is_empty() && events.is_empty() {
            return;
        }
        if Self::needs_snapshot(&pending, &events) {
            self.history.push(self.service.snapshot());
        }

        let mut mutator = ServiceMutator {
            service: &mut self.service,
            fallback_position,
        };
        pending.apply(&mut mutator);

        for event in events {
            match event {
                NodeEvent::Run(id) => {
                    // Generation itself belongs to the backend; the canvas
                    // only surfaces the request.
                    log::info!("run requested for node {id}");
                    self.status = format!("Run requested for node {id}");
                }
                NodeEvent::Duplicate(id) => {
                    if let Err(err) = self.service.duplicate_node(id) {
                        log::debug!("duplicate rejected: {err}");
                    }
                }
                NodeEvent::Delete(id) => match self.service.remove_node(id) {
                    Ok(removal) => log::debug!(
                        "deleted node {}, pruned {} edge(s)",
                        removal.node_id,
                        removal.pruned_edge_ids.len()
                    ),
                    Err(err) => log::debug!("delete rejected: {err}"),
                },
                NodeEvent::DataChange(id, data) => {
                    if let Err(err) = self.service.set_node_data(id, data) {
                        log::debug!("data change rejected: {err}");
                    }
                }
            }
        }
    }

    fn perform_undo(&mut self) {
        if let Some(snapshot) = self.history.undo(self.service.snapshot()) {
            self.service.replace_graph(snapshot);
            self.canvas_state.selected_edges.clear();
        }
    }

    fn perform_redo(&mut self) {
        if let Some(snapshot) = self.history.redo(self.service.snapshot()) {
            self.service.replace_graph(snapshot);
            self.canvas_state.selected_edges.clear();
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn save_with_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Workflow", &["json"])
            .save_file()
        else {
            return;
        };
        match persistence::save_document(&path, &self.service.snapshot()) {
            Ok(()) => self.status = format!("Saved {}", path.display()),
            Err(err) => {
                log::error!("save failed: {err:#}");
                self.status = format!("Save failed: {err}");
            }
        }
    }

    fn open_with_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Workflow", &["json"])
            .pick_file()
        else {
            return;
        };
        match persistence::load_document(&path) {
            Ok(document) => {
                self.history.clear();
                self.canvas_state.selected_edges.clear();
                self.service.replace_graph(document);
                self.status = format!("Loaded {}", path.display());
            }
            Err(err) => {
                log::error!("load failed: {err:#}");
                self.status = format!("Load failed: {err}");
            }
        }
    }
}

impl eframe::App for WorkflowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keyboard shortcuts.
        let (undo_key, redo_key, save_key) = ctx.input_mut(|i| {
            (
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z),
                i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::Z)
                    || i.consume_key(egui::Modifiers::COMMAND, egui::Key::Y),
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::S),
            )
        });
        if undo_key {
            self.perform_undo();
        }
        if redo_key {
            self.perform_redo();
        }
        if save_key {
            self.save_with_dialog();
        }

        let mut palette_pick: Option<String> = None;

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open").clicked() {
                    self.open_with_dialog();
                }
                if ui.button("Save").clicked() {
                    self.save_with_dialog();
                }
                ui.separator();
                if ui
                    .add_enabled(self.history.can_undo(), egui::Button::new("Undo"))
                    .clicked()
                {
                    self.perform_undo();
                }
                if ui
                    .add_enabled(self.history.can_redo(), egui::Button::new("Redo"))
                    .clicked()
                {
                    self.perform_redo();
                }
                ui.separator();
                ui.label(&self.status);
            });
        });

        egui::SidePanel::left("palette")
            .default_width(180.0)
            .show(ctx, |ui| {
                palette_pick =
                    palette::palette_ui(ui, &Self::palette_kinds(), self.canvas_state.locked);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let canvas_rect = ui.available_rect_before_wrap();
            let center = self
                .canvas_state
                .viewport
                .screen_to_graph(canvas_rect.min, canvas_rect.center());
            let fallback_position = Position::new(center.x, center.y);

            let mut pending = {
                let source = ServiceDataSource {
                    service: &self.service,
                };
                let mut canvas = WorkflowCanvas::new(&mut self.canvas_state, &self.theme);
                canvas.show(ui, &source, &self.callbacks)
            };
            if let Some(kind_id) = palette_pick.take() {
                pending.nodes_to_add.push((kind_id, None));
            }
            self.apply_frame(pending, fallback_position);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui_kittest::Harness;
    use egui_kittest::kittest::Queryable;

    #[test]
    fn palette_lists_every_addable_kind() {
        let kinds = WorkflowApp::palette_kinds();
        let harness = Harness::builder()
            .with_size(egui::vec2(220.0, 500.0))
            .build_ui(move |ui| {
                palette::palette_ui(ui, &kinds, false);
            });
        assert!(harness.query_by_label("Text").is_some());
        assert!(harness.query_by_label("Assistant").is_some());
        assert!(harness.query_by_label("Image Generator").is_some());
        assert!(harness.query_by_label("Preview").is_some());
    }

    #[test]
    fn run_event_updates_the_status_line() {
        let mut app = WorkflowApp::new();
        let id = app
            .service
            .add_node(NodeKind::TextInput, Position::new(0.0, 0.0));
        app.callbacks.run(id);
        app.apply_frame(PendingActions::default(), Position::new(0.0, 0.0));
        assert!(app.status.contains("Run requested"));
    }

    #[test]
    fn delete_event_prunes_dependent_edges() {
        let mut app = WorkflowApp::new();
        let a = app
            .service
            .add_node(NodeKind::TextInput, Position::new(0.0, 0.0));
        let b = app
            .service
            .add_node(NodeKind::Preview, Position::new(200.0, 0.0));
        app.service
            .add_edge(
                library::PortRef::new(a, "text"),
                library::PortRef::new(b, "media"),
            )
            .unwrap();

        app.callbacks.delete(a);
        app.apply_frame(PendingActions::default(), Position::new(0.0, 0.0));
        assert!(app.service.graph().node(a).is_none());
        assert!(app.service.graph().edges.is_empty());
    }

    #[test]
    fn structural_intents_are_undoable() {
        let mut app = WorkflowApp::new();
        let pending = PendingActions {
            nodes_to_add: vec![("text".into(), None)],
            ..Default::default()
        };
        app.apply_frame(pending, Position::new(50.0, 50.0));
        assert_eq!(app.service.graph().nodes.len(), 1);

        app.perform_undo();
        assert!(app.service.graph().nodes.is_empty());
        app.perform_redo();
        assert_eq!(app.service.graph().nodes.len(), 1);
    }

    #[test]
    fn data_change_event_replaces_the_payload() {
        let mut app = WorkflowApp::new();
        let id = app
            .service
            .add_node(NodeKind::TextInput, Position::new(0.0, 0.0));
        app.callbacks
            .data_change(id, serde_json::json!({ "text": "hello" }));
        app.apply_frame(PendingActions::default(), Position::new(0.0, 0.0));
        assert_eq!(
            app.service.graph().node(id).unwrap().data["text"],
            "hello"
        );
    }
}
