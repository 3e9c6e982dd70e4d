//! Node layout, chrome drawing, and the body renderer registry.

use std::collections::HashMap;

use egui::{self, Color32, Pos2, Rect, Stroke, StrokeKind, Vec2};
use serde_json::Value;
use uuid::Uuid;

use crate::callbacks::CallbackCell;
use crate::theme::CanvasTheme;
use crate::types::{NodeView, PortView};
use crate::widget::PortScreen;

// ---------------------------------------------------------------------------
// Projection cache types
// ---------------------------------------------------------------------------

/// The five-field change-detection key: a node re-derives its view only when
/// one of these differs from the cached value. (The node id is the cache map
/// key.)
#[derive(Clone, Debug, PartialEq)]
pub struct NodeProjection {
    pub selected: bool,
    pub dragging: bool,
    pub position: Pos2,
    pub data: Value,
}

pub(crate) struct CachedNodeView {
    pub projection: NodeProjection,
    pub view: NodeView,
}

// ---------------------------------------------------------------------------
// Body renderer registry
// ---------------------------------------------------------------------------

/// Context handed to a node body renderer.
pub struct BodyContext<'a> {
    pub node_id: Uuid,
    pub rect: Rect,
    pub data: &'a Value,
    pub zoom: f32,
    pub text_color: Color32,
}

/// Renders the type-specific body of a node. Renderers read callbacks from
/// the registry's [`CallbackCell`], never capture them directly.
pub type NodeBodyRenderer = Box<dyn Fn(&mut egui::Ui, &BodyContext)>;

/// The fixed kind → body renderer mapping. Built exactly once per canvas;
/// its identity never changes afterwards, even when the owner swaps the
/// callbacks inside the cell.
pub struct NodeRegistry {
    renderers: HashMap<String, NodeBodyRenderer>,
    callbacks: CallbackCell,
}

impl NodeRegistry {
    pub fn builtin(callbacks: CallbackCell) -> Self {
        let mut renderers: HashMap<String, NodeBodyRenderer> = HashMap::new();
        for kind in ["text", "assistant"] {
            renderers.insert(kind.to_string(), text_body_renderer("text", callbacks.clone()));
        }
        for kind in ["image-generator", "video-generator"] {
            renderers.insert(
                kind.to_string(),
                text_body_renderer("prompt", callbacks.clone()),
            );
        }
        for kind in ["image-upload", "video-upload"] {
            renderers.insert(kind.to_string(), url_body_renderer());
        }
        renderers.insert("preview".to_string(), label_body_renderer("(no media)"));
        Self {
            renderers,
            callbacks,
        }
    }

    pub fn renderer(&self, kind_id: &str) -> Option<&NodeBodyRenderer> {
        self.renderers.get(kind_id)
    }

    pub fn callbacks(&self) -> &CallbackCell {
        &self.callbacks
    }
}

/// Inline single-line editor over a string field of the opaque payload.
/// Edits go to the owner through `on_data_change`; the graph is untouched
/// until the owner applies the new payload.
fn text_body_renderer(field: &'static str, callbacks: CallbackCell) -> NodeBodyRenderer {
    Box::new(move |ui, ctx| {
        let mut buffer = ctx
            .data
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let response = ui.put(
            ctx.rect.shrink(4.0 * ctx.zoom),
            egui::TextEdit::singleline(&mut buffer).hint_text(field),
        );
        if response.changed() {
            let mut data = ctx.data.clone();
            if let Value::Object(map) = &mut data {
                map.insert(field.to_string(), Value::String(buffer));
            }
            callbacks.data_change(ctx.node_id, data);
        }
    })
}

fn url_body_renderer() -> NodeBodyRenderer {
    Box::new(|ui, ctx| {
        let label = ctx
            .data
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or("(no file)")
            .to_string();
        ui.put(
            ctx.rect.shrink(4.0 * ctx.zoom),
            egui::Label::new(
                egui::RichText::new(label)
                    .size(10.0 * ctx.zoom)
                    .color(ctx.text_color),
            )
            .truncate(),
        );
    })
}

fn label_body_renderer(text: &'static str) -> NodeBodyRenderer {
    Box::new(move |ui, ctx| {
        ui.put(
            ctx.rect.shrink(4.0 * ctx.zoom),
            egui::Label::new(
                egui::RichText::new(text)
                    .size(10.0 * ctx.zoom)
                    .color(ctx.text_color),
            ),
        );
    })
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Pre-computed screen layout for a node.
pub(crate) struct NodeLayout {
    pub screen_pos: Pos2,
    pub node_rect: Rect,
    pub header_rect: Rect,
    pub body_rect: Rect,
    pub port_row_h: f32,
    pub port_r: f32,
    pub rounding: f32,
    pub node_w: f32,
    pub port_start_y: f32,
}

/// Node size in graph units (unscaled). Also used to compute the extent for
/// fit-to-view.
pub(crate) fn node_size(theme: &CanvasTheme, view: &NodeView) -> Vec2 {
    let inputs = view.ports.iter().filter(|p| !p.is_output).count();
    let outputs = view.ports.iter().filter(|p| p.is_output).count();
    let rows = inputs.max(outputs) as f32;
    Vec2::new(
        theme.node_width,
        theme.header_height + rows * theme.port_row_height + theme.body_height + 8.0,
    )
}

pub(crate) fn layout_node(
    theme: &CanvasTheme,
    view: &NodeView,
    screen_pos: Pos2,
    zoom: f32,
) -> NodeLayout {
    let size = node_size(theme, view) * zoom;
    let header_h = theme.header_height * zoom;
    let port_row_h = theme.port_row_height * zoom;
    let node_rect = Rect::from_min_size(screen_pos, size);
    let header_rect = Rect::from_min_size(screen_pos, Vec2::new(size.x, header_h));
    let port_start_y = screen_pos.y + header_h + 4.0 * zoom;
    let inputs = view.ports.iter().filter(|p| !p.is_output).count();
    let outputs = view.ports.iter().filter(|p| p.is_output).count();
    let rows = inputs.max(outputs) as f32;
    let body_top = port_start_y + rows * port_row_h + 4.0 * zoom;
    let body_rect = Rect::from_min_max(
        Pos2::new(node_rect.min.x, body_top),
        Pos2::new(node_rect.max.x, node_rect.max.y - 4.0 * zoom),
    );
    NodeLayout {
        screen_pos,
        node_rect,
        header_rect,
        body_rect,
        port_row_h,
        port_r: theme.port_radius * zoom,
        rounding: theme.node_rounding * zoom,
        node_w: size.x,
        port_start_y,
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Draw the node body, selection outline, and header.
pub(crate) fn draw_node_chrome(
    painter: &egui::Painter,
    layout: &NodeLayout,
    theme: &CanvasTheme,
    kind_id: &str,
    title: &str,
    is_selected: bool,
    is_placeholder: bool,
    zoom: f32,
) {
    let body_color = if is_placeholder {
        theme.placeholder_color
    } else if is_selected {
        theme.node_body_selected_color
    } else {
        theme.node_body_color
    };
    painter.rect_filled(layout.node_rect, layout.rounding, body_color);

    if is_selected {
        painter.rect_stroke(
            layout.node_rect,
            layout.rounding,
            Stroke::new(2.0 * zoom, theme.selection_color),
            StrokeKind::Outside,
        );
    }

    let header_color = if is_placeholder {
        Color32::from_rgb(90, 70, 70)
    } else {
        (theme.header_color)(kind_id)
    };
    painter.rect_filled(
        layout.header_rect,
        egui::CornerRadius {
            nw: layout.rounding as u8,
            ne: layout.rounding as u8,
            sw: 0,
            se: 0,
        },
        header_color,
    );
    painter.text(
        layout.header_rect.center(),
        egui::Align2::CENTER_CENTER,
        title,
        egui::FontId::proportional(12.0 * zoom),
        Color32::WHITE,
    );
}

/// Draw input ports on the left edge and output ports on the right edge,
/// pushing a [`PortScreen`] entry for each.
pub(crate) fn draw_ports(
    painter: &egui::Painter,
    layout: &NodeLayout,
    theme: &CanvasTheme,
    kind_id: &str,
    node_id: Uuid,
    ports: &[PortView],
    zoom: f32,
    port_screens: &mut Vec<PortScreen>,
) {
    let color = (theme.port_color)(kind_id);
    let inputs: Vec<&PortView> = ports.iter().filter(|p| !p.is_output).collect();
    let outputs: Vec<&PortView> = ports.iter().filter(|p| p.is_output).collect();

    for (i, port) in inputs.iter().enumerate() {
        let cy = layout.port_start_y + i as f32 * layout.port_row_h + layout.port_row_h / 2.0;
        let p = Pos2::new(layout.screen_pos.x, cy);
        painter.circle_filled(p, layout.port_r, color);
        painter.text(
            p + Vec2::new(layout.port_r + 4.0 * zoom, 0.0),
            egui::Align2::LEFT_CENTER,
            &port.display_name,
            egui::FontId::proportional(10.0 * zoom),
            theme.port_label_color,
        );
        port_screens.push(PortScreen {
            pos: p,
            node_id,
            name: port.name.clone(),
            is_output: false,
        });
    }

    for (i, port) in outputs.iter().enumerate() {
        let cy = layout.port_start_y + i as f32 * layout.port_row_h + layout.port_row_h / 2.0;
        let p = Pos2::new(layout.screen_pos.x + layout.node_w, cy);
        painter.circle_filled(p, layout.port_r, color);
        painter.text(
            p + Vec2::new(-layout.port_r - 4.0 * zoom, 0.0),
            egui::Align2::RIGHT_CENTER,
            &port.display_name,
            egui::FontId::proportional(10.0 * zoom),
            theme.port_label_color,
        );
        port_screens.push(PortScreen {
            pos: p,
            node_id,
            name: port.name.clone(),
            is_output: true,
        });
    }
}
