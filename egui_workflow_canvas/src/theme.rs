//! Theming for the workflow canvas.

use egui::Color32;

/// Theme configuration for the canvas.
pub struct CanvasTheme {
    /// Header color based on kind_id string.
    pub header_color: Box<dyn Fn(&str) -> Color32>,
    /// Port color based on kind_id string.
    pub port_color: Box<dyn Fn(&str) -> Color32>,
    /// Node width in pixels.
    pub node_width: f32,
    /// Header height in pixels (the drag handle region).
    pub header_height: f32,
    /// Port row height in pixels.
    pub port_row_height: f32,
    /// Port circle radius.
    pub port_radius: f32,
    /// Port margin from node edge.
    pub port_margin: f32,
    /// Height reserved for the node body content.
    pub body_height: f32,
    /// Corner rounding for nodes.
    pub node_rounding: f32,
    /// Background color.
    pub background_color: Color32,
    /// Grid line color.
    pub grid_color: Color32,
    /// Grid spacing.
    pub grid_spacing: f32,
    /// Node body color (unselected).
    pub node_body_color: Color32,
    /// Node body color (selected).
    pub node_body_selected_color: Color32,
    /// Selection outline color.
    pub selection_color: Color32,
    /// Port label color.
    pub port_label_color: Color32,
    /// Body text color.
    pub body_text_color: Color32,
    /// Placeholder body color for unknown kinds.
    pub placeholder_color: Color32,
    /// Edge stroke (default).
    pub edge_color: Color32,
    /// Edge stroke (hovered).
    pub edge_hovered_color: Color32,
    /// Edge stroke (selected).
    pub edge_selected_color: Color32,
    /// Edge stroke width (default and hovered).
    pub edge_width: f32,
    /// Edge stroke width (selected).
    pub edge_selected_width: f32,
    /// Delete button fill on selected edges.
    pub edge_delete_color: Color32,
    /// Pending connection line color.
    pub connecting_color: Color32,
}

impl Default for CanvasTheme {
    fn default() -> Self {
        Self {
            header_color: Box::new(default_header_color),
            port_color: Box::new(default_port_color),
            node_width: 200.0,
            header_height: 26.0,
            port_row_height: 20.0,
            port_radius: 5.0,
            port_margin: 0.0,
            body_height: 36.0,
            node_rounding: 6.0,
            background_color: Color32::from_rgb(24, 24, 28),
            grid_color: Color32::from_rgb(38, 38, 44),
            grid_spacing: 50.0,
            node_body_color: Color32::from_rgb(45, 45, 52),
            node_body_selected_color: Color32::from_rgb(56, 56, 66),
            selection_color: Color32::from_rgb(100, 150, 255),
            port_label_color: Color32::from_rgb(200, 200, 200),
            body_text_color: Color32::from_rgb(170, 170, 178),
            placeholder_color: Color32::from_rgb(60, 50, 50),
            edge_color: Color32::from_rgb(150, 150, 158),
            edge_hovered_color: Color32::from_rgb(210, 210, 220),
            edge_selected_color: Color32::from_rgb(120, 170, 255),
            edge_width: 2.0,
            edge_selected_width: 3.0,
            edge_delete_color: Color32::from_rgb(200, 80, 80),
            connecting_color: Color32::from_rgb(200, 200, 200),
        }
    }
}

fn default_header_color(kind_id: &str) -> Color32 {
    match kind_id {
        "text" => Color32::from_rgb(50, 120, 100),
        "image-upload" => Color32::from_rgb(120, 90, 60),
        "video-upload" => Color32::from_rgb(130, 80, 60),
        "assistant" => Color32::from_rgb(100, 60, 150),
        "image-generator" => Color32::from_rgb(60, 100, 160),
        "video-generator" => Color32::from_rgb(50, 80, 150),
        "preview" => Color32::from_rgb(60, 110, 60),
        _ => Color32::from_rgb(80, 80, 80),
    }
}

fn default_port_color(kind_id: &str) -> Color32 {
    match kind_id {
        "text" | "assistant" => Color32::from_rgb(109, 238, 200),
        "image-upload" | "image-generator" => Color32::from_rgb(238, 200, 150),
        "video-upload" | "video-generator" => Color32::from_rgb(238, 130, 109),
        "preview" => Color32::from_rgb(150, 238, 120),
        _ => Color32::from_rgb(150, 150, 150),
    }
}
