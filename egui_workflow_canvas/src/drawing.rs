//! Background drawing utilities.

use egui::{Color32, Pos2, Rect, Stroke, Vec2};

/// Draw a background grid.
pub fn draw_grid(painter: &egui::Painter, rect: Rect, pan: Vec2, color: Color32, spacing: f32) {
    let start_x = rect.min.x + (pan.x % spacing);
    let start_y = rect.min.y + (pan.y % spacing);

    let mut x = start_x;
    while x < rect.max.x {
        painter.line_segment(
            [Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)],
            Stroke::new(1.0, color),
        );
        x += spacing;
    }

    let mut y = start_y;
    while y < rect.max.y {
        painter.line_segment(
            [Pos2::new(rect.min.x, y), Pos2::new(rect.max.x, y)],
            Stroke::new(1.0, color),
        );
        y += spacing;
    }
}
