//! Edge routing, visual state, and hit-testing.
//!
//! Edges leave the source port to the right and enter the target port from
//! the left along an orthogonal path with rounded corners. Hit-testing runs
//! against a wide invisible band around the path so edges stay clickable even
//! though the visible stroke is thin.

use egui::{Color32, Pos2, Rect, Stroke, Vec2};

use crate::theme::CanvasTheme;

/// Width of the invisible hit band, independent of the visible stroke.
pub const EDGE_HIT_WIDTH: f32 = 20.0;
/// Corner rounding radius of the orthogonal route.
const CORNER_RADIUS: f32 = 8.0;
/// Horizontal stub leaving/entering a port before the route may turn.
const PORT_STUB: f32 = 16.0;
/// Segments used to approximate each rounded corner.
const CORNER_SEGMENTS: usize = 6;

/// Mutually exclusive render states, in precedence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeVisual {
    Default,
    Hovered,
    Selected,
}

/// Resolve the render state. `Selected` always wins over `Hovered`.
pub fn edge_visual(selected: bool, hovered: bool) -> EdgeVisual {
    if selected {
        EdgeVisual::Selected
    } else if hovered {
        EdgeVisual::Hovered
    } else {
        EdgeVisual::Default
    }
}

impl EdgeVisual {
    pub fn stroke(&self, theme: &CanvasTheme, zoom: f32) -> Stroke {
        match self {
            EdgeVisual::Default => Stroke::new(theme.edge_width * zoom, theme.edge_color),
            EdgeVisual::Hovered => {
                Stroke::new(theme.edge_width * zoom, theme.edge_hovered_color)
            }
            EdgeVisual::Selected => Stroke::new(
                theme.edge_selected_width * zoom,
                theme.edge_selected_color,
            ),
        }
    }
}

/// Compute an orthogonal route with rounded corners from an output port to
/// an input port, both in screen coordinates.
pub fn smooth_step_path(from: Pos2, to: Pos2, zoom: f32) -> Vec<Pos2> {
    let stub = PORT_STUB * zoom;
    let corners = if to.x - from.x >= 2.0 * stub {
        // Forward route: out, across at mid-x, in.
        let mid_x = (from.x + to.x) / 2.0;
        vec![
            from,
            Pos2::new(mid_x, from.y),
            Pos2::new(mid_x, to.y),
            to,
        ]
    } else {
        // Backward route: out, around at mid-y, back in.
        let mid_y = (from.y + to.y) / 2.0;
        vec![
            from,
            Pos2::new(from.x + stub, from.y),
            Pos2::new(from.x + stub, mid_y),
            Pos2::new(to.x - stub, mid_y),
            Pos2::new(to.x - stub, to.y),
            to,
        ]
    };
    round_corners(&corners, CORNER_RADIUS * zoom)
}

/// Replace each interior vertex of an orthogonal polyline with a sampled
/// quarter-arc, clamping the radius to the adjoining segment lengths.
fn round_corners(corners: &[Pos2], radius: f32) -> Vec<Pos2> {
    if corners.len() < 3 || radius <= 0.0 {
        return corners.to_vec();
    }
    let mut path = vec![corners[0]];
    for i in 1..corners.len() - 1 {
        let prev = corners[i - 1];
        let here = corners[i];
        let next = corners[i + 1];

        let in_dir = (here - prev).normalized();
        let out_dir = (next - here).normalized();
        let r = radius
            .min((here - prev).length() / 2.0)
            .min((next - here).length() / 2.0);
        if r <= 0.0 || !in_dir.is_finite() || !out_dir.is_finite() {
            path.push(here);
            continue;
        }

        let arc_start = here - in_dir * r;
        let arc_end = here + out_dir * r;
        path.push(arc_start);
        // Quadratic approximation of the quarter-arc with the corner as
        // control point.
        for s in 1..CORNER_SEGMENTS {
            let t = s as f32 / CORNER_SEGMENTS as f32;
            let a = arc_start + (here - arc_start) * t;
            let b = here + (arc_end - here) * t;
            path.push(a + (b - a) * t);
        }
        path.push(arc_end);
    }
    path.push(corners[corners.len() - 1]);
    path
}

/// Minimum distance from a point to a polyline.
pub fn distance_to_polyline(point: Pos2, path: &[Pos2]) -> f32 {
    let mut best = f32::INFINITY;
    for seg in path.windows(2) {
        best = best.min(distance_to_segment(point, seg[0], seg[1]));
    }
    best
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Point halfway along the path by arc length; anchors the delete button.
pub fn path_midpoint(path: &[Pos2]) -> Pos2 {
    let total: f32 = path.windows(2).map(|s| s[0].distance(s[1])).sum();
    if total <= 0.0 {
        return path.first().copied().unwrap_or(Pos2::ZERO);
    }
    let mut remaining = total / 2.0;
    for seg in path.windows(2) {
        let len = seg[0].distance(seg[1]);
        if remaining <= len {
            let t = remaining / len;
            return seg[0] + (seg[1] - seg[0]) * t;
        }
        remaining -= len;
    }
    path[path.len() - 1]
}

/// Draw the visible stroke and the per-edge arrowhead at the target end.
/// The arrowhead takes the stroke's color so it tracks the edge state.
pub fn draw_edge_path(painter: &egui::Painter, path: &[Pos2], stroke: Stroke, zoom: f32) {
    for seg in path.windows(2) {
        painter.line_segment([seg[0], seg[1]], stroke);
    }
    if path.len() >= 2 {
        draw_arrowhead(painter, path[path.len() - 2], path[path.len() - 1], stroke.color, zoom);
    }
}

fn draw_arrowhead(painter: &egui::Painter, before: Pos2, tip: Pos2, color: Color32, zoom: f32) {
    let dir = (tip - before).normalized();
    if !dir.is_finite() {
        return;
    }
    let size = 7.0 * zoom;
    let normal = Vec2::new(-dir.y, dir.x);
    let base = tip - dir * size;
    let pts = vec![tip, base + normal * size * 0.5, base - normal * size * 0.5];
    painter.add(egui::Shape::convex_polygon(pts, color, Stroke::NONE));
}

/// Geometry of the midpoint delete button while an edge is selected.
pub fn delete_button_rect(midpoint: Pos2, zoom: f32) -> Rect {
    let half = 8.0 * zoom;
    Rect::from_center_size(midpoint, Vec2::splat(half * 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_takes_precedence_over_hovered() {
        assert_eq!(edge_visual(true, true), EdgeVisual::Selected);
        assert_eq!(edge_visual(true, false), EdgeVisual::Selected);
        assert_eq!(edge_visual(false, true), EdgeVisual::Hovered);
        assert_eq!(edge_visual(false, false), EdgeVisual::Default);
    }

    #[test]
    fn path_starts_and_ends_at_the_ports() {
        let from = Pos2::new(10.0, 20.0);
        let to = Pos2::new(300.0, 140.0);
        let path = smooth_step_path(from, to, 1.0);
        assert_eq!(path[0], from);
        assert_eq!(path[path.len() - 1], to);
    }

    #[test]
    fn backward_route_leaves_source_rightward() {
        // Target is left of the source: route must still exit to the right.
        let from = Pos2::new(200.0, 50.0);
        let to = Pos2::new(0.0, 50.0);
        let path = smooth_step_path(from, to, 1.0);
        assert!(path[1].x > from.x);
        assert_eq!(path[path.len() - 1], to);
    }

    #[test]
    fn hit_band_is_wider_than_the_stroke() {
        let path = smooth_step_path(Pos2::new(0.0, 0.0), Pos2::new(200.0, 0.0), 1.0);
        // 9 px off the line: outside any visible stroke, inside the band.
        let near = Pos2::new(100.0, 9.0);
        assert!(distance_to_polyline(near, &path) <= EDGE_HIT_WIDTH / 2.0);
        let far = Pos2::new(100.0, 40.0);
        assert!(distance_to_polyline(far, &path) > EDGE_HIT_WIDTH / 2.0);
    }

    #[test]
    fn midpoint_lies_on_a_straight_path() {
        let path = vec![Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0)];
        assert_eq!(path_midpoint(&path), Pos2::new(50.0, 0.0));
    }

    #[test]
    fn distance_to_degenerate_segment_is_point_distance() {
        let p = Pos2::new(3.0, 4.0);
        assert!((distance_to_polyline(p, &[Pos2::ZERO, Pos2::ZERO]) - 5.0).abs() < 1e-4);
    }
}
