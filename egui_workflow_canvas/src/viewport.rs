//! Viewport math: pan, zoom, and the animated fit-to-extent operation.
//!
//! Pure coordinate transforms with no effect on graph data.

use egui::{Pos2, Rect, Vec2};

pub const MIN_ZOOM: f32 = 0.2;
pub const MAX_ZOOM: f32 = 3.0;
/// Multiplicative step for the zoom buttons.
pub const ZOOM_STEP: f32 = 1.2;
/// Margin kept around the node extent when fitting.
pub const FIT_PADDING: f32 = 60.0;
/// Duration of the fit-to-extent animation in seconds.
pub const FIT_DURATION: f64 = 0.3;

/// Pan offset in screen pixels plus zoom level (1.0 = 100%).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn graph_to_screen(&self, canvas_min: Pos2, pos: Pos2) -> Pos2 {
        canvas_min + (pos.to_vec2() * self.zoom) + self.pan
    }

    pub fn screen_to_graph(&self, canvas_min: Pos2, pos: Pos2) -> Pos2 {
        (((pos - canvas_min) - self.pan) / self.zoom).to_pos2()
    }

    /// Zoom toward `pivot` (screen coordinates relative to the canvas origin)
    /// so the graph point under the cursor stays put.
    pub fn zoom_at(&mut self, pivot: Vec2, new_zoom: f32) {
        let new_zoom = new_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let graph_point = (pivot - self.pan) / self.zoom;
        self.pan = pivot - graph_point * new_zoom;
        self.zoom = new_zoom;
    }

    pub fn zoom_in(&mut self, canvas_size: Vec2) {
        self.zoom_at(canvas_size / 2.0, self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self, canvas_size: Vec2) {
        self.zoom_at(canvas_size / 2.0, self.zoom / ZOOM_STEP);
    }

    /// Compute the viewport that contains `extent` inside a canvas of
    /// `canvas_size` with [`FIT_PADDING`] on every side.
    pub fn fitting(extent: Rect, canvas_size: Vec2) -> Self {
        if !extent.is_finite() || extent.width() <= 0.0 || extent.height() <= 0.0 {
            return Self::default();
        }
        let avail = canvas_size - Vec2::splat(2.0 * FIT_PADDING);
        let zoom = (avail.x / extent.width())
            .min(avail.y / extent.height())
            .clamp(MIN_ZOOM, MAX_ZOOM);
        let center = extent.center();
        let pan = canvas_size / 2.0 - center.to_vec2() * zoom;
        Self { pan, zoom }
    }

    fn lerp(from: &Viewport, to: &Viewport, t: f32) -> Viewport {
        Viewport {
            pan: from.pan + (to.pan - from.pan) * t,
            zoom: from.zoom + (to.zoom - from.zoom) * t,
        }
    }
}

/// In-flight fit-to-extent animation, advanced each frame from the host's
/// clock.
#[derive(Clone, Copy, Debug)]
pub struct FitAnimation {
    pub from: Viewport,
    pub to: Viewport,
    pub start: f64,
}

impl FitAnimation {
    pub fn new(from: Viewport, to: Viewport, now: f64) -> Self {
        Self { from, to, start: now }
    }

    /// Viewport at time `now`, plus whether the animation has finished.
    pub fn sample(&self, now: f64) -> (Viewport, bool) {
        let t = ((now - self.start) / FIT_DURATION).clamp(0.0, 1.0) as f32;
        // Ease-out so the motion settles instead of stopping abruptly.
        let eased = 1.0 - (1.0 - t).powi(3);
        (Viewport::lerp(&self.from, &self.to, eased), t >= 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_graph_round_trip() {
        let vp = Viewport {
            pan: Vec2::new(33.0, -12.0),
            zoom: 1.7,
        };
        let canvas_min = Pos2::new(100.0, 50.0);
        let p = Pos2::new(240.0, -80.0);
        let back = vp.screen_to_graph(canvas_min, vp.graph_to_screen(canvas_min, p));
        assert!((back - p).length() < 1e-3);
    }

    #[test]
    fn zoom_at_keeps_the_pivot_point_fixed() {
        let mut vp = Viewport::default();
        let canvas_min = Pos2::ZERO;
        let pivot = Vec2::new(400.0, 300.0);
        let graph_under_pivot = vp.screen_to_graph(canvas_min, pivot.to_pos2());
        vp.zoom_at(pivot, 2.0);
        let after = vp.screen_to_graph(canvas_min, pivot.to_pos2());
        assert!((after - graph_under_pivot).length() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut vp = Viewport::default();
        vp.zoom_at(Vec2::ZERO, 100.0);
        assert_eq!(vp.zoom, MAX_ZOOM);
        vp.zoom_at(Vec2::ZERO, 0.0001);
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn fitting_contains_the_extent_with_padding() {
        let extent = Rect::from_min_max(Pos2::new(-100.0, 0.0), Pos2::new(500.0, 400.0));
        let canvas = Vec2::new(800.0, 600.0);
        let vp = Viewport::fitting(extent, canvas);

        let min = vp.graph_to_screen(Pos2::ZERO, extent.min);
        let max = vp.graph_to_screen(Pos2::ZERO, extent.max);
        assert!(min.x >= FIT_PADDING - 1.0 && min.y >= FIT_PADDING - 1.0);
        assert!(max.x <= canvas.x - FIT_PADDING + 1.0);
        assert!(max.y <= canvas.y - FIT_PADDING + 1.0);
    }

    #[test]
    fn fitting_degenerate_extent_falls_back_to_default() {
        let vp = Viewport::fitting(Rect::NOTHING, Vec2::new(800.0, 600.0));
        assert_eq!(vp, Viewport::default());
    }

    #[test]
    fn fit_animation_reaches_target_and_finishes() {
        let from = Viewport::default();
        let to = Viewport {
            pan: Vec2::new(50.0, 80.0),
            zoom: 2.0,
        };
        let anim = FitAnimation::new(from, to, 10.0);

        let (mid, done) = anim.sample(10.0 + FIT_DURATION / 2.0);
        assert!(!done);
        assert!(mid.zoom > from.zoom && mid.zoom < to.zoom);

        let (end, done) = anim.sample(10.0 + FIT_DURATION + 0.01);
        assert!(done);
        assert_eq!(end, to);
    }
}
