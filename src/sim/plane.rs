//! Pan/zoom transform between simulation space and canvas pixels
//!
//! Simulation space is y-up and centered on the canvas; canvas space is
//! y-down in CSS pixels. Device-pixel-ratio scaling is applied by the surface,
//! never here.

use glam::DVec2;

use crate::consts::{DEFAULT_SCALE, MAX_SCALE, MIN_GRID_SPACING_PX, MIN_SCALE, ZOOM_SENSITIVITY};

/// Canvas size in CSS pixels plus the device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            dpr: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        Self { width, height, dpr }
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Backing-store size in device pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpr).round().max(1.0) as u32,
            (self.height * self.dpr).round().max(1.0) as u32,
        )
    }
}

/// Pan offset and zoom of the coordinate plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsolutePlane {
    /// Pan offset in simulation units
    pub position: DVec2,
    /// Pixels per simulation unit, always within `[MIN_SCALE, MAX_SCALE]`
    scale: f64,
}

impl Default for AbsolutePlane {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            scale: DEFAULT_SCALE,
        }
    }
}

impl AbsolutePlane {
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the zoom level, clamped to the allowed range
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    /// Simulation point to canvas pixels
    #[inline]
    pub fn to_screen(&self, p: DVec2, viewport: &Viewport) -> DVec2 {
        let shifted = (p + self.position) * self.scale;
        viewport.center() + DVec2::new(shifted.x, -shifted.y)
    }

    /// Canvas pixels to simulation point (inverse of [`Self::to_screen`])
    #[inline]
    pub fn to_simulation(&self, s: DVec2, viewport: &Viewport) -> DVec2 {
        let offset = s - viewport.center();
        DVec2::new(offset.x, -offset.y) / self.scale - self.position
    }

    /// Move the visual origin by a pointer delta in canvas pixels
    pub fn pan(&mut self, delta_px: DVec2) {
        self.position += DVec2::new(delta_px.x, -delta_px.y) / self.scale;
    }

    /// Apply a wheel delta; returns whether the scale changed
    pub fn zoom(&mut self, wheel_delta: f64) -> bool {
        let before = self.scale;
        self.set_scale(self.scale - wheel_delta * ZOOM_SENSITIVITY);
        self.scale != before
    }

    pub fn reset_view(&mut self) {
        *self = Self::default();
    }

    /// Grid spacing in simulation units: the smallest 1, 2 or 5 × 10ᵏ step
    /// that keeps lines at least `MIN_GRID_SPACING_PX` apart
    pub fn grid_step(&self) -> f64 {
        let raw = MIN_GRID_SPACING_PX / self.scale;
        let base = 10f64.powf(raw.log10().floor());
        [1.0, 2.0, 5.0, 10.0]
            .into_iter()
            .map(|m| m * base)
            .find(|step| *step >= raw)
            .unwrap_or(10.0 * base)
    }

    /// Simulation-space rectangle covered by the viewport, as `(min, max)`
    pub fn visible_bounds(&self, viewport: &Viewport) -> (DVec2, DVec2) {
        let top_left = self.to_simulation(DVec2::ZERO, viewport);
        let bottom_right = self.to_simulation(DVec2::new(viewport.width, viewport.height), viewport);
        (top_left.min(bottom_right), top_left.max(bottom_right))
    }
}

/// Pointer drag tracking (idle until a pointer goes down)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseState {
    pub is_down: bool,
    pub start_position: DVec2,
    pub current_position: DVec2,
    pub delta_position: DVec2,
}

impl MouseState {
    pub fn pointer_down(&mut self, at: DVec2) {
        self.is_down = true;
        self.start_position = at;
        self.current_position = at;
        self.delta_position = DVec2::ZERO;
    }

    /// Track a move; while dragging, pans `plane`. Returns whether it panned.
    pub fn pointer_move(&mut self, at: DVec2, plane: &mut AbsolutePlane) -> bool {
        if !self.is_down {
            return false;
        }
        self.delta_position = at - self.current_position;
        self.current_position = at;
        if self.delta_position == DVec2::ZERO {
            return false;
        }
        plane.pan(self.delta_position);
        true
    }

    pub fn pointer_up(&mut self) {
        self.is_down = false;
        self.delta_position = DVec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_origin_is_canvas_center() {
        let plane = AbsolutePlane::default();
        let vp = Viewport::new(400.0, 300.0, 2.0);
        assert_eq!(plane.to_screen(DVec2::ZERO, &vp), DVec2::new(200.0, 150.0));
        // y-up in simulation space
        let up = plane.to_screen(DVec2::new(0.0, 1.0), &vp);
        assert!(up.y < 150.0);
    }

    #[test]
    fn test_drag_follows_pointer() {
        let mut plane = AbsolutePlane::default();
        let mut mouse = MouseState::default();
        let vp = Viewport::default();
        let anchor = DVec2::new(3.0, -2.0);
        let before = plane.to_screen(anchor, &vp);

        mouse.pointer_down(DVec2::new(100.0, 100.0));
        assert!(mouse.pointer_move(DVec2::new(130.0, 90.0), &mut plane));
        assert!(mouse.pointer_move(DVec2::new(150.0, 80.0), &mut plane));
        mouse.pointer_up();

        let after = plane.to_screen(anchor, &vp);
        let moved = after - before;
        assert!((moved.x - 50.0).abs() < 1e-9);
        assert!((moved.y + 20.0).abs() < 1e-9);
        assert!(!mouse.is_down);
        assert_eq!(mouse.delta_position, DVec2::ZERO);
    }

    #[test]
    fn test_move_without_press_does_not_pan() {
        let mut plane = AbsolutePlane::default();
        let mut mouse = MouseState::default();
        assert!(!mouse.pointer_move(DVec2::new(10.0, 10.0), &mut plane));
        assert_eq!(plane.position, DVec2::ZERO);
    }

    #[test]
    fn test_zoom_direction_and_clamp() {
        let mut plane = AbsolutePlane::default();
        assert!(plane.zoom(-100.0));
        assert!(plane.scale() > DEFAULT_SCALE);
        plane.zoom(1e9);
        assert_eq!(plane.scale(), MIN_SCALE);
        assert!(!plane.zoom(100.0));
        plane.zoom(-1e9);
        assert_eq!(plane.scale(), MAX_SCALE);
    }

    #[test]
    fn test_grid_step_is_friendly() {
        let mut plane = AbsolutePlane::default();
        for scale in [1.0, 3.0, 7.5, 20.0, 64.0, 200.0] {
            plane.set_scale(scale);
            let step = plane.grid_step();
            assert!(step * plane.scale() >= MIN_GRID_SPACING_PX - 1e-9);
            let mantissa = step / 10f64.powf(step.log10().floor());
            assert!(
                [1.0, 2.0, 5.0].iter().any(|m| (mantissa - m).abs() < 1e-9),
                "step {step} at scale {scale}"
            );
        }
    }

    #[test]
    fn test_visible_bounds_contain_origin() {
        let plane = AbsolutePlane::default();
        let vp = Viewport::new(800.0, 600.0, 1.0);
        let (min, max) = plane.visible_bounds(&vp);
        assert!(min.x < 0.0 && min.y < 0.0 && max.x > 0.0 && max.y > 0.0);
        assert!((max.x - min.x - 800.0 / DEFAULT_SCALE).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_screen_round_trip(
            px in -1e4f64..1e4, py in -1e4f64..1e4,
            ox in -1e3f64..1e3, oy in -1e3f64..1e3,
            scale in MIN_SCALE..MAX_SCALE,
        ) {
            let mut plane = AbsolutePlane::default();
            plane.position = DVec2::new(ox, oy);
            plane.set_scale(scale);
            let vp = Viewport::new(1024.0, 768.0, 1.5);
            let p = DVec2::new(px, py);
            let back = plane.to_simulation(plane.to_screen(p, &vp), &vp);
            prop_assert!((back - p).abs().max_element() < 1e-6);
        }

        #[test]
        fn prop_zoom_stays_clamped(deltas in proptest::collection::vec(-5000.0f64..5000.0, 0..100)) {
            let mut plane = AbsolutePlane::default();
            for d in deltas {
                plane.zoom(d);
                prop_assert!(plane.scale() >= MIN_SCALE && plane.scale() <= MAX_SCALE);
            }
        }
    }
}
