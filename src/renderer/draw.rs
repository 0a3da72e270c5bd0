//! Drawing routines for the plane and its bodies

use glam::DVec2;

use crate::color::Color;
use crate::consts::ARROW_HEAD_PX;
use crate::settings::PlaneTheme;
use crate::sim::{AbsolutePlane, Viewport};

use super::surface::Surface;

/// Grid line indices covering `[min, max]` at `step` spacing
fn grid_indices(min: f64, max: f64, step: f64) -> std::ops::RangeInclusive<i64> {
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    first..=last
}

/// Decimal places needed to print multiples of `step` without noise
fn tick_decimals(step: f64) -> usize {
    (-step.log10().floor()).max(0.0) as usize
}

/// Label text for a grid value
pub fn format_tick(value: f64, step: f64) -> String {
    // Snap values like 0.30000000000000004 before formatting
    let snapped = (value / step).round() * step;
    let text = format!("{:.*}", tick_decimals(step), snapped);
    if text.starts_with('-') && text.trim_start_matches(['-', '0', '.']).is_empty() {
        text[1..].to_string()
    } else {
        text
    }
}

/// Grid lines at the plane's current step, skipping the axes themselves
pub fn draw_grid<S: Surface + ?Sized>(
    surface: &mut S,
    plane: &AbsolutePlane,
    viewport: &Viewport,
    theme: PlaneTheme,
) {
    let step = plane.grid_step();
    let (min, max) = plane.visible_bounds(viewport);
    let color = theme.grid();

    for i in grid_indices(min.x, max.x, step) {
        if i == 0 {
            continue;
        }
        let x = i as f64 * step;
        let top = plane.to_screen(DVec2::new(x, max.y), viewport);
        let bottom = plane.to_screen(DVec2::new(x, min.y), viewport);
        surface.line(top, bottom, color, 1.0);
    }
    for i in grid_indices(min.y, max.y, step) {
        if i == 0 {
            continue;
        }
        let y = i as f64 * step;
        let left = plane.to_screen(DVec2::new(min.x, y), viewport);
        let right = plane.to_screen(DVec2::new(max.x, y), viewport);
        surface.line(left, right, color, 1.0);
    }
}

/// x and y axes, when they are in view
pub fn draw_axes<S: Surface + ?Sized>(
    surface: &mut S,
    plane: &AbsolutePlane,
    viewport: &Viewport,
    theme: PlaneTheme,
) {
    let (min, max) = plane.visible_bounds(viewport);
    let color = theme.axis();

    if min.y <= 0.0 && max.y >= 0.0 {
        let left = plane.to_screen(DVec2::new(min.x, 0.0), viewport);
        let right = plane.to_screen(DVec2::new(max.x, 0.0), viewport);
        surface.line(left, right, color, 1.5);
    }
    if min.x <= 0.0 && max.x >= 0.0 {
        let top = plane.to_screen(DVec2::new(0.0, max.y), viewport);
        let bottom = plane.to_screen(DVec2::new(0.0, min.y), viewport);
        surface.line(top, bottom, color, 1.5);
    }
}

/// Unit labels next to each grid line along both axes
///
/// Labels stick to the canvas edge when an axis is panned out of view.
pub fn draw_labels<S: Surface + ?Sized>(
    surface: &mut S,
    plane: &AbsolutePlane,
    viewport: &Viewport,
    theme: PlaneTheme,
) {
    let step = plane.grid_step();
    let (min, max) = plane.visible_bounds(viewport);
    let color = theme.axis();
    let origin = plane.to_screen(DVec2::ZERO, viewport);
    // Tiny or hidden canvases collapse the clamp range to zero
    let label_y = origin.y.clamp(0.0, (viewport.height - 14.0).max(0.0)) + 2.0;
    let label_x = origin.x.clamp(0.0, (viewport.width - 40.0).max(0.0)) + 3.0;

    for i in grid_indices(min.x, max.x, step) {
        if i == 0 {
            continue;
        }
        let x = i as f64 * step;
        let at = plane.to_screen(DVec2::new(x, 0.0), viewport);
        surface.text(DVec2::new(at.x + 2.0, label_y), &format_tick(x, step), color);
    }
    for i in grid_indices(min.y, max.y, step) {
        if i == 0 {
            continue;
        }
        let y = i as f64 * step;
        let at = plane.to_screen(DVec2::new(0.0, y), viewport);
        surface.text(DVec2::new(label_x, at.y + 2.0), &format_tick(y, step), color);
    }
}

/// Body marker
pub fn draw_movil<S: Surface + ?Sized>(surface: &mut S, at: DVec2, radius: f64, color: Color) {
    surface.fill_circle(at, radius, color);
}

/// Arrow from `from` to `to` (CSS pixels); nothing is drawn for sub-pixel arrows
pub fn draw_arrow<S: Surface + ?Sized>(surface: &mut S, from: DVec2, to: DVec2, color: Color) {
    let shaft = to - from;
    let length = shaft.length();
    if !length.is_finite() || length < 1.0 {
        return;
    }
    let dir = shaft / length;
    let head = ARROW_HEAD_PX.min(length * 0.5);
    let base = to - dir * head;
    let perp = dir.perp() * (head * 0.5);

    surface.line(from, base, color, 2.0);
    surface.fill_polygon(&[to, base + perp, base - perp], color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::recording::{DrawCommand, RecordingSurface};

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(5.0, 5.0), "5");
        assert_eq!(format_tick(0.30000000000000004, 0.1), "0.3");
        assert_eq!(format_tick(-0.2, 0.2), "-0.2");
        assert_eq!(format_tick(150.0, 50.0), "150");
        assert_eq!(format_tick(0.05, 0.05), "0.05");
    }

    #[test]
    fn test_grid_skips_axes() {
        let plane = AbsolutePlane::default();
        let vp = Viewport::new(800.0, 600.0, 1.0);
        let mut surface = RecordingSurface::new();
        draw_grid(&mut surface, &plane, &vp, PlaneTheme::Dark);
        let center = vp.center();
        for cmd in &surface.commands {
            if let DrawCommand::Line { from, to, .. } = cmd {
                let vertical_through_origin = from.x == center.x && to.x == center.x;
                let horizontal_through_origin = from.y == center.y && to.y == center.y;
                assert!(!vertical_through_origin && !horizontal_through_origin);
            }
        }
        // 800px wide at 40px spacing: at most 20 vertical lines
        assert!(surface.commands.len() <= 20 + 15);
        assert!(!surface.commands.is_empty());
    }

    #[test]
    fn test_axes_hidden_when_panned_away() {
        let mut plane = AbsolutePlane::default();
        let vp = Viewport::new(800.0, 600.0, 1.0);
        plane.position = DVec2::new(1000.0, 1000.0);
        let mut surface = RecordingSurface::new();
        draw_axes(&mut surface, &plane, &vp, PlaneTheme::Dark);
        assert!(surface.commands.is_empty());
    }

    #[test]
    fn test_arrow_has_head() {
        let mut surface = RecordingSurface::new();
        draw_arrow(&mut surface, DVec2::ZERO, DVec2::new(100.0, 0.0), Color::WHITE);
        assert_eq!(surface.commands.len(), 2);
        match &surface.commands[1] {
            DrawCommand::Polygon { points, .. } => {
                assert_eq!(points[0], DVec2::new(100.0, 0.0));
                assert_eq!(points[1].x, 100.0 - ARROW_HEAD_PX);
            }
            other => panic!("expected arrowhead, got {other:?}"),
        }

        let mut surface = RecordingSurface::new();
        draw_arrow(&mut surface, DVec2::ZERO, DVec2::new(0.5, 0.0), Color::WHITE);
        assert!(surface.commands.is_empty());
    }
}
