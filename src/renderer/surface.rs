//! 2D drawing surface abstraction
//!
//! All coordinates are CSS pixels with the origin at the top-left corner.
//! Implementations apply the device pixel ratio themselves.

use glam::DVec2;

use crate::color::Color;
use crate::sim::Viewport;

/// Canvas-like drawing target
pub trait Surface {
    /// Resize the backing store to `viewport` and re-apply DPR scaling
    fn resize(&mut self, viewport: &Viewport);

    /// Fill the whole surface
    fn clear(&mut self, color: Color);

    fn line(&mut self, from: DVec2, to: DVec2, color: Color, width: f64);

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color);

    fn fill_polygon(&mut self, points: &[DVec2], color: Color);

    /// Small label anchored at its top-left corner
    fn text(&mut self, at: DVec2, text: &str, color: Color);
}
