//! Surface that records draw calls instead of rasterizing them
//!
//! Used by the headless native runner and by tests. `clear` drops everything
//! recorded so far, so the buffer always holds the latest frame.

use glam::DVec2;

use crate::color::Color;
use crate::sim::Viewport;

use super::surface::Surface;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize { width: u32, height: u32, dpr: f64 },
    Clear(Color),
    Line { from: DVec2, to: DVec2, color: Color, width: f64 },
    Circle { center: DVec2, radius: f64, color: Color },
    Polygon { points: Vec<DVec2>, color: Color },
    Text { at: DVec2, text: String, color: Color },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    /// Backing-store size after the last resize, in device pixels
    pub pixel_size: (u32, u32),
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker circles of the latest frame
    pub fn circles(&self) -> impl Iterator<Item = (DVec2, Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle { center, color, .. } => Some((*center, *color)),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, viewport: &Viewport) {
        self.pixel_size = viewport.pixel_size();
        self.commands.push(DrawCommand::Resize {
            width: self.pixel_size.0,
            height: self.pixel_size.1,
            dpr: viewport.dpr,
        });
    }

    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn line(&mut self, from: DVec2, to: DVec2, color: Color, width: f64) {
        self.commands.push(DrawCommand::Line { from, to, color, width });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn text(&mut self, at: DVec2, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            color,
        });
    }
}
