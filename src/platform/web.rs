//! Canvas 2D surface
//!
//! Drawing happens in CSS pixels; `resize` sizes the backing store in device
//! pixels and installs a `dpr` scale so lines stay crisp on HiDPI screens.

use std::f64::consts::TAU;

use glam::DVec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, Window};

use crate::color::Color;
use crate::renderer::Surface;
use crate::sim::Viewport;

const LABEL_FONT: &str = "11px sans-serif";

/// Why a canvas could not be turned into a surface
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    #[error("canvas element #{0} not found")]
    MissingCanvas(String),
    #[error("2D context unavailable: {0}")]
    NoContext(String),
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    viewport: Viewport,
}

impl CanvasSurface {
    /// Look up `#id` in the document and grab its 2D context
    pub fn from_element_id(document: &web_sys::Document, id: &str) -> Result<Self, CanvasError> {
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| CanvasError::MissingCanvas(id.to_string()))?;
        Self::new(canvas)
    }

    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, CanvasError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| CanvasError::NoContext(describe(&e)))?
            .ok_or_else(|| CanvasError::NoContext("getContext returned null".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CanvasError::NoContext("not a CanvasRenderingContext2d".to_string()))?;
        Ok(Self {
            canvas,
            ctx,
            viewport: Viewport::default(),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Canvas layout size right now
    pub fn measure(&self, window: &Window) -> Viewport {
        measure_viewport(&self.canvas, window)
    }
}

/// CSS size of the canvas plus the window's device pixel ratio
pub fn measure_viewport(canvas: &HtmlCanvasElement, window: &Window) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    let dpr = window.device_pixel_ratio();
    Viewport::new(
        rect.width(),
        rect.height(),
        if dpr > 0.0 { dpr } else { 1.0 },
    )
}

/// Pointer position relative to the canvas, in CSS pixels
pub fn local_position(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> DVec2 {
    let rect = canvas.get_bounding_client_rect();
    DVec2::new(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

/// DOM listener that detaches itself when dropped
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("removeEventListener({}) failed: {}", self.event, describe(&e));
        }
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

impl Surface for CanvasSurface {
    fn resize(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.pixel_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        // Resizing the backing store resets the transform
        if let Err(e) = self
            .ctx
            .set_transform(viewport.dpr, 0.0, 0.0, viewport.dpr, 0.0, 0.0)
        {
            log::warn!("setTransform failed: {}", describe(&e));
        }
        self.viewport = *viewport;
    }

    fn clear(&mut self, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx
            .fill_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
    }

    fn line(&mut self, from: DVec2, to: DVec2, color: Color, width: f64) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.begin_path();
        if self.ctx.arc(center.x, center.y, radius, 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Color) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn text(&mut self, at: DVec2, text: &str, color: Color) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.set_font(LABEL_FONT);
        self.ctx.set_text_baseline("top");
        if let Err(e) = self.ctx.fill_text(text, at.x, at.y) {
            log::warn!("fillText failed: {}", describe(&e));
        }
    }
}
