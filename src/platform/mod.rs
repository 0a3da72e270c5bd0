//! Platform abstraction layer
//!
//! Browser-only glue lives in [`web`]: the canvas 2D surface and viewport
//! measurement. Everything above this layer talks to `renderer::Surface`.

#[cfg(target_arch = "wasm32")]
pub mod web;
