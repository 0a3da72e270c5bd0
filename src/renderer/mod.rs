//! Rendering module
//!
//! Draws the plane and bodies through the [`Surface`] trait; the browser
//! canvas implementation lives in `platform`.

pub mod draw;
pub mod frame;
pub mod recording;
pub mod surface;

pub use frame::{FrameObserver, FrameReport, render_frame};
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::Surface;
