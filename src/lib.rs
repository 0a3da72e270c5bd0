//! Cinematica - interactive 2D kinematics simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vectors, bodies, ticker, plane transform, session)
//! - `renderer`: Frame loop and drawing onto an abstract 2D surface
//! - `platform`: Browser canvas/event bindings
//! - `persistence`: Shareable scenario links
//! - `input`: Validation of text typed into the controls

pub mod color;
pub mod error;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use color::Color;
pub use error::{InputError, KinematicsError, ScenarioError, SessionError, VectorError};
pub use settings::{PlaneTheme, Settings};

/// Simulator configuration constants
pub mod consts {
    /// Zoom limits (pixels per simulation unit)
    pub const MIN_SCALE: f64 = 1.0;
    pub const MAX_SCALE: f64 = 200.0;
    pub const DEFAULT_SCALE: f64 = 20.0;
    /// Scale change per unit of wheel delta
    pub const ZOOM_SENSITIVITY: f64 = 0.02;

    /// Grid lines are never drawn closer than this
    pub const MIN_GRID_SPACING_PX: f64 = 40.0;

    /// FPS is republished once per this many frames
    pub const FPS_SAMPLE_FRAMES: u64 = 60;
    /// Longest wall-clock frame delta fed to the ticker (tab switches, stalls)
    pub const MAX_FRAME_DELTA_MS: f64 = 250.0;

    /// Playback speed range
    pub const MIN_SPEED: f64 = 0.1;
    pub const MAX_SPEED: f64 = 10.0;

    /// Arrowhead length in CSS pixels
    pub const ARROW_HEAD_PX: f64 = 8.0;
}
