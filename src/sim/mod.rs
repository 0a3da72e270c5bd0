//! Deterministic simulation module
//!
//! All kinematics lives here. This module must stay pure:
//! - Closed-form state, no incremental integration
//! - Time only enters through the ticker's frame timestamps
//! - Stable iteration order (insertion order, unique ids)
//! - No rendering or platform dependencies

pub mod movil;
pub mod plane;
pub mod session;
pub mod ticker;
pub mod vector;

pub use movil::Movil;
pub use plane::{AbsolutePlane, MouseState, Viewport};
pub use session::{DisplayOptions, Intent, MovilEdit, Session};
pub use ticker::{FrameTime, Ticker, TimeControls};
pub use vector::{Vec1, Vec2, Vector, difference, product, quotient, sum};
