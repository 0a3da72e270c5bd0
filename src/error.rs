//! Error types
//!
//! One enum per concern. Arithmetic guards and kinematics failures are local
//! to the operation that raised them; input errors carry a message meant for
//! the user and never reach the simulation.

use thiserror::Error;

/// Rejected vector operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VectorError {
    /// A divisor component was zero
    #[error("division by a zero component")]
    DivisionByZero,
    /// The operation needs a direction and the vector has none
    #[error("zero vector has no direction")]
    ZeroVector,
    /// A batch operation was given an empty list
    #[error("no operands")]
    NoOperands,
}

/// Rejected body update or edit
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum KinematicsError {
    /// Evaluating the closed form produced NaN or infinity
    #[error("body {id} reached a non-finite state at t = {time}s")]
    NonFinite { id: u32, time: f64 },
    /// An edit tried to store a NaN or infinite component
    #[error("body {id} cannot take a non-finite {field}")]
    InvalidValue { id: u32, field: &'static str },
}

/// Rejected text from a UI field
///
/// `Display` output is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} is required")]
    Empty { field: String },
    #[error("{field} must be a number (got \"{text}\")")]
    NotANumber { field: String, text: String },
    #[error("{field} must be a whole number (got \"{text}\")")]
    NotAnInteger { field: String, text: String },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },
    #[error("{field} must be a color like #ff8000 (got \"{text}\")")]
    NotAColor { field: String, text: String },
}

/// Shareable link could not be produced or read
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario contains a non-finite value")]
    NonFinite,
    #[error("unexpected character {0:?} in scenario code")]
    UnexpectedChar(char),
    #[error("scenario code is empty")]
    Empty,
    #[error("malformed scenario: {0}")]
    Json(#[from] serde_json::Error),
}

/// Intent rejected by the session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("no body with id {0}")]
    UnknownMovil(u32),
    #[error("speed {0} is outside the allowed range")]
    InvalidSpeed(f64),
    #[error("time {0} is not a valid simulation time")]
    InvalidTime(f64),
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
}
