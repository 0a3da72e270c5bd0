//! Moving bodies
//!
//! A body's displayed state is always re-evaluated from its initial vectors
//! with the closed-form equations of uniformly accelerated motion:
//!
//! - `v(t) = v0 + a·t`
//! - `p(t) = p0 + v0·t + ½·a·t²`
//!
//! Nothing is integrated frame by frame, so frame-rate jitter cannot cause
//! drift. Rewinding and jumping are just signed time deltas fed through
//! [`Movil::update`].

use crate::color::Color;
use crate::error::KinematicsError;

use super::vector::Vector;

/// A simulated moving body
#[derive(Debug, Clone, PartialEq)]
pub struct Movil<V: Vector> {
    /// Stable identifier (UI keying, edits, removal)
    pub id: u32,
    pub color: Color,
    position: V,
    velocity: V,
    acceleration: V,
    initial_position: V,
    initial_velocity: V,
    /// Body-local simulation time, in milliseconds
    elapsed_ms: f64,
}

impl<V: Vector> Movil<V> {
    pub fn new(
        id: u32,
        initial_position: V,
        initial_velocity: V,
        acceleration: V,
        color: Color,
    ) -> Self {
        Self {
            id,
            color,
            position: initial_position,
            velocity: initial_velocity,
            acceleration,
            initial_position,
            initial_velocity,
            elapsed_ms: 0.0,
        }
    }

    /// Body resting at the origin
    pub fn at_rest(id: u32, color: Color) -> Self {
        Self::new(id, V::ZERO, V::ZERO, V::ZERO, color)
    }

    #[inline]
    pub fn position(&self) -> V {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> V {
        self.velocity
    }

    #[inline]
    pub fn acceleration(&self) -> V {
        self.acceleration
    }

    #[inline]
    pub fn initial_position(&self) -> V {
        self.initial_position
    }

    #[inline]
    pub fn initial_velocity(&self) -> V {
        self.initial_velocity
    }

    /// Body-local simulation time in seconds
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }

    /// Closed-form `(position, velocity)` at `t` seconds
    pub fn state_at(&self, t: f64) -> (V, V) {
        let velocity = self.initial_velocity + self.acceleration * t;
        let position =
            self.initial_position + self.initial_velocity * t + self.acceleration * (0.5 * t * t);
        (position, velocity)
    }

    /// Advance body-local time by `dt_ms` milliseconds (negative rewinds)
    ///
    /// A non-finite result is rejected and the body keeps its previous state.
    pub fn update(&mut self, dt_ms: f64) -> Result<(), KinematicsError> {
        self.evaluate_at(self.elapsed_ms + dt_ms)
    }

    /// Return to `t = 0` through the regular update path
    pub fn rewind(&mut self) -> Result<(), KinematicsError> {
        self.update(-self.elapsed_ms)
    }

    pub fn set_initial_position(&mut self, p: V) -> Result<(), KinematicsError> {
        self.check_finite(p, "position")?;
        self.initial_position = p;
        self.evaluate_at(self.elapsed_ms)
    }

    pub fn set_initial_velocity(&mut self, v: V) -> Result<(), KinematicsError> {
        self.check_finite(v, "velocity")?;
        self.initial_velocity = v;
        self.evaluate_at(self.elapsed_ms)
    }

    pub fn set_acceleration(&mut self, a: V) -> Result<(), KinematicsError> {
        self.check_finite(a, "acceleration")?;
        self.acceleration = a;
        self.evaluate_at(self.elapsed_ms)
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn check_finite(&self, v: V, field: &'static str) -> Result<(), KinematicsError> {
        if v.is_finite() {
            Ok(())
        } else {
            Err(KinematicsError::InvalidValue { id: self.id, field })
        }
    }

    fn evaluate_at(&mut self, elapsed_ms: f64) -> Result<(), KinematicsError> {
        let t = elapsed_ms / 1000.0;
        let (position, velocity) = self.state_at(t);
        if !t.is_finite() || !position.is_finite() || !velocity.is_finite() {
            return Err(KinematicsError::NonFinite { id: self.id, time: t });
        }
        self.elapsed_ms = elapsed_ms;
        self.position = position;
        self.velocity = velocity;
        Ok(())
    }
}
