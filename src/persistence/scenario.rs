//! Shareable scenario description
//!
//! Only initial conditions are stored: a scenario always starts at t = 0.
//! Field names are kept to a letter or two so links stay short.

use serde::{Deserialize, Serialize};

use crate::color::{BODY_PALETTE, Color};
use crate::consts::{MAX_SPEED, MIN_SPEED};
use crate::sim::{Movil, Vec2, Vector};

/// Initial conditions of one body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovilSpec<V> {
    #[serde(rename = "p")]
    pub position: V,
    #[serde(rename = "v")]
    pub velocity: V,
    #[serde(rename = "a")]
    pub acceleration: V,
    #[serde(rename = "c")]
    pub color: Color,
}

impl<V: Vector> MovilSpec<V> {
    pub fn from_movil(movil: &Movil<V>) -> Self {
        Self {
            position: movil.initial_position(),
            velocity: movil.initial_velocity(),
            acceleration: movil.acceleration(),
            color: movil.color,
        }
    }

    pub fn into_movil(self, id: u32) -> Movil<V> {
        Movil::new(id, self.position, self.velocity, self.acceleration, self.color)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.acceleration.is_finite()
    }
}

/// Bodies plus the display options a link carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario<V> {
    #[serde(rename = "m")]
    pub movils: Vec<MovilSpec<V>>,
    #[serde(rename = "s", default = "default_speed")]
    pub speed: f64,
    #[serde(rename = "vec", default)]
    pub show_vectors: bool,
    #[serde(rename = "pred", default = "default_prediction")]
    pub movement_prediction: bool,
}

fn default_speed() -> f64 {
    1.0
}

fn default_prediction() -> bool {
    true
}

impl<V> Default for Scenario<V> {
    fn default() -> Self {
        Self {
            movils: Vec::new(),
            speed: default_speed(),
            show_vectors: false,
            movement_prediction: default_prediction(),
        }
    }
}

impl<V: Vector> Scenario<V> {
    pub fn is_finite(&self) -> bool {
        self.speed.is_finite() && self.movils.iter().all(MovilSpec::is_finite)
    }

    /// Speed forced into the range the controls accept
    pub fn clamped_speed(&self) -> f64 {
        if self.speed.is_finite() {
            self.speed.clamp(MIN_SPEED, MAX_SPEED)
        } else {
            default_speed()
        }
    }
}

impl Scenario<Vec2> {
    /// Starting scene: one body for each classic motion
    pub fn demo() -> Self {
        let body = |p: Vec2, v: Vec2, a: Vec2, i: usize| MovilSpec {
            position: p,
            velocity: v,
            acceleration: a,
            color: BODY_PALETTE[i],
        };
        Self {
            movils: vec![
                // uniform
                body(Vec2::new(-10.0, 6.0), Vec2::new(2.0, 0.0), Vec2::ZERO, 0),
                // uniformly accelerated
                body(Vec2::new(-10.0, 3.0), Vec2::ZERO, Vec2::new(1.0, 0.0), 1),
                // free fall
                body(Vec2::new(8.0, 10.0), Vec2::ZERO, Vec2::new(0.0, -9.8), 2),
                // projectile
                body(Vec2::ZERO, Vec2::new(6.0, 12.0), Vec2::new(0.0, -9.8), 3),
            ],
            ..Default::default()
        }
    }
}
