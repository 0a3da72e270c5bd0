//! 1D and 2D vector values
//!
//! Vectors are plain `Copy` values: every operation returns a new vector and
//! callers reassign explicitly. Axis count is a type parameter of the rest of
//! the simulation, so linear motion (MRU/MRUV) and projectile motion share
//! one code path.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use glam::DVec2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::VectorError;

/// Operations shared by every vector dimension
pub trait Vector:
    Copy
    + fmt::Debug
    + fmt::Display
    + PartialEq
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + Neg<Output = Self>
    + Serialize
    + DeserializeOwned
    + 'static
{
    const ZERO: Self;

    /// Euclidean norm (absolute value in 1D)
    fn mag(self) -> f64;

    /// Component-wise product
    fn component_mul(self, other: Self) -> Self;

    /// Component-wise quotient, rejected if any divisor component is zero
    fn component_div(self, other: Self) -> Result<Self, VectorError>;

    fn is_finite(self) -> bool;

    /// Position on the 2D drawing plane (1D vectors lie on the x axis)
    fn to_plane(self) -> DVec2;

    #[inline]
    fn scale(self, k: f64) -> Self {
        self * k
    }

    #[inline]
    fn invert(self) -> Self {
        -self
    }

    #[inline]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Unit vector with the same direction (the sign, in 1D)
    fn normalize(self) -> Result<Self, VectorError> {
        let mag = self.mag();
        if mag == 0.0 || !mag.is_finite() {
            return Err(VectorError::ZeroVector);
        }
        Ok(self * mag.recip())
    }

    /// Same direction, magnitude `m`
    fn set_mag(self, m: f64) -> Result<Self, VectorError> {
        Ok(self.normalize()? * m)
    }
}

/// Fold `+` across `operands`
pub fn sum<V: Vector>(operands: &[V]) -> Result<V, VectorError> {
    let (first, rest) = operands.split_first().ok_or(VectorError::NoOperands)?;
    Ok(rest.iter().fold(*first, |acc, v| acc + *v))
}

/// Fold `-` across `operands`, left to right
pub fn difference<V: Vector>(operands: &[V]) -> Result<V, VectorError> {
    let (first, rest) = operands.split_first().ok_or(VectorError::NoOperands)?;
    Ok(rest.iter().fold(*first, |acc, v| acc - *v))
}

/// Fold the component-wise product across `operands`
pub fn product<V: Vector>(operands: &[V]) -> Result<V, VectorError> {
    let (first, rest) = operands.split_first().ok_or(VectorError::NoOperands)?;
    Ok(rest.iter().fold(*first, |acc, v| acc.component_mul(*v)))
}

/// Fold the component-wise quotient across `operands`, left to right
pub fn quotient<V: Vector>(operands: &[V]) -> Result<V, VectorError> {
    let (first, rest) = operands.split_first().ok_or(VectorError::NoOperands)?;
    rest.iter().try_fold(*first, |acc, v| acc.component_div(*v))
}

/// One-axis vector (rectilinear motion)
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vec1 {
    pub x: f64,
}

impl Vec1 {
    pub const fn new(x: f64) -> Self {
        Self { x }
    }
}

impl Vector for Vec1 {
    const ZERO: Self = Self { x: 0.0 };

    #[inline]
    fn mag(self) -> f64 {
        self.x.abs()
    }

    #[inline]
    fn component_mul(self, other: Self) -> Self {
        Self::new(self.x * other.x)
    }

    fn component_div(self, other: Self) -> Result<Self, VectorError> {
        if other.x == 0.0 {
            return Err(VectorError::DivisionByZero);
        }
        Ok(Self::new(self.x / other.x))
    }

    #[inline]
    fn is_finite(self) -> bool {
        self.x.is_finite()
    }

    #[inline]
    fn to_plane(self) -> DVec2 {
        DVec2::new(self.x, 0.0)
    }
}

impl Add for Vec1 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x)
    }
}

impl Sub for Vec1 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x)
    }
}

impl Mul<f64> for Vec1 {
    type Output = Self;
    #[inline]
    fn mul(self, k: f64) -> Self {
        Self::new(self.x * k)
    }
}

impl Neg for Vec1 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x)
    }
}

impl fmt::Display for Vec1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3})", self.x)
    }
}

/// Two-axis vector (projectile motion, free fall in the plane)
///
/// Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        DVec2::from(self).dot(other.into())
    }

    /// Counter-clockwise rotation by `theta` radians
    #[inline]
    pub fn rotate(self, theta: f64) -> Self {
        DVec2::from_angle(theta).rotate(self.into()).into()
    }
}

impl Vector for Vec2 {
    const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    fn mag(self) -> f64 {
        DVec2::from(self).length()
    }

    #[inline]
    fn component_mul(self, other: Self) -> Self {
        (DVec2::from(self) * DVec2::from(other)).into()
    }

    fn component_div(self, other: Self) -> Result<Self, VectorError> {
        if other.x == 0.0 || other.y == 0.0 {
            return Err(VectorError::DivisionByZero);
        }
        Ok((DVec2::from(self) / DVec2::from(other)).into())
    }

    #[inline]
    fn is_finite(self) -> bool {
        DVec2::from(self).is_finite()
    }

    #[inline]
    fn to_plane(self) -> DVec2 {
        self.into()
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<DVec2> for Vec2 {
    #[inline]
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vec2> for DVec2 {
    #[inline]
    fn from(v: Vec2) -> Self {
        DVec2::new(v.x, v.y)
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Vec2> for [f64; 2] {
    fn from(v: Vec2) -> Self {
        [v.x, v.y]
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_div_by_zero_component() {
        let a = Vec2::new(4.0, 6.0);
        assert_eq!(a.component_div(Vec2::new(2.0, 0.0)), Err(VectorError::DivisionByZero));
        assert_eq!(a.component_div(Vec2::new(2.0, 3.0)), Ok(Vec2::new(2.0, 2.0)));
        assert_eq!(
            Vec1::new(1.0).component_div(Vec1::ZERO),
            Err(VectorError::DivisionByZero)
        );
    }

    #[test]
    fn test_normalize_zero_is_rejected() {
        assert_eq!(Vec2::ZERO.normalize(), Err(VectorError::ZeroVector));
        assert_eq!(Vec1::ZERO.normalize(), Err(VectorError::ZeroVector));
        assert_eq!(Vec2::ZERO.set_mag(3.0), Err(VectorError::ZeroVector));
    }

    #[test]
    fn test_normalize_1d_is_sign() {
        assert_eq!(Vec1::new(-7.5).normalize(), Ok(Vec1::new(-1.0)));
        assert_eq!(Vec1::new(0.25).normalize(), Ok(Vec1::new(1.0)));
    }

    #[test]
    fn test_set_mag_keeps_direction() {
        let v = Vec2::new(3.0, 4.0).set_mag(10.0).unwrap();
        assert!((v.x - 6.0).abs() < EPS);
        assert!((v.y - 8.0).abs() < EPS);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = Vec2::new(1.0, 0.0).rotate(FRAC_PI_2);
        assert!(v.x.abs() < EPS);
        assert!((v.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_batch_operations() {
        let vs = [Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Vec2::new(5.0, 6.0)];
        assert_eq!(sum(&vs), Ok(Vec2::new(9.0, 12.0)));
        assert_eq!(difference(&vs), Ok(Vec2::new(-7.0, -8.0)));
        assert_eq!(product(&vs), Ok(Vec2::new(15.0, 48.0)));
        assert_eq!(
            quotient(&[Vec1::new(12.0), Vec1::new(2.0), Vec1::new(3.0)]),
            Ok(Vec1::new(2.0))
        );
        assert_eq!(
            quotient(&[Vec1::new(12.0), Vec1::ZERO]),
            Err(VectorError::DivisionByZero)
        );
    }

    #[test]
    fn test_batch_empty_is_rejected() {
        let empty: [Vec2; 0] = [];
        assert_eq!(sum(&empty), Err(VectorError::NoOperands));
        assert_eq!(difference(&empty), Err(VectorError::NoOperands));
        assert_eq!(product(&empty), Err(VectorError::NoOperands));
        assert_eq!(quotient(&empty), Err(VectorError::NoOperands));
    }

    #[test]
    fn test_serialized_shape() {
        assert_eq!(serde_json::to_string(&Vec2::new(1.5, -2.0)).unwrap(), "[1.5,-2.0]");
        assert_eq!(serde_json::to_string(&Vec1::new(3.0)).unwrap(), "3.0");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_unit_or_rejected(x in -1e6f64..1e6, y in -1e6f64..1e6) {
            let v = Vec2::new(x, y);
            match v.normalize() {
                Ok(n) => prop_assert!((n.mag() - 1.0).abs() < 1e-9),
                Err(e) => {
                    prop_assert_eq!(e, VectorError::ZeroVector);
                    prop_assert!(v.is_zero());
                }
            }
        }

        #[test]
        fn prop_div_never_yields_non_finite(
            x in -1e6f64..1e6, y in -1e6f64..1e6,
            dx in prop_oneof![Just(0.0), 1e-3f64..1e3, -1e3f64..-1e-3],
            dy in prop_oneof![Just(0.0), 1e-3f64..1e3, -1e3f64..-1e-3],
        ) {
            match Vec2::new(x, y).component_div(Vec2::new(dx, dy)) {
                Ok(q) => prop_assert!(q.is_finite()),
                Err(e) => prop_assert_eq!(e, VectorError::DivisionByZero),
            }
        }
    }
}
