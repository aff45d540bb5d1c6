#![warn(missing_docs)]

//! Math types for the lumen ray tracer.
//!
//! Thin wrappers around nalgebra providing the domain types the tracer
//! works with: points, vectors, unit directions, componentwise
//! coefficient triples, colors, and the tolerance helpers every
//! geometric predicate goes through.
//!
//! # Architecture
//!
//! - [`Point3`], [`Vec3`], [`Dir3`] - nalgebra aliases. A [`Dir3`] is
//!   always unit length, so "zero direction" cannot be represented;
//!   fallible construction goes through [`try_normalize`] and [`cross`].
//! - [`Double3`] - componentwise coefficient triple (material factors,
//!   transparency accumulators)
//! - [`Color`] - non-negative RGB radiance triple
//! - [`Tolerance`] - `is_zero` / `align_zero` style comparisons

mod color;
mod error;
mod triple;

pub use color::Color;
pub use error::{MathError, Result};
pub use triple::Double3;

use nalgebra::{Unit, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Scalars whose magnitude is below this are treated as zero.
pub const ZERO_TOLERANCE: f64 = 1e-10;

/// Tolerance used by geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Scalar magnitude treated as zero.
    pub zero: f64,
}

impl Tolerance {
    /// Default tracer tolerance.
    pub const DEFAULT: Self = Self {
        zero: ZERO_TOLERANCE,
    };

    /// Check if a scalar is effectively zero.
    pub fn is_zero(&self, x: f64) -> bool {
        x.abs() < self.zero
    }

    /// Snap a scalar to exactly zero when it is effectively zero.
    pub fn align_zero(&self, x: f64) -> f64 {
        if self.is_zero(x) {
            0.0
        } else {
            x
        }
    }

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.zero
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// `true` when `x` is zero within [`ZERO_TOLERANCE`].
#[inline]
pub fn is_zero(x: f64) -> bool {
    Tolerance::DEFAULT.is_zero(x)
}

/// Returns `0.0` when `x` is zero within [`ZERO_TOLERANCE`], `x` otherwise.
#[inline]
pub fn align_zero(x: f64) -> f64 {
    Tolerance::DEFAULT.align_zero(x)
}

/// `true` when `a` and `b` coincide within [`ZERO_TOLERANCE`].
#[inline]
pub fn points_equal(a: &Point3, b: &Point3) -> bool {
    Tolerance::DEFAULT.points_equal(a, b)
}

/// Normalize `v`, failing on the zero vector.
pub fn try_normalize(v: Vec3) -> Result<Dir3> {
    Unit::try_new(v, ZERO_TOLERANCE).ok_or(MathError::ZeroVector)
}

/// Unit cross product `a × b`, failing when the operands are parallel.
pub fn cross(a: &Vec3, b: &Vec3) -> Result<Dir3> {
    Unit::try_new(a.cross(b), ZERO_TOLERANCE).ok_or(MathError::ParallelVectors)
}

/// Some unit direction orthogonal to `d`.
///
/// The result is deterministic: the axis least aligned with `d` is
/// crossed with it.
pub fn orthogonal(d: &Dir3) -> Dir3 {
    let v = d.as_ref();
    let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
    let helper = if ax <= ay && ax <= az {
        Vec3::x()
    } else if ay <= az {
        Vec3::y()
    } else {
        Vec3::z()
    };
    Dir3::new_normalize(v.cross(&helper))
}

/// Mirror direction `v` about a surface with unit normal `n`:
/// `v − 2(v·n)n`.
#[inline]
pub fn reflect(v: &Vec3, n: &Dir3) -> Vec3 {
    let n = n.as_ref();
    v - n * (2.0 * v.dot(n))
}

/// Rotate `v` about `axis` by `angle` radians (Rodrigues' formula).
pub fn rotate_about_axis(v: &Vec3, axis: &Dir3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    let k = axis.as_ref();
    v * c + k.cross(v) * s + k * (k.dot(v) * (1.0 - c))
}
