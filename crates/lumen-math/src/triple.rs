//! Componentwise coefficient triples.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Three independent real coefficients, one per color channel.
///
/// Used for material factors (`kd`, `ks`, `kr`, `kt`) and for attenuation
/// accumulated along secondary and shadow rays. All arithmetic is
/// componentwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Double3 {
    /// First component.
    pub x: f64,
    /// Second component.
    pub y: f64,
    /// Third component.
    pub z: f64,
}

impl Double3 {
    /// `(0, 0, 0)`
    pub const ZERO: Self = Self::splat(0.0);
    /// `(1, 1, 1)`
    pub const ONE: Self = Self::splat(1.0);

    /// Create a triple from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Triple with all three components equal to `v`.
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Multiply every component by `k`.
    pub fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }

    /// `true` when every component is strictly below `k`.
    pub fn lower_than(&self, k: f64) -> bool {
        self.x < k && self.y < k && self.z < k
    }

    /// `true` when every component is zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

impl Default for Double3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Double3 {
    fn from(v: f64) -> Self {
        Self::splat(v)
    }
}

impl From<[f64; 3]> for Double3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Add for Double3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Double3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul for Double3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Mul<f64> for Double3 {
    type Output = Self;

    fn mul(self, k: f64) -> Self {
        self.scale(k)
    }
}
