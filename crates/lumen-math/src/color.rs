//! RGB radiance.

use crate::Double3;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul};

/// Non-negative RGB radiance in display units (0..255 maps to the visible
/// range; larger values are clamped only when written to an image).
///
/// Deserialization goes through [`Color::new`], so decoded channels are
/// clamped like constructed ones.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawColor")]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

/// Unchecked channels as they appear on the wire.
#[derive(Deserialize)]
struct RawColor {
    r: f64,
    g: f64,
    b: f64,
}

impl From<RawColor> for Color {
    fn from(raw: RawColor) -> Self {
        Self::new(raw.r, raw.g, raw.b)
    }
}

impl Color {
    /// No radiance.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Full white.
    pub const WHITE: Self = Self::rgb(255.0, 255.0, 255.0);
    /// Pure red.
    pub const RED: Self = Self::rgb(255.0, 0.0, 0.0);
    /// Pure green.
    pub const GREEN: Self = Self::rgb(0.0, 255.0, 0.0);
    /// Pure blue.
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 255.0);

    const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Create a color. Negative channels are clamped to zero.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: r.max(0.0),
            g: g.max(0.0),
            b: b.max(0.0),
        }
    }

    /// Create a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64, g as f64, b as f64)
    }

    /// Multiply each channel by the matching coefficient of `k`.
    pub fn scale_by(self, k: Double3) -> Self {
        Self::new(self.r * k.x, self.g * k.y, self.b * k.z)
    }

    /// Divide every channel by `n` (averaging).
    pub fn reduce(self, n: f64) -> Self {
        Self::new(self.r / n, self.g / n, self.b / n)
    }

    /// `true` when every channel is a finite number.
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// `true` when all channels are zero.
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// Clamp to the display range and round to 8-bit channels.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let q = |c: f64| c.round().clamp(0.0, 255.0) as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

impl Add for Color {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Color {
    type Output = Self;

    fn mul(self, k: f64) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }
}

impl Mul<Double3> for Color {
    type Output = Self;

    fn mul(self, k: Double3) -> Self {
        self.scale_by(k)
    }
}

impl Div<f64> for Color {
    type Output = Self;

    fn div(self, n: f64) -> Self {
        self.reduce(n)
    }
}

impl Sum for Color {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::BLACK, |acc, c| acc + c)
    }
}
