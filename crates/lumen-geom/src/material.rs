//! Surface reflectance parameters.

use crate::error::{GeometryError, Result};
use lumen_math::Double3;
use serde::{Deserialize, Serialize};

/// Phong material with mirror and transmission factors.
///
/// All factors are componentwise so each color channel can respond
/// differently. Defaults describe a black, fully opaque, non-reflective
/// surface that only shows its emission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Diffuse factor.
    pub kd: Double3,
    /// Specular factor.
    pub ks: Double3,
    /// Mirror reflection factor.
    pub kr: Double3,
    /// Transmission factor.
    pub kt: Double3,
    /// Phong shininess exponent.
    pub shininess: u32,
    /// Glossy/blurred secondary rays; `None` traces a single ray.
    pub glossy: Option<GlossyBeam>,
}

impl Material {
    /// Material with every factor zero.
    pub const fn new() -> Self {
        Self {
            kd: Double3::ZERO,
            ks: Double3::ZERO,
            kr: Double3::ZERO,
            kt: Double3::ZERO,
            shininess: 0,
            glossy: None,
        }
    }

    /// Set the diffuse factor.
    pub fn with_kd(mut self, kd: impl Into<Double3>) -> Self {
        self.kd = kd.into();
        self
    }

    /// Set the specular factor.
    pub fn with_ks(mut self, ks: impl Into<Double3>) -> Self {
        self.ks = ks.into();
        self
    }

    /// Set the reflection factor.
    pub fn with_kr(mut self, kr: impl Into<Double3>) -> Self {
        self.kr = kr.into();
        self
    }

    /// Set the transmission factor.
    pub fn with_kt(mut self, kt: impl Into<Double3>) -> Self {
        self.kt = kt.into();
        self
    }

    /// Set the shininess exponent.
    pub fn with_shininess(mut self, shininess: u32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Attach glossy beam sampling.
    pub fn with_glossy(mut self, glossy: GlossyBeam) -> Self {
        self.glossy = Some(glossy);
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

/// Sampling parameters for a glossy beam.
///
/// Secondary rays become `rays` rays aimed at a disk of `radius` placed
/// `distance` along the ideal ray. Larger radius or shorter distance
/// gives a blurrier result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlossyBeam {
    /// Total rays per beam, including the ideal ray.
    pub rays: u32,
    /// Distance from the surface to the sampling disk.
    pub distance: f64,
    /// Radius of the sampling disk.
    pub radius: f64,
}

impl GlossyBeam {
    /// Create beam parameters, validating ranges.
    pub fn new(rays: u32, distance: f64, radius: f64) -> Result<Self> {
        let beam = Self {
            rays,
            distance,
            radius,
        };
        beam.validate()?;
        Ok(beam)
    }

    /// Check `rays ≥ 1`, `distance > 0`, `radius > 0`.
    pub fn validate(&self) -> Result<()> {
        if self.rays == 0 {
            return Err(GeometryError::InvalidGlossyBeam(
                "rays must be at least 1".into(),
            ));
        }
        if !(self.distance > 0.0) {
            return Err(GeometryError::InvalidGlossyBeam(format!(
                "distance must be positive, got {}",
                self.distance
            )));
        }
        if !(self.radius > 0.0) {
            return Err(GeometryError::InvalidGlossyBeam(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        Ok(())
    }
}
