//! Light sources.

use lumen_geom::GeometryError;
use lumen_math::{try_normalize, Color, Dir3, Double3, Point3, Vec3};

/// Uniform light added once to every visible surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// Effective intensity (base color scaled by the factor).
    pub intensity: Color,
}

impl AmbientLight {
    /// No ambient light.
    pub const NONE: Self = Self {
        intensity: Color::BLACK,
    };

    /// Ambient light of `color` scaled componentwise by `factor`.
    pub fn new(color: Color, factor: impl Into<Double3>) -> Self {
        Self {
            intensity: color * factor.into(),
        }
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self::NONE
    }
}

/// Light arriving from a fixed direction with constant intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Intensity.
    pub intensity: Color,
    /// Direction the light travels in.
    pub direction: Dir3,
}

impl DirectionalLight {
    /// Create a directional light. Fails on a zero direction.
    pub fn new(intensity: Color, direction: Vec3) -> Result<Self, GeometryError> {
        Ok(Self {
            intensity,
            direction: try_normalize(direction)?,
        })
    }
}

/// Omnidirectional light at a point with distance attenuation
/// `1 / (kc + kl·d + kq·d²)`.
///
/// At least one coefficient must be positive; scene files with all three
/// zero are rejected when loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// Intensity at zero distance with unit attenuation.
    pub intensity: Color,
    /// Position.
    pub position: Point3,
    /// Constant attenuation.
    pub kc: f64,
    /// Linear attenuation.
    pub kl: f64,
    /// Quadratic attenuation.
    pub kq: f64,
}

impl PointLight {
    /// Point light with `kc = 1`, `kl = kq = 0`.
    pub fn new(intensity: Color, position: Point3) -> Self {
        Self {
            intensity,
            position,
            kc: 1.0,
            kl: 0.0,
            kq: 0.0,
        }
    }

    /// Set the constant attenuation; negative values clamp to zero.
    pub fn with_kc(mut self, kc: f64) -> Self {
        self.kc = kc.max(0.0);
        self
    }

    /// Set the linear attenuation; negative values clamp to zero.
    pub fn with_kl(mut self, kl: f64) -> Self {
        self.kl = kl.max(0.0);
        self
    }

    /// Set the quadratic attenuation; negative values clamp to zero.
    pub fn with_kq(mut self, kq: f64) -> Self {
        self.kq = kq.max(0.0);
        self
    }

    fn attenuated(&self, p: &Point3) -> Color {
        let d = nalgebra::distance(&self.position, p);
        self.intensity / (self.kc + self.kl * d + self.kq * d * d)
    }
}

/// A point light whose intensity falls off away from its axis as
/// `max(0, axis·l)^narrow_beam`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    /// Underlying point light.
    pub point: PointLight,
    /// Beam axis.
    pub direction: Dir3,
    /// Beam concentration exponent (≥ 1).
    pub narrow_beam: f64,
}

impl SpotLight {
    /// Create a spot light. Fails on a zero direction.
    pub fn new(intensity: Color, position: Point3, direction: Vec3) -> Result<Self, GeometryError> {
        Ok(Self {
            point: PointLight::new(intensity, position),
            direction: try_normalize(direction)?,
            narrow_beam: 1.0,
        })
    }

    /// Set the constant attenuation.
    pub fn with_kc(mut self, kc: f64) -> Self {
        self.point = self.point.with_kc(kc);
        self
    }

    /// Set the linear attenuation.
    pub fn with_kl(mut self, kl: f64) -> Self {
        self.point = self.point.with_kl(kl);
        self
    }

    /// Set the quadratic attenuation.
    pub fn with_kq(mut self, kq: f64) -> Self {
        self.point = self.point.with_kq(kq);
        self
    }

    /// Set the beam exponent; values below 1 clamp to 1.
    pub fn with_narrow_beam(mut self, narrow_beam: f64) -> Self {
        self.narrow_beam = narrow_beam.max(1.0);
        self
    }
}

/// A light that can illuminate and cast shadows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightSource {
    /// Parallel light.
    Directional(DirectionalLight),
    /// Point light.
    Point(PointLight),
    /// Spot light.
    Spot(SpotLight),
}

impl LightSource {
    /// Intensity arriving at `p`.
    pub fn intensity_at(&self, p: &Point3) -> Color {
        match self {
            LightSource::Directional(d) => d.intensity,
            LightSource::Point(pl) => pl.attenuated(p),
            LightSource::Spot(s) => {
                let Some(l) = self.direction_at(p) else {
                    return s.point.intensity;
                };
                let cos = s.direction.dot(l.as_ref()).max(0.0);
                s.point.attenuated(p) * cos.powf(s.narrow_beam)
            }
        }
    }

    /// Unit direction from the light toward `p`.
    ///
    /// `None` when `p` coincides with a positional light.
    pub fn direction_at(&self, p: &Point3) -> Option<Dir3> {
        match self {
            LightSource::Directional(d) => Some(d.direction),
            LightSource::Point(pl) => try_normalize(p - pl.position).ok(),
            LightSource::Spot(s) => try_normalize(p - s.point.position).ok(),
        }
    }

    /// Distance from `p` to the light; infinite for directional lights.
    pub fn distance_to(&self, p: &Point3) -> f64 {
        match self {
            LightSource::Directional(_) => f64::INFINITY,
            LightSource::Point(pl) => nalgebra::distance(&pl.position, p),
            LightSource::Spot(s) => nalgebra::distance(&s.point.position, p),
        }
    }
}

impl From<DirectionalLight> for LightSource {
    fn from(l: DirectionalLight) -> Self {
        LightSource::Directional(l)
    }
}

impl From<PointLight> for LightSource {
    fn from(l: PointLight) -> Self {
        LightSource::Point(l)
    }
}

impl From<SpotLight> for LightSource {
    fn from(l: SpotLight) -> Self {
        LightSource::Spot(l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ambient_scales_color() {
        let a = AmbientLight::new(Color::new(100.0, 200.0, 50.0), 0.5);
        assert_eq!(a.intensity, Color::new(50.0, 100.0, 25.0));
        assert_eq!(AmbientLight::default().intensity, Color::BLACK);
    }

    #[test]
    fn test_directional() {
        let l: LightSource = DirectionalLight::new(Color::WHITE, Vec3::new(0.0, -2.0, 0.0))
            .unwrap()
            .into();
        let p = Point3::new(5.0, 5.0, 5.0);
        assert_eq!(l.intensity_at(&p), Color::WHITE);
        assert!((l.direction_at(&p).unwrap().y + 1.0).abs() < 1e-12);
        assert!(l.distance_to(&p).is_infinite());
        assert!(DirectionalLight::new(Color::WHITE, Vec3::zeros()).is_err());
    }

    #[test]
    fn test_point_attenuation() {
        let l: LightSource = PointLight::new(Color::new(100.0, 100.0, 100.0), Point3::origin())
            .with_kl(0.5)
            .with_kq(0.25)
            .into();
        let p = Point3::new(0.0, 2.0, 0.0);
        // 1 + 0.5·2 + 0.25·4 = 3
        let i = l.intensity_at(&p);
        assert_relative_eq!(i.r, 100.0 / 3.0, epsilon = 1e-10);
        assert!((l.distance_to(&p) - 2.0).abs() < 1e-12);
        assert!((l.direction_at(&p).unwrap().y - 1.0).abs() < 1e-12);
        assert!(l.direction_at(&Point3::origin()).is_none());
    }

    #[test]
    fn test_negative_coefficients_clamp() {
        let l = PointLight::new(Color::WHITE, Point3::origin()).with_kl(-1.0);
        assert_eq!(l.kl, 0.0);
        let s = SpotLight::new(Color::WHITE, Point3::origin(), Vec3::z())
            .unwrap()
            .with_narrow_beam(0.2);
        assert_eq!(s.narrow_beam, 1.0);
    }

    #[test]
    fn test_spot_falloff() {
        let spot: LightSource = SpotLight::new(Color::new(100.0, 0.0, 0.0), Point3::origin(), Vec3::z())
            .unwrap()
            .with_narrow_beam(2.0)
            .into();

        let on_axis = spot.intensity_at(&Point3::new(0.0, 0.0, 1.0));
        assert!((on_axis.r - 100.0).abs() < 1e-10);

        // 60° off axis: cos = 0.5, squared = 0.25
        let off = spot.intensity_at(&Point3::new(3f64.sqrt() / 2.0, 0.0, 0.5));
        assert!((off.r - 25.0).abs() < 1e-9);

        let behind = spot.intensity_at(&Point3::new(0.0, 0.0, -1.0));
        assert!(behind.is_black());
    }
}
