//! Ray-sphere intersection (geometric method).

use super::accept_roots;
use crate::error::{GeometryError, Result};
use crate::{GridBounds, Ray};
use lumen_math::{align_zero, points_equal, try_normalize, Dir3, Point3, Vec3};

/// A sphere given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center point.
    pub center: Point3,
    /// Radius (> 0).
    pub radius: f64,
}

impl Sphere {
    /// Create a sphere. The radius must be positive.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        if !(radius > 0.0) {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Self { center, radius })
    }

    /// Intersect a ray with the sphere.
    ///
    /// Returns up to 2 parameters sorted by t. A tangent ray gives no hit.
    /// A ray starting exactly at the center hits once at `t = radius`.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<f64> {
        if points_equal(&ray.origin, &self.center) {
            return accept_roots([self.radius], max_distance);
        }

        let u = self.center - ray.origin;
        let tm = ray.direction.dot(&u);
        let d_sq = u.norm_squared() - tm * tm;
        let th_sq = align_zero(self.radius * self.radius - d_sq);
        if th_sq <= 0.0 {
            return Vec::new();
        }

        let th = th_sq.sqrt();
        accept_roots(
            [align_zero(tm - th), align_zero(tm + th)],
            max_distance,
        )
    }

    /// Outward normal at `p`.
    pub fn normal_at(&self, p: &Point3) -> Dir3 {
        // The center has no defined normal; any unit vector will do.
        try_normalize(p - self.center).unwrap_or_else(|_| Dir3::new_unchecked(Vec3::z()))
    }

    /// Integer bounds of the enclosing cube.
    pub fn bounds(&self) -> GridBounds {
        let r = Vec3::repeat(self.radius);
        GridBounds::from_extent(&(self.center - r), &(self.center + r))
    }
}
