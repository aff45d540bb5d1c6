//! Ray-tube (infinite cylinder) intersection.

use super::accept_roots;
use crate::error::{GeometryError, Result};
use crate::Ray;
use lumen_math::{align_zero, points_equal, try_normalize, Dir3, Point3, Vec3};

/// An infinite circular cylinder of `radius` around `axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tube {
    /// Axis ray; its origin anchors axial coordinates.
    pub axis: Ray,
    /// Radius (> 0).
    pub radius: f64,
}

impl Tube {
    /// Create a tube. The radius must be positive.
    pub fn new(axis: Ray, radius: f64) -> Result<Self> {
        if !(radius > 0.0) {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Self { axis, radius })
    }

    /// Axial coordinate of `p`: signed distance along the axis from its origin.
    pub fn axial(&self, p: &Point3) -> f64 {
        self.axis.direction.dot(&(p - self.axis.origin))
    }

    /// Intersect a ray with the tube surface.
    ///
    /// Solves `|perp(o + t·d − axis.origin)|² = r²` where `perp` removes
    /// the axial component. Rays parallel to the axis and tangent rays
    /// give no hit. Results are sorted by t.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<f64> {
        let a = self.axis.direction.as_ref();
        let d = ray.direction.as_ref();
        let oc = ray.origin - self.axis.origin;

        let d_perp = d - a * d.dot(a);
        let oc_perp = oc - a * oc.dot(a);

        let qa = align_zero(d_perp.norm_squared());
        if qa == 0.0 {
            return Vec::new();
        }
        let qb = 2.0 * oc_perp.dot(&d_perp);
        let qc = oc_perp.norm_squared() - self.radius * self.radius;

        let disc = align_zero(qb * qb - 4.0 * qa * qc);
        if disc <= 0.0 {
            return Vec::new();
        }

        let sqrt_disc = disc.sqrt();
        accept_roots(
            [
                align_zero((-qb - sqrt_disc) / (2.0 * qa)),
                align_zero((-qb + sqrt_disc) / (2.0 * qa)),
            ],
            max_distance,
        )
    }

    /// Outward normal at `p`.
    ///
    /// At the axis origin itself the normal is taken as `−axis.direction`.
    pub fn normal_at(&self, p: &Point3) -> Dir3 {
        if points_equal(p, &self.axis.origin) {
            return -self.axis.direction;
        }
        let foot = self.axis.at(self.axial(p));
        try_normalize(p - foot).unwrap_or(-self.axis.direction)
    }

    /// Radial distance of `p` from the axis.
    pub fn radial_distance(&self, p: &Point3) -> f64 {
        let v: Vec3 = p - self.axis.origin;
        let a = self.axis.direction.as_ref();
        (v - a * v.dot(a)).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z_tube(radius: f64) -> Tube {
        Tube::new(
            Ray::new(Point3::origin(), Dir3::new_normalize(Vec3::z())),
            radius,
        )
        .unwrap()
    }

    fn ray(o: [f64; 3], d: [f64; 3]) -> Ray {
        Ray::new(
            Point3::new(o[0], o[1], o[2]),
            Dir3::new_normalize(Vec3::new(d[0], d[1], d[2])),
        )
    }

    #[test]
    fn test_non_positive_radius() {
        assert!(Tube::new(ray([0.0; 3], [0.0, 0.0, 1.0]), 0.0).is_err());
    }

    #[test]
    fn test_ray_tube_perpendicular() {
        let tube = z_tube(5.0);
        let hits = tube.intersect(&ray([-10.0, 0.0, 3.0], [1.0, 0.0, 0.0]), f64::INFINITY);
        assert_eq!(hits.len(), 2);
        assert!((hits[0] - 5.0).abs() < 1e-10);
        assert!((hits[1] - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_hits_ascending_on_oblique_ray() {
        let tube = z_tube(1.0);
        let r = ray([3.0, 0.5, -4.0], [-1.0, 0.0, 0.7]);
        let hits = tube.intersect(&r, f64::INFINITY);
        assert_eq!(hits.len(), 2);
        assert!(hits[0] < hits[1]);
        for t in hits {
            assert!((tube.radial_distance(&r.at(t)) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ray_parallel_to_axis() {
        let tube = z_tube(5.0);
        assert!(tube.intersect(&ray([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]), f64::INFINITY).is_empty());
    }

    #[test]
    fn test_ray_tangent_and_miss() {
        let tube = z_tube(1.0);
        assert!(tube.intersect(&ray([-5.0, 1.0, 0.0], [1.0, 0.0, 0.0]), f64::INFINITY).is_empty());
        assert!(tube.intersect(&ray([-5.0, 2.0, 0.0], [1.0, 0.0, 0.0]), f64::INFINITY).is_empty());
    }

    #[test]
    fn test_ray_from_inside() {
        let tube = z_tube(2.0);
        let hits = tube.intersect(&ray([0.0, 0.0, 7.0], [0.0, 1.0, 0.0]), f64::INFINITY);
        assert_eq!(hits.len(), 1);
        assert!((hits[0] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_normal() {
        let tube = z_tube(1.0);
        let n = tube.normal_at(&Point3::new(0.0, 1.0, 4.0));
        assert!((n.y - 1.0).abs() < 1e-12);
        assert!(n.z.abs() < 1e-12);

        let at_origin = tube.normal_at(&Point3::origin());
        assert!((at_origin.z + 1.0).abs() < 1e-12);
    }
}
