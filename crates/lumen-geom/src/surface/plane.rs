//! Ray-plane intersection.

use crate::error::{GeometryError, Result};
use crate::Ray;
use lumen_math::{align_zero, cross, points_equal, try_normalize, Dir3, MathError, Point3, Vec3};

/// An infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// A point on the plane.
    pub point: Point3,
    /// Unit normal.
    pub normal: Dir3,
}

impl Plane {
    /// Plane through `point` perpendicular to `normal`.
    pub fn new(point: Point3, normal: Vec3) -> Result<Self> {
        Ok(Self {
            point,
            normal: try_normalize(normal)?,
        })
    }

    /// Plane through three points, normal `(p2 − p1) × (p3 − p1)`.
    ///
    /// Fails when the points are collinear or any two coincide.
    pub fn from_points(p1: &Point3, p2: &Point3, p3: &Point3) -> Result<Self> {
        let normal = cross(&(p2 - p1), &(p3 - p1)).map_err(|e| match e {
            MathError::ParallelVectors => GeometryError::CollinearVertices,
            other => GeometryError::Math(other),
        })?;
        Ok(Self { point: *p1, normal })
    }

    /// Signed distance of `p` from the plane along the normal.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&(p - self.point))
    }

    /// Intersect a ray with the plane.
    ///
    /// Returns `None` when the ray is parallel to the plane, starts at the
    /// plane's reference point, or the hit is outside `(0, max_distance]`.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        if points_equal(&ray.origin, &self.point) {
            return None;
        }

        let denom = align_zero(self.normal.dot(ray.direction.as_ref()));
        if denom == 0.0 {
            return None;
        }

        let t = align_zero(self.normal.dot(&(self.point - ray.origin)) / denom);
        (t > 0.0 && t <= max_distance).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Plane {
        Plane::new(Point3::new(0.0, 0.0, -2.0), Vec3::z()).unwrap()
    }

    fn ray(o: [f64; 3], d: [f64; 3]) -> Ray {
        Ray::new(
            Point3::new(o[0], o[1], o[2]),
            Dir3::new_normalize(Vec3::new(d[0], d[1], d[2])),
        )
    }

    #[test]
    fn test_zero_normal_rejected() {
        assert!(Plane::new(Point3::origin(), Vec3::zeros()).is_err());
    }

    #[test]
    fn test_from_points() {
        let p = Plane::from_points(
            &Point3::new(0.0, 0.0, 1.0),
            &Point3::new(1.0, 0.0, 1.0),
            &Point3::new(0.0, 1.0, 1.0),
        )
        .unwrap();
        assert!((p.normal.z - 1.0).abs() < 1e-12);

        let collinear = Plane::from_points(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 1.0, 1.0),
            &Point3::new(2.0, 2.0, 2.0),
        );
        assert_eq!(collinear, Err(GeometryError::CollinearVertices));

        let coincident = Plane::from_points(
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(2.0, 2.0, 2.0),
        );
        assert!(coincident.is_err());
    }

    #[test]
    fn test_ray_plane_hit() {
        let t = floor().intersect(&ray([1.0, 1.0, 0.0], [0.0, 0.0, -1.0]), f64::INFINITY);
        assert!((t.unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_ray_plane_hit_lies_on_plane() {
        let p = floor();
        let r = ray([0.3, -0.7, 4.0], [0.2, 0.5, -1.0]);
        let t = p.intersect(&r, f64::INFINITY).unwrap();
        assert!(p.signed_distance(&r.at(t)).abs() < 1e-10);
    }

    #[test]
    fn test_ray_parallel_misses() {
        assert!(floor().intersect(&ray([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]), f64::INFINITY).is_none());
        assert!(floor().intersect(&ray([0.0, 0.0, -2.0], [1.0, 1.0, 0.0]), f64::INFINITY).is_none());
    }

    #[test]
    fn test_ray_away_and_beyond_max() {
        let p = floor();
        assert!(p.intersect(&ray([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]), f64::INFINITY).is_none());
        assert!(p.intersect(&ray([0.0, 0.0, 0.0], [0.0, 0.0, -1.0]), 1.0).is_none());
    }

    #[test]
    fn test_ray_from_reference_point() {
        let p = floor();
        assert!(p.intersect(&ray([0.0, 0.0, -2.0], [0.0, 0.0, -1.0]), f64::INFINITY).is_none());
    }

    #[test]
    fn test_ray_on_plane_has_no_zero_hit() {
        let p = floor();
        assert!(p.intersect(&ray([5.0, 0.0, -2.0], [0.0, 1.0, -1.0]), f64::INFINITY).is_none());
    }
}
