//! Ray representation, self-intersection offsets and glossy beams.

use crate::bounds::GridBounds;
use crate::material::GlossyBeam;
use crate::GeoHit;
use lumen_math::{align_zero, is_zero, orthogonal, try_normalize, Dir3, Point3, Result, Vec3};
use rand::Rng;
use std::f64::consts::TAU;

/// Distance a secondary ray origin is pushed off the surface it leaves.
pub const RAY_OFFSET: f64 = 1e-5;

/// A ray in 3D space defined by origin and unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
}

impl Ray {
    /// Create a ray from an origin and a direction.
    pub fn new(origin: Point3, direction: Dir3) -> Self {
        Self { origin, direction }
    }

    /// Ray from `origin` aimed at `target`. Fails when the points coincide.
    pub fn through(origin: Point3, target: &Point3) -> Result<Self> {
        Ok(Self::new(origin, try_normalize(target - origin)?))
    }

    /// Secondary ray leaving a surface at `head` with [`RAY_OFFSET`].
    ///
    /// See [`Ray::offset_by`].
    pub fn offset(head: Point3, direction: Dir3, normal: &Dir3) -> Self {
        Self::offset_by(head, direction, normal, RAY_OFFSET)
    }

    /// Secondary ray leaving a surface at `head`.
    ///
    /// The origin is moved `epsilon` along `normal`, toward the side the
    /// ray travels into (the sign of `normal · direction`), so the ray
    /// cannot re-hit its own surface at `t ≈ 0`. A direction tangent to
    /// the surface is not offset.
    pub fn offset_by(head: Point3, direction: Dir3, normal: &Dir3, epsilon: f64) -> Self {
        let nv = align_zero(normal.dot(direction.as_ref()));
        let origin = if nv == 0.0 {
            head
        } else {
            head + normal.as_ref() * epsilon.copysign(nv)
        };
        Self::new(origin, direction)
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    ///
    /// Returns the origin exactly when `t` is zero within tolerance.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        if is_zero(t) {
            self.origin
        } else {
            self.origin + t * self.direction.as_ref()
        }
    }

    /// The point of `points` nearest to the ray origin.
    pub fn closest_point(&self, points: &[Point3]) -> Option<Point3> {
        points
            .iter()
            .min_by(|a, b| {
                nalgebra::distance_squared(&self.origin, a)
                    .total_cmp(&nalgebra::distance_squared(&self.origin, b))
            })
            .copied()
    }

    /// The hit of `hits` nearest to the ray origin.
    pub fn closest_hit<'a>(&self, hits: impl IntoIterator<Item = GeoHit<'a>>) -> Option<GeoHit<'a>> {
        hits.into_iter().min_by(|a, b| a.t.total_cmp(&b.t))
    }

    /// Test ray-box intersection using the slab method.
    ///
    /// Returns `Some((t_min, t_max))`, the entry and exit parameters
    /// clamped to `t >= 0`, or `None` if the ray misses. The slabs are
    /// closed, so rays grazing an edge or corner of the box still hit.
    /// An axis the ray is parallel to only constrains the origin.
    pub fn intersect_bounds(&self, bounds: &GridBounds) -> Option<(f64, f64)> {
        let (lo, hi) = (bounds.min_point(), bounds.max_point());
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.direction[axis];
            if d == 0.0 {
                if o < lo[axis] || o > hi[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (t1, t2) = ((lo[axis] - o) * inv, (hi[axis] - o) * inv);
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }
        if t_max >= t_min && t_max >= 0.0 {
            Some((t_min.max(0.0), t_max))
        } else {
            None
        }
    }

    /// Bundle of rays approximating a glossy lobe around this ray.
    ///
    /// The first element is always `self`. With a beam of `n > 1` rays,
    /// `n - 1` extra directions aim at uniformly random points on a disk
    /// of `radius` centred `distance` along the ray and perpendicular to
    /// it. Jittered rays that cross to the other side of the surface
    /// with normal `normal` are dropped.
    pub fn beam<R: Rng + ?Sized>(
        &self,
        normal: &Dir3,
        glossy: Option<&GlossyBeam>,
        rng: &mut R,
    ) -> Vec<Ray> {
        let glossy = match glossy {
            Some(g) if g.rays > 1 => g,
            _ => return vec![*self],
        };

        let mut rays = Vec::with_capacity(glossy.rays as usize);
        rays.push(*self);

        let nv = align_zero(normal.dot(self.direction.as_ref()));
        if nv == 0.0 {
            return rays;
        }

        let d = self.direction.as_ref();
        let u = orthogonal(&self.direction);
        let w = d.cross(u.as_ref());
        let center = self.origin + d * glossy.distance;

        for _ in 1..glossy.rays {
            let r = glossy.radius * rng.random::<f64>().sqrt();
            let (sin, cos) = (TAU * rng.random::<f64>()).sin_cos();
            let offset: Vec3 = u.as_ref() * (r * cos) + w * (r * sin);
            let Ok(dir) = try_normalize(center + offset - self.origin) else {
                continue;
            };
            let nt = align_zero(normal.dot(dir.as_ref()));
            if nv * nt > 0.0 {
                rays.push(Ray::new(self.origin, dir));
            }
        }
        rays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn dir(x: f64, y: f64, z: f64) -> Dir3 {
        Dir3::new_normalize(Vec3::new(x, y, z))
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3::origin(), dir(1.0, 0.0, 0.0));
        let p = ray.at(5.0);
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
        assert_eq!(ray.at(1e-12), ray.origin);
    }

    #[test]
    fn test_through_coincident_points_fails() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!(Ray::through(p, &p).is_err());
        let ray = Ray::through(p, &Point3::new(1.0, 2.0, 0.0)).unwrap();
        assert!((ray.direction.z + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_offset_follows_direction_side() {
        let n = dir(0.0, 0.0, 1.0);
        let head = Point3::origin();

        let out = Ray::offset(head, dir(1.0, 0.0, 1.0), &n);
        assert!((out.origin.z - RAY_OFFSET).abs() < 1e-15);

        let into = Ray::offset(head, dir(1.0, 0.0, -1.0), &n);
        assert!((into.origin.z + RAY_OFFSET).abs() < 1e-15);

        let tangent = Ray::offset(head, dir(1.0, 0.0, 0.0), &n);
        assert_eq!(tangent.origin, head);
    }

    #[test]
    fn test_closest_point() {
        let ray = Ray::new(Point3::origin(), dir(1.0, 0.0, 0.0));
        let pts = [
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        ];
        assert_eq!(ray.closest_point(&pts), Some(pts[1]));
        assert_eq!(ray.closest_point(&[]), None);
    }

    #[test]
    fn test_ray_bounds_hit() {
        let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), dir(1.0, 0.0, 0.0));
        let b = GridBounds::new([0, 0, 0], [1, 1, 1]);
        let (t_min, t_max) = ray.intersect_bounds(&b).unwrap();
        assert!((t_min - 5.0).abs() < 1e-10);
        assert!((t_max - 6.0).abs() < 1e-10);

        let inside = Ray::new(Point3::new(0.5, 0.5, 0.5), dir(0.0, 0.0, -1.0));
        let (t_min, t_max) = inside.intersect_bounds(&b).unwrap();
        assert_eq!(t_min, 0.0);
        assert!((t_max - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_ray_bounds_miss() {
        let b = GridBounds::new([0, 0, 0], [1, 1, 1]);
        let beside = Ray::new(Point3::new(-5.0, 2.0, 0.5), dir(1.0, 0.0, 0.0));
        assert!(beside.intersect_bounds(&b).is_none());
        let behind = Ray::new(Point3::new(5.0, 0.5, 0.5), dir(1.0, 0.0, 0.0));
        assert!(behind.intersect_bounds(&b).is_none());
    }

    #[test]
    fn test_ray_bounds_through_edge_and_corner() {
        let b = GridBounds::new([-1, -1, -1], [1, 1, 1]);

        // enters on the x = -1, y = -1 edge
        let edge = Ray::new(Point3::new(-3.0, -3.0, 0.0), dir(1.0, 1.0, 0.0));
        let (t_min, t_max) = edge.intersect_bounds(&b).unwrap();
        assert!((t_min - 2.0 * 2f64.sqrt()).abs() < 1e-10);
        assert!((t_max - 4.0 * 2f64.sqrt()).abs() < 1e-10);

        // touches only the corner (1, 1, 1)
        let corner = Ray::new(Point3::new(2.0, 2.0, 0.0), dir(-1.0, -1.0, 1.0));
        let (t_min, t_max) = corner.intersect_bounds(&b).unwrap();
        assert!((t_min - t_max).abs() < 1e-10);
        assert!((corner.at(t_min) - Point3::new(1.0, 1.0, 1.0)).norm() < 1e-10);
    }

    #[test]
    fn test_single_ray_beam() {
        let ray = Ray::new(Point3::origin(), dir(0.0, 0.0, -1.0));
        let n = dir(0.0, 0.0, 1.0);
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(ray.beam(&n, None, &mut rng), vec![ray]);
        let one = GlossyBeam::new(1, 10.0, 1.0).unwrap();
        assert_eq!(ray.beam(&n, Some(&one), &mut rng), vec![ray]);
    }

    #[test]
    fn test_beam_stays_on_ray_side() {
        let ray = Ray::new(Point3::origin(), dir(1.0, 0.0, 0.2));
        let n = dir(0.0, 0.0, 1.0);
        let glossy = GlossyBeam::new(64, 1.0, 2.0).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let beam = ray.beam(&n, Some(&glossy), &mut rng);

        assert_eq!(beam[0], ray);
        assert!(beam.len() > 1 && beam.len() <= 64);
        for r in &beam {
            assert_eq!(r.origin, ray.origin);
            assert!(r.direction.dot(n.as_ref()) > 0.0);
            assert!((r.direction.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_beam_is_deterministic_for_seed() {
        let ray = Ray::new(Point3::origin(), dir(0.0, 1.0, 1.0));
        let n = dir(0.0, 1.0, 0.0);
        let glossy = GlossyBeam::new(8, 5.0, 0.5).unwrap();
        let a = ray.beam(&n, Some(&glossy), &mut SmallRng::seed_from_u64(3));
        let b = ray.beam(&n, Some(&glossy), &mut SmallRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
