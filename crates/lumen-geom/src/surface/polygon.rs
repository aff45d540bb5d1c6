//! Convex planar polygons.

use super::Plane;
use crate::error::{GeometryError, Result};
use crate::{GridBounds, Ray};
use lumen_math::{align_zero, cross, is_zero, Point3};

/// A convex polygon with at least three coplanar vertices.
///
/// Vertices are stored in order; edges connect consecutive vertices and
/// the last vertex back to the first. A triangle is simply a polygon
/// with three vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point3>,
    plane: Plane,
}

impl Polygon {
    /// Create a polygon, checking vertex count, coplanarity and convexity.
    ///
    /// The polygon's normal follows the right-hand rule over the first
    /// three vertices.
    pub fn new(vertices: Vec<Point3>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }

        let plane = Plane::from_points(&vertices[0], &vertices[1], &vertices[2])?;
        let n = vertices.len();
        if n == 3 {
            return Ok(Self { vertices, plane });
        }

        let normal = plane.normal.into_inner();
        // Orientation of the closing corner decides the winding every
        // other corner must share.
        let mut edge1 = vertices[n - 1] - vertices[n - 2];
        let mut edge2 = vertices[0] - vertices[n - 1];
        let positive = edge1.cross(&edge2).dot(&normal) > 0.0;

        for i in 1..n {
            if !is_zero(plane.signed_distance(&vertices[i])) {
                return Err(GeometryError::NonCoplanar(i));
            }
            edge1 = edge2;
            edge2 = vertices[i] - vertices[i - 1];
            if positive != (edge1.cross(&edge2).dot(&normal) > 0.0) {
                return Err(GeometryError::NonConvex(i));
            }
        }

        Ok(Self { vertices, plane })
    }

    /// Triangle from three vertices.
    pub fn triangle(a: Point3, b: Point3, c: Point3) -> Result<Self> {
        Self::new(vec![a, b, c])
    }

    /// Vertices in order.
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Supporting plane.
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// `true` for three-vertex polygons.
    pub fn is_triangle(&self) -> bool {
        self.vertices.len() == 3
    }

    /// Intersect a ray with the polygon.
    ///
    /// The ray must first hit the supporting plane. The hit is inside when
    /// the ray direction sees every edge (as a triangle fanned from the
    /// ray origin) from the same side; a hit on an edge or vertex counts
    /// as a miss.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        let t = self.plane.intersect(ray, max_distance)?;

        let d = ray.direction.as_ref();
        let n = self.vertices.len();
        let mut side = 0.0;
        for i in 0..n {
            let a = self.vertices[i] - ray.origin;
            let b = self.vertices[(i + 1) % n] - ray.origin;
            let edge_normal = cross(&a, &b).ok()?;
            let s = align_zero(d.dot(&edge_normal));
            if s == 0.0 {
                return None;
            }
            if side == 0.0 {
                side = s.signum();
            } else if side != s.signum() {
                return None;
            }
        }
        Some(t)
    }

    /// Integer bounds of the vertices.
    pub fn bounds(&self) -> GridBounds {
        let mut lo = self.vertices[0];
        let mut hi = self.vertices[0];
        for v in &self.vertices[1..] {
            lo = lo.inf(v);
            hi = hi.sup(v);
        }
        GridBounds::from_extent(&lo, &hi)
    }
}
