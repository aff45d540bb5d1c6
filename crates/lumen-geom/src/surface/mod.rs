//! Analytic surfaces and their ray intersectors.
//!
//! Each surface type has a dedicated intersector returning the ray
//! parameters of every hit in `(0, max_distance]`, sorted ascending.
//! Numerically degenerate configurations (a ray parallel to a plane,
//! tangent to a sphere, ...) produce no hits rather than an error.

mod cylinder;
mod plane;
mod polygon;
mod sphere;
mod tube;

pub use cylinder::Cylinder;
pub use plane::Plane;
pub use polygon::Polygon;
pub use sphere::Sphere;
pub use tube::Tube;

use crate::{GridBounds, Ray};
use lumen_math::{Dir3, Point3};

/// One of the supported analytic surfaces.
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// Sphere.
    Sphere(Sphere),
    /// Infinite plane.
    Plane(Plane),
    /// Convex planar polygon (triangles included).
    Polygon(Polygon),
    /// Infinite cylinder around an axis.
    Tube(Tube),
    /// Capped finite cylinder.
    Cylinder(Cylinder),
}

impl Surface {
    /// Ray parameters of every hit in `(0, max_distance]`, sorted by t.
    ///
    /// This dispatches to the appropriate intersector based on surface type.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<f64> {
        match self {
            Surface::Sphere(s) => s.intersect(ray, max_distance),
            Surface::Plane(p) => p.intersect(ray, max_distance).into_iter().collect(),
            Surface::Polygon(p) => p.intersect(ray, max_distance).into_iter().collect(),
            Surface::Tube(t) => t.intersect(ray, max_distance),
            Surface::Cylinder(c) => c.intersect(ray, max_distance),
        }
    }

    /// Outward unit normal at a point assumed to lie on the surface.
    pub fn normal_at(&self, p: &Point3) -> Dir3 {
        match self {
            Surface::Sphere(s) => s.normal_at(p),
            Surface::Plane(pl) => pl.normal,
            Surface::Polygon(pg) => pg.plane().normal,
            Surface::Tube(t) => t.normal_at(p),
            Surface::Cylinder(c) => c.normal_at(p),
        }
    }

    /// Integer bounds, `None` for unbounded surfaces.
    pub fn bounds(&self) -> Option<GridBounds> {
        match self {
            Surface::Sphere(s) => Some(s.bounds()),
            Surface::Polygon(p) => Some(p.bounds()),
            Surface::Cylinder(c) => Some(c.bounds()),
            Surface::Plane(_) | Surface::Tube(_) => None,
        }
    }

    /// Human-readable type name.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Surface::Sphere(_) => "Sphere",
            Surface::Plane(_) => "Plane",
            Surface::Polygon(p) if p.is_triangle() => "Triangle",
            Surface::Polygon(_) => "Polygon",
            Surface::Tube(_) => "Tube",
            Surface::Cylinder(_) => "Cylinder",
        }
    }
}

impl From<Sphere> for Surface {
    fn from(s: Sphere) -> Self {
        Surface::Sphere(s)
    }
}

impl From<Plane> for Surface {
    fn from(p: Plane) -> Self {
        Surface::Plane(p)
    }
}

impl From<Polygon> for Surface {
    fn from(p: Polygon) -> Self {
        Surface::Polygon(p)
    }
}

impl From<Tube> for Surface {
    fn from(t: Tube) -> Self {
        Surface::Tube(t)
    }
}

impl From<Cylinder> for Surface {
    fn from(c: Cylinder) -> Self {
        Surface::Cylinder(c)
    }
}

/// Keep roots in `(0, max_distance]`, sorted ascending.
fn accept_roots(roots: impl IntoIterator<Item = f64>, max_distance: f64) -> Vec<f64> {
    let mut ts: Vec<f64> = roots
        .into_iter()
        .filter(|&t| t > 0.0 && t <= max_distance)
        .collect();
    ts.sort_by(f64::total_cmp);
    ts
}
