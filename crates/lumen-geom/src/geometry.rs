//! Renderable geometries, composites and hits.

use crate::{GridBounds, Material, Ray, Surface};
use lumen_math::{points_equal, Color, Dir3, Point3};

/// A surface together with its appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Analytic shape.
    pub surface: Surface,
    /// Self-emitted radiance.
    pub emission: Color,
    /// Reflectance parameters.
    pub material: Material,
}

impl Geometry {
    /// Black, non-emissive geometry with the default material.
    pub fn new(surface: impl Into<Surface>) -> Self {
        Self {
            surface: surface.into(),
            emission: Color::BLACK,
            material: Material::default(),
        }
    }

    /// Set the emission.
    pub fn with_emission(mut self, emission: Color) -> Self {
        self.emission = emission;
        self
    }

    /// Set the material.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Every hit in `(0, max_distance]`, sorted by t.
    pub fn find_hits(&self, ray: &Ray, max_distance: f64) -> Vec<GeoHit<'_>> {
        self.surface
            .intersect(ray, max_distance)
            .into_iter()
            .map(|t| GeoHit {
                geometry: self,
                point: ray.at(t),
                t,
            })
            .collect()
    }

    /// Nearest hit, if any.
    pub fn find_closest(&self, ray: &Ray) -> Option<GeoHit<'_>> {
        self.find_hits(ray, f64::INFINITY).into_iter().next()
    }

    /// Outward unit normal at `p`.
    pub fn normal_at(&self, p: &Point3) -> Dir3 {
        self.surface.normal_at(p)
    }

    /// Integer bounds, `None` for unbounded surfaces.
    pub fn bounds(&self) -> Option<GridBounds> {
        self.surface.bounds()
    }
}

/// Intersection of a ray with a specific geometry.
///
/// Two hits are equal when they refer to the same geometry instance and
/// coincide in space.
#[derive(Debug, Clone, Copy)]
pub struct GeoHit<'a> {
    /// Geometry that was hit.
    pub geometry: &'a Geometry,
    /// Hit point.
    pub point: Point3,
    /// Ray parameter of the hit.
    pub t: f64,
}

impl GeoHit<'_> {
    /// Outward normal of the hit geometry at the hit point.
    pub fn normal(&self) -> Dir3 {
        self.geometry.normal_at(&self.point)
    }
}

impl PartialEq for GeoHit<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.geometry, other.geometry) && points_equal(&self.point, &other.point)
    }
}

/// Either a single geometry or a nested composite.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Leaf geometry.
    Geometry(Geometry),
    /// Group of shapes intersected as one.
    Composite(Geometries),
}

impl Shape {
    /// Every hit in `(0, max_distance]`.
    pub fn find_hits(&self, ray: &Ray, max_distance: f64) -> Vec<GeoHit<'_>> {
        match self {
            Shape::Geometry(g) => g.find_hits(ray, max_distance),
            Shape::Composite(c) => c.find_hits(ray, max_distance),
        }
    }

    /// Integer bounds; see [`Geometries::bounds`] for composites.
    pub fn bounds(&self) -> Option<GridBounds> {
        match self {
            Shape::Geometry(g) => g.bounds(),
            Shape::Composite(c) => c.bounds(),
        }
    }
}

impl From<Geometry> for Shape {
    fn from(g: Geometry) -> Self {
        Shape::Geometry(g)
    }
}

impl From<Geometries> for Shape {
    fn from(c: Geometries) -> Self {
        Shape::Composite(c)
    }
}

/// Ordered collection of shapes, intersected by linear scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometries {
    shapes: Vec<Shape>,
}

impl Geometries {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape.
    pub fn add(&mut self, shape: impl Into<Shape>) -> &mut Self {
        self.shapes.push(shape.into());
        self
    }

    /// Builder-style [`Geometries::add`].
    pub fn with(mut self, shape: impl Into<Shape>) -> Self {
        self.add(shape);
        self
    }

    /// Remove and return the shape at `index`, if present.
    pub fn remove(&mut self, index: usize) -> Option<Shape> {
        (index < self.shapes.len()).then(|| self.shapes.remove(index))
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// `true` when there are no children.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Direct children in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    /// All leaf geometries, depth first, in insertion order.
    pub fn leaves(&self) -> Vec<&Geometry> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Geometry>) {
        for shape in &self.shapes {
            match shape {
                Shape::Geometry(g) => out.push(g),
                Shape::Composite(c) => c.collect_leaves(out),
            }
        }
    }

    /// Hits from every child, concatenated in child order.
    pub fn find_hits(&self, ray: &Ray, max_distance: f64) -> Vec<GeoHit<'_>> {
        self.shapes
            .iter()
            .flat_map(|s| s.find_hits(ray, max_distance))
            .collect()
    }

    /// Nearest hit over all children.
    pub fn find_closest(&self, ray: &Ray) -> Option<GeoHit<'_>> {
        ray.closest_hit(self.find_hits(ray, f64::INFINITY))
    }

    /// Union of the bounded children's bounds.
    ///
    /// Unbounded children are skipped; `None` when no child is bounded.
    pub fn bounds(&self) -> Option<GridBounds> {
        self.shapes
            .iter()
            .filter_map(Shape::bounds)
            .reduce(|a, b| a.union(&b))
    }
}

impl<'a> IntoIterator for &'a Geometries {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Plane, Polygon, Sphere};
    use lumen_math::Vec3;

    fn down() -> Ray {
        Ray::new(Point3::origin(), Dir3::new_normalize(-Vec3::z()))
    }

    fn sphere_at(z: f64, r: f64) -> Geometry {
        Geometry::new(Sphere::new(Point3::new(0.0, 0.0, z), r).unwrap())
    }

    #[test]
    fn test_geometry_hits_carry_points() {
        let g = sphere_at(-3.0, 1.0);
        let hits = g.find_hits(&down(), f64::INFINITY);
        assert_eq!(hits.len(), 2);
        assert!((hits[0].t - 2.0).abs() < 1e-12);
        assert!((hits[0].point.z + 2.0).abs() < 1e-12);
        assert!(std::ptr::eq(hits[0].geometry, &g));
        assert!((hits[0].normal().z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_geo_hit_identity() {
        let a = sphere_at(-3.0, 1.0);
        let b = sphere_at(-3.0, 1.0);
        let ha = a.find_closest(&down()).unwrap();
        let hb = b.find_closest(&down()).unwrap();
        assert_eq!(ha, a.find_closest(&down()).unwrap());
        assert_ne!(ha, hb);
    }

    #[test]
    fn test_composite_concatenates_and_finds_closest() {
        let mut scene = Geometries::new();
        scene
            .add(sphere_at(-10.0, 1.0))
            .add(sphere_at(-3.0, 1.0))
            .add(Geometry::new(Plane::new(Point3::new(0.0, 0.0, -20.0), Vec3::z()).unwrap()));

        let hits = scene.find_hits(&down(), f64::INFINITY);
        assert_eq!(hits.len(), 5);
        let closest = scene.find_closest(&down()).unwrap();
        assert!((closest.t - 2.0).abs() < 1e-12);

        assert_eq!(scene.find_hits(&down(), 5.0).len(), 2);
    }

    #[test]
    fn test_nested_leaves_and_remove() {
        let inner = Geometries::new()
            .with(sphere_at(-3.0, 1.0))
            .with(sphere_at(-6.0, 1.0));
        let mut outer = Geometries::new().with(sphere_at(-9.0, 1.0)).with(inner);
        assert_eq!(outer.len(), 2);
        assert_eq!(outer.leaves().len(), 3);
        assert_eq!(outer.find_hits(&down(), f64::INFINITY).len(), 6);

        assert!(matches!(outer.remove(1), Some(Shape::Composite(_))));
        assert!(outer.remove(5).is_none());
        assert_eq!(outer.leaves().len(), 1);
    }

    #[test]
    fn test_bounds_skip_unbounded() {
        let tri = Polygon::triangle(
            Point3::new(-1.0, -1.0, -2.0),
            Point3::new(1.0, -1.0, -2.0),
            Point3::new(0.0, 1.0, -2.0),
        )
        .unwrap();
        let scene = Geometries::new()
            .with(sphere_at(-10.0, 2.0))
            .with(Geometry::new(tri))
            .with(Geometry::new(Plane::new(Point3::origin(), Vec3::y()).unwrap()));
        let b = scene.bounds().unwrap();
        assert_eq!(b.min, [-2, -2, -12]);
        assert_eq!(b.max, [2, 2, -2]);

        let only_plane =
            Geometries::new().with(Geometry::new(Plane::new(Point3::origin(), Vec3::y()).unwrap()));
        assert!(only_plane.bounds().is_none());
    }
}
