#![warn(missing_docs)]

//! Rays and intersectable shapes for the lumen ray tracer.
//!
//! Shapes are a closed set of analytic surfaces, so they are modelled as
//! a tagged enum rather than trait objects: intersection, normals and
//! bounds each dispatch on the tag.
//!
//! # Architecture
//!
//! - [`Ray`] - origin + unit direction, with the self-intersection offset
//!   constructor and glossy beam sampling
//! - [`surface`] - per-shape intersectors ([`Sphere`], [`Plane`],
//!   [`Polygon`], [`Tube`], [`Cylinder`])
//! - [`Geometry`] - a surface with its emission and [`Material`]
//! - [`Shape`] / [`Geometries`] - leaf geometries and nested composites
//! - [`GeoHit`] - a hit point tagged with the geometry it lies on
//! - [`GridBounds`] - integer axis-aligned bounds used by voxel indexing
//!
//! # Example
//!
//! ```
//! use lumen_geom::{Geometries, Geometry, Ray, Sphere};
//! use lumen_math::{Dir3, Point3, Vec3};
//!
//! let mut scene = Geometries::new();
//! scene.add(Geometry::new(Sphere::new(Point3::new(0.0, 0.0, -3.0), 1.0).unwrap()));
//!
//! let ray = Ray::new(Point3::origin(), Dir3::new_normalize(-Vec3::z()));
//! let hits = scene.find_hits(&ray, f64::INFINITY);
//! assert_eq!(hits.len(), 2);
//! ```

mod bounds;
mod error;
mod geometry;
mod material;
mod ray;
pub mod surface;

pub use bounds::GridBounds;
pub use error::{GeometryError, Result};
pub use geometry::{GeoHit, Geometries, Geometry, Shape};
pub use material::{GlossyBeam, Material};
pub use ray::{Ray, RAY_OFFSET};
pub use surface::{Cylinder, Plane, Polygon, Sphere, Surface, Tube};
