#![warn(missing_docs)]

//! Scenes, lighting and rendering for the lumen ray tracer.
//!
//! # Architecture
//!
//! - [`Scene`] - geometry, lights, background, ambient and an optional
//!   [`VoxelGrid`]
//! - [`Accelerator`] - closest-hit and occluder queries, answered by
//!   [`LinearScan`] or [`VoxelGrid`] (3D-DDA traversal)
//! - [`RayTracer`] - recursive Phong shading with transparency shadows,
//!   reflection, transmission and glossy beams
//! - [`Camera`] / [`CameraBuilder`] - view plane, primary rays and the
//!   render loop
//! - [`render_pixels`] / [`Threads`] - serial, rayon or scoped-worker
//!   pixel scheduling
//! - [`ImageSink`] - [`ImageWriter`] (PNG) and [`FrameBuffer`] (memory)
//!
//! # Example
//!
//! ```
//! use lumen_geom::{Geometry, Sphere};
//! use lumen_math::{Color, Point3};
//! use lumen_render::{Camera, FrameBuffer, PointLight, RayTracer, Scene};
//!
//! let mut scene = Scene::new("ball")
//!     .with_geometry(
//!         Geometry::new(Sphere::new(Point3::new(0.0, 0.0, -5.0), 1.0).unwrap())
//!             .with_emission(Color::RED),
//!     )
//!     .with_light(PointLight::new(Color::WHITE, Point3::new(0.0, 5.0, 0.0)));
//! scene.build_grid().unwrap();
//!
//! let tracer = RayTracer::new(&scene);
//! let mut image = FrameBuffer::new(8, 8);
//! Camera::builder()
//!     .view_plane_size(1.0, 1.0)
//!     .view_plane_distance(1.0)
//!     .image_writer(&mut image)
//!     .ray_tracer(&tracer)
//!     .build()
//!     .unwrap()
//!     .render_image()
//!     .unwrap();
//! assert!(!image.pixel(4, 4).unwrap().is_black());
//! ```

mod accel;
mod camera;
mod config;
mod error;
mod grid;
mod light;
mod render;
mod scene;
mod sink;
mod tracer;

pub use accel::{Accelerator, LinearScan};
pub use camera::{Camera, CameraBuilder, ViewPlane};
pub use config::{CameraConfig, ImageConfig, RenderConfig, SceneOptions, TracerOptions};
pub use error::{RenderError, Result};
pub use grid::{VoxelGrid, VoxelIndex};
pub use light::{AmbientLight, DirectionalLight, LightSource, PointLight, SpotLight};
pub use render::{render_pixels, Threads, SPARE_CORES};
pub use scene::{Scene, DEFAULT_GRID_RESOLUTION};
pub use sink::{FrameBuffer, ImageSink, ImageWriter};
pub use tracer::{RayTracer, SampleKey, TraceRay};
