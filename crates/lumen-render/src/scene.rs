//! Scene: geometry, lights, background and an optional voxel grid.

use crate::error::{RenderError, Result};
use crate::grid::VoxelGrid;
use crate::light::{AmbientLight, LightSource};
use lumen_geom::{Geometries, Geometry, Shape};
use lumen_math::Color;

/// Default voxels per grid axis.
pub const DEFAULT_GRID_RESOLUTION: usize = 10;

/// Everything a tracer needs to shade rays.
///
/// The voxel grid is derived data: it is built on request and dropped
/// whenever the geometry changes.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Display name.
    pub name: String,
    /// Color of rays that hit nothing.
    pub background: Color,
    /// Ambient light.
    pub ambient: AmbientLight,
    /// Light sources.
    pub lights: Vec<LightSource>,
    geometries: Geometries,
    grid_resolution: usize,
    grid: Option<VoxelGrid>,
}

impl Scene {
    /// Empty scene with a black background and no lights.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: Color::BLACK,
            ambient: AmbientLight::NONE,
            lights: Vec::new(),
            geometries: Geometries::new(),
            grid_resolution: DEFAULT_GRID_RESOLUTION,
            grid: None,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Set the ambient light.
    pub fn with_ambient(mut self, ambient: AmbientLight) -> Self {
        self.ambient = ambient;
        self
    }

    /// Add a light.
    pub fn with_light(mut self, light: impl Into<LightSource>) -> Self {
        self.lights.push(light.into());
        self
    }

    /// Add a geometry or composite.
    pub fn with_geometry(mut self, shape: impl Into<Shape>) -> Self {
        self.add_geometry(shape);
        self
    }

    /// Replace the geometry collection.
    pub fn with_geometries(mut self, geometries: Geometries) -> Self {
        self.geometries = geometries;
        self.grid = None;
        self
    }

    /// Set the voxel grid resolution. Fails on zero.
    pub fn with_grid_resolution(mut self, resolution: usize) -> Result<Self> {
        if resolution == 0 {
            return Err(RenderError::InvalidConfig(
                "grid resolution must be at least 1".into(),
            ));
        }
        self.grid_resolution = resolution;
        self.grid = None;
        Ok(self)
    }

    /// Root geometry collection.
    pub fn geometries(&self) -> &Geometries {
        &self.geometries
    }

    /// Mutable access to the geometry; drops any built grid.
    pub fn geometries_mut(&mut self) -> &mut Geometries {
        self.grid = None;
        &mut self.geometries
    }

    /// Append a shape; drops any built grid.
    pub fn add_geometry(&mut self, shape: impl Into<Shape>) {
        self.geometries_mut().add(shape);
    }

    /// Flattened leaf geometries, in the order the grid indexes them.
    pub fn leaves(&self) -> Vec<&Geometry> {
        self.geometries.leaves()
    }

    /// Configured grid resolution.
    pub fn grid_resolution(&self) -> usize {
        self.grid_resolution
    }

    /// Build (or rebuild) the voxel grid over the current geometry.
    pub fn build_grid(&mut self) -> Result<&VoxelGrid> {
        let grid = VoxelGrid::build(&self.geometries.leaves(), self.grid_resolution)?;
        log::info!(
            "scene {:?}: grid built for {} geometries",
            self.name,
            self.geometries.leaves().len()
        );
        Ok(self.grid.insert(grid))
    }

    /// The built grid, if any.
    pub fn grid(&self) -> Option<&VoxelGrid> {
        self.grid.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::PointLight;
    use lumen_geom::Sphere;
    use lumen_math::Point3;

    fn ball(z: f64) -> Geometry {
        Geometry::new(Sphere::new(Point3::new(0.0, 0.0, z), 1.0).unwrap())
    }

    #[test]
    fn test_builder() {
        let scene = Scene::new("test")
            .with_background(Color::new(10.0, 20.0, 30.0))
            .with_ambient(AmbientLight::new(Color::WHITE, 0.1))
            .with_light(PointLight::new(Color::WHITE, Point3::origin()))
            .with_geometry(ball(-3.0))
            .with_geometry(Geometries::new().with(ball(-6.0)).with(ball(-9.0)));

        assert_eq!(scene.name, "test");
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.geometries().len(), 2);
        assert_eq!(scene.leaves().len(), 3);
        assert_eq!(scene.grid_resolution(), DEFAULT_GRID_RESOLUTION);
        assert!(scene.grid().is_none());
    }

    #[test]
    fn test_zero_resolution_rejected() {
        assert!(matches!(
            Scene::new("s").with_grid_resolution(0),
            Err(RenderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_grid_invalidated_by_edits() {
        let mut scene = Scene::new("s")
            .with_geometry(ball(-3.0))
            .with_grid_resolution(4)
            .unwrap();
        assert_eq!(scene.build_grid().unwrap().resolution(), 4);
        assert!(scene.grid().is_some());

        scene.add_geometry(ball(-8.0));
        assert!(scene.grid().is_none());

        scene.build_grid().unwrap();
        scene.geometries_mut().remove(0);
        assert!(scene.grid().is_none());
    }
}
