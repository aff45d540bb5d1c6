//! Serializable render configuration.
//!
//! Every section has sensible defaults, so a config file only needs the
//! fields it changes.

use crate::error::{RenderError, Result};
use lumen_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Recursive tracer parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerOptions {
    /// Recursion depth cap for reflection and transmission.
    pub max_level: u32,
    /// Attenuation below which contributions are dropped.
    pub min_k: f64,
    /// Offset applied to secondary ray origins.
    pub epsilon: f64,
}

impl Default for TracerOptions {
    fn default() -> Self {
        Self {
            max_level: 10,
            min_k: 1e-3,
            epsilon: 1e-5,
        }
    }
}

impl TracerOptions {
    /// Validate ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_level == 0 {
            return Err(RenderError::InvalidConfig("max_level must be at least 1".into()));
        }
        if !(self.min_k > 0.0 && self.min_k < 1.0) {
            return Err(RenderError::InvalidConfig(format!(
                "min_k must be in (0, 1), got {}",
                self.min_k
            )));
        }
        if !(self.epsilon > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Scene acceleration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    /// Voxels per axis of the uniform grid.
    pub grid_resolution: usize,
    /// Build the voxel grid before rendering.
    pub accelerate: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            grid_resolution: 10,
            accelerate: true,
        }
    }
}

impl SceneOptions {
    /// Validate ranges.
    pub fn validate(&self) -> Result<()> {
        if self.grid_resolution == 0 {
            return Err(RenderError::InvalidConfig(
                "grid_resolution must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Camera placement and scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position.
    pub location: Point3,
    /// Viewing direction (ignored when `look_at` is set).
    pub to: Vec3,
    /// Up direction, orthogonal to `to` (ignored when `look_at` is set).
    pub up: Vec3,
    /// Aim at this point instead of using `to`/`up`.
    pub look_at: Option<Point3>,
    /// Roll around the viewing direction, in degrees.
    pub rotate_degrees: f64,
    /// Mirror the image horizontally.
    pub flip: bool,
    /// View plane width.
    pub width: f64,
    /// View plane height.
    pub height: f64,
    /// Eye to view plane distance.
    pub distance: f64,
    /// Thread mode: −2 auto, −1 stream, 0 serial, n ≥ 1 workers.
    pub threads: i32,
    /// Progress log interval in percent; 0 disables.
    pub progress_interval: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            location: Point3::new(0.0, 0.0, 1000.0),
            to: -Vec3::z(),
            up: Vec3::y(),
            look_at: None,
            rotate_degrees: 0.0,
            flip: false,
            width: 200.0,
            height: 200.0,
            distance: 1000.0,
            threads: -2,
            progress_interval: 10.0,
        }
    }
}

/// Output image parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// File stem of the output image.
    pub name: String,
    /// Horizontal resolution in pixels.
    pub width_px: usize,
    /// Vertical resolution in pixels.
    pub height_px: usize,
    /// Directory the image is written to.
    pub output_dir: PathBuf,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            name: "render".into(),
            width_px: 500,
            height_px: 500,
            output_dir: PathBuf::from("images"),
        }
    }
}

impl ImageConfig {
    /// Validate ranges.
    pub fn validate(&self) -> Result<()> {
        if self.width_px == 0 || self.height_px == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image resolution must be positive, got {}x{}",
                self.width_px, self.height_px
            )));
        }
        if self.name.is_empty() {
            return Err(RenderError::InvalidConfig("image name is empty".into()));
        }
        Ok(())
    }
}

/// Complete render configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Camera section.
    pub camera: CameraConfig,
    /// Tracer section.
    pub tracer: TracerOptions,
    /// Scene acceleration section.
    pub scene: SceneOptions,
    /// Output image section.
    pub image: ImageConfig,
}

impl RenderConfig {
    /// Validate every section. Camera geometry is checked when the
    /// camera is built.
    pub fn validate(&self) -> Result<()> {
        self.tracer.validate()?;
        self.scene.validate()?;
        self.image.validate()
    }
}
