//! Error types for scene setup and rendering.

use lumen_geom::GeometryError;
use thiserror::Error;

/// Errors that can occur while configuring or running a render.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A required camera or tracer field is absent or non-positive.
    #[error("missing or non-positive configuration: {0}")]
    ConfigMissing(&'static str),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Shape construction failed.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Reading or writing a file failed.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the output image failed.
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    /// A render worker panicked.
    #[error("render worker failed: {0}")]
    WorkerPanicked(String),
}

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;
