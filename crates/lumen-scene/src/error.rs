//! Error types for scene files.

use lumen_geom::GeometryError;
use thiserror::Error;

/// Errors that can occur while reading or writing a scene file.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Malformed JSON, or attributes of the wrong shape.
    #[error("invalid scene json: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing the file failed.
    #[error("scene file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// Attributes describe a degenerate shape or light.
    #[error("degenerate geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// Well-formed JSON with a value the scene cannot hold.
    #[error("invalid scene: {0}")]
    Invalid(String),
}

/// Result type for scene file operations.
pub type Result<T> = std::result::Result<T, SceneError>;
