//! Error types for shape construction.

use lumen_math::MathError;
use thiserror::Error;

/// A shape or material was given parameters that describe nothing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Radius must be strictly positive.
    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    /// Height must be strictly positive.
    #[error("height must be positive, got {0}")]
    NonPositiveHeight(f64),

    /// A polygon needs at least three vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    /// The first three vertices lie on a single line (or coincide).
    #[error("vertices are collinear")]
    CollinearVertices,

    /// A polygon vertex lies off the plane of the first three.
    #[error("vertex {0} is not on the polygon plane")]
    NonCoplanar(usize),

    /// Polygon vertices are not in convex order.
    #[error("polygon is not convex at vertex {0}")]
    NonConvex(usize),

    /// Glossy beam parameters out of range.
    #[error("invalid glossy beam: {0}")]
    InvalidGlossyBeam(String),

    /// Underlying vector operation failed.
    #[error(transparent)]
    Math(#[from] MathError),
}

/// Result type for geometry construction.
pub type Result<T> = std::result::Result<T, GeometryError>;
