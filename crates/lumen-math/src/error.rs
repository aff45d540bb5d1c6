//! Error types for math primitives.

use thiserror::Error;

/// Errors raised when a vector operation has no well-defined result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Normalizing, or building a direction from, the zero vector.
    #[error("zero vector has no direction")]
    ZeroVector,

    /// Cross product of parallel vectors.
    #[error("vectors are parallel")]
    ParallelVectors,
}

/// Result type for math operations.
pub type Result<T> = std::result::Result<T, MathError>;
