use thiserror::Error;

use crate::path::Command;

/// Top-level error type for the path engine.
#[derive(Debug, Error)]
pub enum DxfPathError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Errors related to geometric primitives.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("invalid B-spline: {0}")]
    InvalidSpline(String),
}

/// Errors raised by [`Path`](crate::path::Path) construction.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("invalid path state: {0}")]
    InvalidState(&'static str),

    #[error("unsupported command {0:?}")]
    UnsupportedCommand(Command),

    #[error("{command:?} requires {expected} points, got {actual}")]
    InvalidPointCount {
        command: Command,
        expected: usize,
        actual: usize,
    },
}

/// Convenience type alias for results using [`DxfPathError`].
pub type Result<T> = std::result::Result<T, DxfPathError>;
