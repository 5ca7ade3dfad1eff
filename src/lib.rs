//! Vector paths built from CAD entity geometry.
//!
//! A [`Path`] is a single contiguous curve made of line, quadratic and cubic
//! Bézier segments. Paths are built from vertex lists, bulge polylines,
//! ellipses and B-splines, and sampled with [`Path::approximate`] or the
//! error-bounded [`Path::flattening`].

pub mod error;
pub mod geometry;
pub mod math;
pub mod path;
pub mod tessellation;

pub use error::{DxfPathError, Result};
pub use path::{Command, Path, PathConfig, PathElement};
