use crate::math::POINT_TOLERANCE;

/// Bulges closer to zero than this are treated as straight segments.
pub const BULGE_TOLERANCE: f64 = 1e-6;

/// Ellipses with a smaller parameter span are skipped.
pub const SPAN_TOLERANCE: f64 = 1e-9;

/// Tolerances used while building a [`Path`](super::Path).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathConfig {
    /// Distance below which two points are the same point.
    pub point_tolerance: f64,
    /// Absolute bulge value below which a polyline segment is straight.
    pub bulge_tolerance: f64,
    /// Parameter span below which an elliptic arc is ignored.
    pub span_tolerance: f64,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            point_tolerance: POINT_TOLERANCE,
            bulge_tolerance: BULGE_TOLERANCE,
            span_tolerance: SPAN_TOLERANCE,
        }
    }
}
