mod tessellate_curve;

pub use tessellate_curve::{approximate_curve, flatten_curve};

/// Default maximum distance between a curve and its flattened chords.
pub const MAX_DISTANCE: f64 = 0.01;

/// Default minimum number of base segments per curve when flattening.
pub const MIN_SEGMENTS: usize = 4;

/// Default bisection depth at which a chord is accepted regardless of error.
pub const MAX_DEPTH: u32 = 16;

/// Smallest flattening tolerance relative to the curve extent.
pub const MIN_RELATIVE_TOLERANCE: f64 = 1e-9;

/// Default segment count of [`Path::approximate`](crate::Path::approximate).
pub const DEFAULT_APPROXIMATION_SEGMENTS: usize = 20;

/// Default base segment count of [`Path::flattening`](crate::Path::flattening).
pub const DEFAULT_FLATTENING_SEGMENTS: usize = 16;

/// Default subdivision level of [`Path::add_spline`](crate::Path::add_spline).
pub const DEFAULT_SPLINE_LEVEL: usize = 4;

/// Parameters controlling adaptive flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationParams {
    /// Maximum allowed deviation from the true geometry.
    pub tolerance: f64,
    /// Minimum number of segments for curves.
    pub min_segments: usize,
    /// Maximum bisection depth below each base segment.
    pub max_depth: u32,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            tolerance: MAX_DISTANCE,
            min_segments: MIN_SEGMENTS,
            max_depth: MAX_DEPTH,
        }
    }
}

impl TessellationParams {
    /// Creates parameters with the given tolerance and base segment count.
    #[must_use]
    pub fn new(tolerance: f64, min_segments: usize) -> Self {
        Self {
            tolerance,
            min_segments,
            ..Self::default()
        }
    }
}
