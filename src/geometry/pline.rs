/// Bulge-encoded polyline vertex for mixed line/arc segments.
///
/// `bulge = tan(sweep_angle / 4)` describes the segment to the next vertex:
/// - `0` = straight line to next vertex
/// - `> 0` = counter-clockwise arc to next vertex
/// - `< 0` = clockwise arc to next vertex
/// - `|bulge| = 1` = semicircle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlineVertex {
    pub x: f64,
    pub y: f64,
    pub bulge: f64,
}

impl PlineVertex {
    /// Creates a new vertex with the given coordinates and bulge.
    #[must_use]
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    /// Creates a line vertex (bulge = 0).
    #[must_use]
    pub fn line(x: f64, y: f64) -> Self {
        Self { x, y, bulge: 0.0 }
    }

    /// Returns the bulge of an arc segment, or `None` for a straight segment.
    ///
    /// Bulges below `tolerance` count as straight.
    #[must_use]
    pub fn arc_bulge(&self, tolerance: f64) -> Option<f64> {
        (self.bulge.abs() >= tolerance).then_some(self.bulge)
    }
}

impl From<(f64, f64, f64)> for PlineVertex {
    fn from((x, y, bulge): (f64, f64, f64)) -> Self {
        Self::new(x, y, bulge)
    }
}

impl From<(f64, f64)> for PlineVertex {
    fn from((x, y): (f64, f64)) -> Self {
        Self::line(x, y)
    }
}
