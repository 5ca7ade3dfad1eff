use crate::error::{PathError, Result};
use crate::math::{transform_point, with_z, Matrix4, Ocs, Point3};

/// Kind of a path command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Marks the start of a path for external consumers; never stored in a
    /// [`Path`](super::Path).
    StartPath,
    LineTo,
    Curve3To,
    Curve4To,
}

impl Command {
    /// Number of points a command of this kind carries, end point first.
    #[must_use]
    pub fn point_count(self) -> usize {
        match self {
            Self::StartPath | Self::LineTo => 1,
            Self::Curve3To => 2,
            Self::Curve4To => 3,
        }
    }

    /// Returns `true` for the Bézier curve commands.
    #[must_use]
    pub fn is_curve(self) -> bool {
        matches!(self, Self::Curve3To | Self::Curve4To)
    }
}

/// A single immutable path segment, starting at the end of the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathElement {
    /// Straight line to `end`.
    LineTo { end: Point3 },
    /// Quadratic Bézier curve to `end`.
    Curve3To { end: Point3, ctrl: Point3 },
    /// Cubic Bézier curve to `end`.
    Curve4To {
        end: Point3,
        ctrl1: Point3,
        ctrl2: Point3,
    },
}

impl PathElement {
    /// Builds an element of the given kind from `[end, ctrl...]`.
    ///
    /// # Errors
    ///
    /// Returns `PathError::UnsupportedCommand` for [`Command::StartPath`] and
    /// `PathError::InvalidPointCount` if `points` does not match the kind.
    pub fn new(kind: Command, points: &[Point3]) -> Result<Self> {
        if kind == Command::StartPath {
            return Err(PathError::UnsupportedCommand(kind).into());
        }
        if points.len() != kind.point_count() {
            return Err(PathError::InvalidPointCount {
                command: kind,
                expected: kind.point_count(),
                actual: points.len(),
            }
            .into());
        }
        Ok(match kind {
            Command::Curve3To => Self::Curve3To {
                end: points[0],
                ctrl: points[1],
            },
            Command::Curve4To => Self::Curve4To {
                end: points[0],
                ctrl1: points[1],
                ctrl2: points[2],
            },
            _ => Self::LineTo { end: points[0] },
        })
    }

    /// Returns the command kind.
    #[must_use]
    pub fn kind(&self) -> Command {
        match self {
            Self::LineTo { .. } => Command::LineTo,
            Self::Curve3To { .. } => Command::Curve3To,
            Self::Curve4To { .. } => Command::Curve4To,
        }
    }

    /// Returns the end point of the segment.
    #[must_use]
    pub fn end(&self) -> Point3 {
        match *self {
            Self::LineTo { end } | Self::Curve3To { end, .. } | Self::Curve4To { end, .. } => end,
        }
    }

    /// Returns the `index`-th shape vertex in traversal order: control
    /// points first, end point last.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<Point3> {
        match (*self, index) {
            (Self::LineTo { end }, 0)
            | (Self::Curve3To { end, .. }, 1)
            | (Self::Curve4To { end, .. }, 2) => Some(end),
            (Self::Curve3To { ctrl, .. }, 0) => Some(ctrl),
            (Self::Curve4To { ctrl1, .. }, 0) => Some(ctrl1),
            (Self::Curve4To { ctrl2, .. }, 1) => Some(ctrl2),
            _ => None,
        }
    }

    /// Returns the element with every point mapped by `f`.
    #[must_use]
    pub fn map_points<F: Fn(&Point3) -> Point3>(&self, f: F) -> Self {
        match self {
            Self::LineTo { end } => Self::LineTo { end: f(end) },
            Self::Curve3To { end, ctrl } => Self::Curve3To {
                end: f(end),
                ctrl: f(ctrl),
            },
            Self::Curve4To { end, ctrl1, ctrl2 } => Self::Curve4To {
                end: f(end),
                ctrl1: f(ctrl1),
                ctrl2: f(ctrl2),
            },
        }
    }

    /// Maps the element from OCS to WCS; every z coordinate is replaced by
    /// `elevation` first.
    #[must_use]
    pub fn to_wcs(&self, ocs: &Ocs, elevation: f64) -> Self {
        self.map_points(|p| ocs.to_wcs(&with_z(p, elevation)))
    }

    /// Returns the element transformed by `matrix`.
    #[must_use]
    pub fn transform(&self, matrix: &Matrix4) -> Self {
        self.map_points(|p| transform_point(matrix, p))
    }
}
