mod bezier;
mod bspline;
mod ellipse;

pub use bezier::{Bezier3, Bezier4};
pub use bspline::BSpline;
pub use ellipse::Ellipse;

use crate::math::Point3;

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Returns the length of the parameter range.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.t_max - self.t_min
    }

    /// Maps a fraction in `[0, 1]` onto the domain.
    #[must_use]
    pub fn at(&self, fraction: f64) -> f64 {
        self.t_min + self.span() * fraction
    }
}

/// Trait for bounded parametric curves in 3D space.
pub trait Curve {
    /// Evaluates the curve at parameter `t`.
    fn evaluate(&self, t: f64) -> Point3;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns the point at the start of the domain.
    fn start_point(&self) -> Point3 {
        self.evaluate(self.domain().t_min)
    }

    /// Returns the point at the end of the domain.
    fn end_point(&self) -> Point3 {
        self.evaluate(self.domain().t_max)
    }
}
