use crate::math::Point3;
use crate::tessellation::{approximate_curve, flatten_curve, TessellationParams};

use super::{Curve, CurveDomain};

/// A quadratic Bézier curve: start, control point, end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bezier3 {
    points: [Point3; 3],
}

/// A cubic Bézier curve: start, two control points, end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bezier4 {
    points: [Point3; 4],
}

impl Bezier3 {
    /// Creates a curve from `[start, ctrl, end]`.
    #[must_use]
    pub fn new(points: [Point3; 3]) -> Self {
        Self { points }
    }

    /// Returns the control points `[start, ctrl, end]`.
    #[must_use]
    pub fn control_points(&self) -> &[Point3; 3] {
        &self.points
    }

    /// Returns the same curve traversed from end to start.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let [s, c, e] = self.points;
        Self::new([e, c, s])
    }

    /// Samples `segments + 1` points at uniform parameter steps.
    #[must_use]
    pub fn approximate(&self, segments: usize) -> Vec<Point3> {
        approximate_curve(self, segments)
    }

    /// Adaptive flattening with maximum chord deviation `distance`.
    #[must_use]
    pub fn flattening(&self, distance: f64, segments: usize) -> Vec<Point3> {
        flatten_curve(self, &TessellationParams::new(distance, segments))
    }
}

impl Curve for Bezier3 {
    fn evaluate(&self, t: f64) -> Point3 {
        let [p0, p1, p2] = &self.points;
        let mt = 1.0 - t;
        Point3::from(p0.coords * (mt * mt) + p1.coords * (2.0 * mt * t) + p2.coords * (t * t))
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn start_point(&self) -> Point3 {
        self.points[0]
    }

    fn end_point(&self) -> Point3 {
        self.points[2]
    }
}

impl Bezier4 {
    /// Creates a curve from `[start, ctrl1, ctrl2, end]`.
    #[must_use]
    pub fn new(points: [Point3; 4]) -> Self {
        Self { points }
    }

    /// Returns the control points `[start, ctrl1, ctrl2, end]`.
    #[must_use]
    pub fn control_points(&self) -> &[Point3; 4] {
        &self.points
    }

    /// Returns the same curve traversed from end to start.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let [s, c1, c2, e] = self.points;
        Self::new([e, c2, c1, s])
    }

    /// Samples `segments + 1` points at uniform parameter steps.
    #[must_use]
    pub fn approximate(&self, segments: usize) -> Vec<Point3> {
        approximate_curve(self, segments)
    }

    /// Adaptive flattening with maximum chord deviation `distance`.
    #[must_use]
    pub fn flattening(&self, distance: f64, segments: usize) -> Vec<Point3> {
        flatten_curve(self, &TessellationParams::new(distance, segments))
    }
}

impl Curve for Bezier4 {
    fn evaluate(&self, t: f64) -> Point3 {
        let [p0, p1, p2, p3] = &self.points;
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Point3::from(p0.coords * a + p1.coords * b + p2.coords * c + p3.coords * d)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn start_point(&self) -> Point3 {
        self.points[0]
    }

    fn end_point(&self) -> Point3 {
        self.points[3]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;
    use approx::assert_abs_diff_eq;

    fn quarter_circle() -> Bezier4 {
        let k = 4.0 / 3.0 * (std::f64::consts::FRAC_PI_8).tan();
        Bezier4::new([
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, k, 0.0),
            Point3::new(k, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn quadratic_midpoint() {
        let b = Bezier3::new([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ]);
        assert_abs_diff_eq!(b.evaluate(0.5), Point3::new(1.0, 1.0, 0.0), epsilon = TOLERANCE);
    }

    #[test]
    fn cubic_end_points_are_exact() {
        let b = quarter_circle();
        assert_eq!(b.evaluate(0.0), b.control_points()[0]);
        assert_abs_diff_eq!(b.evaluate(1.0), b.control_points()[3], epsilon = TOLERANCE);
    }

    #[test]
    fn quarter_circle_stays_near_radius() {
        for p in quarter_circle().approximate(32) {
            let r = p.coords.norm();
            assert!((r - 1.0).abs() < 3e-4, "r={r}");
        }
    }

    #[test]
    fn reversed_swaps_control_points() {
        let b = quarter_circle();
        let r = b.reversed();
        let [s, c1, c2, e] = *b.control_points();
        assert_eq!(r.control_points(), &[e, c2, c1, s]);
        assert_abs_diff_eq!(r.evaluate(0.25), b.evaluate(0.75), epsilon = TOLERANCE);
    }

    #[test]
    fn quadratic_reversed_keeps_control() {
        let b = Bezier3::new([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ]);
        let r = b.reversed();
        assert_eq!(r.control_points()[1], b.control_points()[1]);
        assert_eq!(r.start_point(), b.end_point());
    }

    #[test]
    fn flattening_is_finer_than_needed() {
        let pts = quarter_circle().flattening(0.001, 2);
        assert!(pts.len() > 3);
        assert_eq!(pts[0], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(*pts.last().unwrap(), Point3::new(0.0, 1.0, 0.0));
    }
}
