use nalgebra::Vector4;

use crate::error::{GeometryError, Result};
use crate::math::{lerp, Point3, Vector3};
use crate::tessellation::approximate_curve;

use super::{Bezier4, Curve, CurveDomain};

/// Knot values closer than this are treated as one knot.
const KNOT_TOLERANCE: f64 = 1e-12;

/// A B-spline curve, optionally rational.
///
/// Evaluation uses de Boor's algorithm in homogeneous coordinates, so
/// rational and non-rational splines share one code path.
#[derive(Debug, Clone)]
pub struct BSpline {
    control_points: Vec<Point3>,
    order: usize,
    knots: Vec<f64>,
    weights: Option<Vec<f64>>,
}

impl BSpline {
    /// Creates a non-rational B-spline with a clamped uniform knot vector.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidSpline` if `order < 2` or there are
    /// fewer control points than `order`.
    pub fn new(control_points: Vec<Point3>, order: usize) -> Result<Self> {
        let knots = clamped_uniform_knots(control_points.len(), order);
        Self::with_knots(control_points, order, knots, None)
    }

    /// Creates a B-spline from explicit knots and optional weights.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidSpline` if the order, knot count, knot
    /// ordering, weight count or parameter domain is inconsistent.
    pub fn with_knots(
        control_points: Vec<Point3>,
        order: usize,
        knots: Vec<f64>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self> {
        let count = control_points.len();
        if order < 2 {
            return Err(GeometryError::InvalidSpline(format!("order {order} is less than 2")).into());
        }
        if count < order {
            return Err(GeometryError::InvalidSpline(format!(
                "{count} control points are not enough for order {order}"
            ))
            .into());
        }
        if knots.len() != count + order {
            return Err(GeometryError::InvalidSpline(format!(
                "expected {} knots, got {}",
                count + order,
                knots.len()
            ))
            .into());
        }
        if knots.windows(2).any(|w| w[1] < w[0]) {
            return Err(GeometryError::InvalidSpline("knots must be non-decreasing".into()).into());
        }
        if knots[count] - knots[order - 1] <= KNOT_TOLERANCE {
            return Err(GeometryError::InvalidSpline("empty parameter domain".into()).into());
        }
        if let Some(w) = &weights {
            if w.len() != count {
                return Err(GeometryError::InvalidSpline(format!(
                    "expected {count} weights, got {}",
                    w.len()
                ))
                .into());
            }
            if w.iter().any(|&x| x <= 0.0) {
                return Err(GeometryError::InvalidSpline("weights must be positive".into()).into());
            }
        }
        Ok(Self {
            control_points,
            order,
            knots,
            weights,
        })
    }

    /// Returns the control points.
    #[must_use]
    pub fn control_points(&self) -> &[Point3] {
        &self.control_points
    }

    /// Returns the knot vector.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Returns the order (degree + 1).
    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns the polynomial degree.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.order - 1
    }

    /// Returns `true` if the spline has non-uniform weights.
    #[must_use]
    pub fn is_rational(&self) -> bool {
        self.weights.as_ref().is_some_and(|w| {
            let first = w[0];
            w.iter().any(|&x| (x - first).abs() > KNOT_TOLERANCE)
        })
    }

    /// Returns `true` if the first and last `order` knots are equal, i.e. the
    /// curve passes through its first and last control points.
    #[must_use]
    pub fn is_clamped(&self) -> bool {
        let n = self.control_points.len();
        let k = self.order;
        let same = |knots: &[f64]| knots.iter().all(|&x| (x - knots[0]).abs() <= KNOT_TOLERANCE);
        same(&self.knots[..k]) && same(&self.knots[n..])
    }

    /// Samples `segments + 1` points at uniform parameter steps.
    #[must_use]
    pub fn approximate(&self, segments: usize) -> Vec<Point3> {
        approximate_curve(self, segments)
    }

    /// Splits a clamped, non-rational cubic B-spline into its exact cubic
    /// Bézier pieces.
    ///
    /// Every interior knot is raised to multiplicity 3 by knot insertion,
    /// after which each knot span maps to one Bézier piece. Interior knots of
    /// full multiplicity split the curve into disconnected pieces.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidSpline` for any other kind of spline.
    pub fn bezier_decomposition(&self) -> Result<Vec<[Point3; 4]>> {
        if self.degree() != 3 || self.is_rational() || !self.is_clamped() {
            return Err(GeometryError::InvalidSpline(
                "exact decomposition requires a clamped non-rational cubic spline".into(),
            )
            .into());
        }
        let p = self.degree();
        let domain = self.domain();
        let mut knots = self.knots.clone();
        let mut points = self.control_points.clone();

        let mut interior: Vec<f64> = Vec::new();
        for &u in &self.knots {
            let inside = u - domain.t_min > KNOT_TOLERANCE && domain.t_max - u > KNOT_TOLERANCE;
            let seen = interior.last().is_some_and(|&last| (u - last).abs() <= KNOT_TOLERANCE);
            if inside && !seen {
                interior.push(u);
            }
        }

        for u in interior {
            let multiplicity = knots
                .iter()
                .filter(|&&x| (x - u).abs() <= KNOT_TOLERANCE)
                .count();
            for _ in multiplicity..p {
                insert_knot(&mut knots, &mut points, p, u);
            }
        }

        // Every non-empty knot span now owns the `p + 1` control points
        // ending at its index.
        Ok((p..points.len())
            .filter(|&k| knots[k + 1] - knots[k] > KNOT_TOLERANCE)
            .map(|k| [points[k - 3], points[k - 2], points[k - 1], points[k]])
            .collect())
    }

    /// Approximates the spline by cubic Bézier curves interpolating
    /// `max(count - 1, 1) * level` uniformly sampled points.
    #[must_use]
    pub fn cubic_bezier_approximation(&self, level: usize) -> Vec<Bezier4> {
        let segments = self.control_points.len().saturating_sub(1).max(1) * level.max(1);
        cubic_bezier_interpolation(&self.approximate(segments))
    }

    /// Index of the knot span containing `t`.
    fn find_span(&self, t: f64) -> usize {
        let n = self.control_points.len();
        let p = self.degree();
        if t >= self.knots[n] {
            return n - 1;
        }
        let mut k = p;
        while k < n - 1 && self.knots[k + 1] <= t {
            k += 1;
        }
        k
    }

    fn weight(&self, index: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[index])
    }
}

impl Curve for BSpline {
    fn evaluate(&self, t: f64) -> Point3 {
        let domain = self.domain();
        let t = t.clamp(domain.t_min, domain.t_max);
        let p = self.degree();
        let k = self.find_span(t);

        let mut d: Vec<Vector4<f64>> = (0..=p)
            .map(|j| {
                let i = j + k - p;
                let w = self.weight(i);
                let c = self.control_points[i];
                Vector4::new(c.x * w, c.y * w, c.z * w, w)
            })
            .collect();

        for r in 1..=p {
            for j in (r..=p).rev() {
                let lo = self.knots[j + k - p];
                let hi = self.knots[j + 1 + k - r];
                let denom = hi - lo;
                let alpha = if denom.abs() < KNOT_TOLERANCE { 0.0 } else { (t - lo) / denom };
                d[j] = d[j - 1] * (1.0 - alpha) + d[j] * alpha;
            }
        }

        let h = d[p];
        Point3::new(h.x / h.w, h.y / h.w, h.z / h.w)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(self.knots[self.order - 1], self.knots[self.control_points.len()])
    }
}

/// Clamped uniform knot vector with values `0..=count-order+1`.
#[allow(clippy::cast_precision_loss)]
fn clamped_uniform_knots(count: usize, order: usize) -> Vec<f64> {
    let max_value = count.saturating_sub(order) + 1;
    let mut knots = vec![0.0; order];
    knots.extend((1..max_value).map(|v| v as f64));
    knots.extend(std::iter::repeat(max_value as f64).take(order));
    knots
}

/// Boehm knot insertion of `u` into a spline of degree `p`.
fn insert_knot(knots: &mut Vec<f64>, points: &mut Vec<Point3>, p: usize, u: f64) {
    let k = knots.iter().rposition(|&x| x <= u).unwrap_or(p);
    let mut inserted = Vec::with_capacity(points.len() + 1);
    for i in 0..=points.len() {
        if i + p <= k {
            inserted.push(points[i]);
        } else if i > k {
            inserted.push(points[i - 1]);
        } else {
            let a = (u - knots[i]) / (knots[i + p] - knots[i]);
            inserted.push(lerp(&points[i - 1], &points[i], a));
        }
    }
    knots.insert(k + 1, u);
    *points = inserted;
}

/// C2-continuous cubic Bézier chain through `points`.
fn cubic_bezier_interpolation(points: &[Point3]) -> Vec<Bezier4> {
    if points.len() < 2 {
        return Vec::new();
    }
    let n = points.len() - 1;
    if n == 1 {
        let (s, e) = (points[0], points[1]);
        return vec![Bezier4::new([s, lerp(&s, &e, 1.0 / 3.0), lerp(&s, &e, 2.0 / 3.0), e])];
    }

    let p: Vec<Vector3> = points.iter().map(|pt| pt.coords).collect();

    // Tridiagonal system for the first control point of every segment.
    let mut sub = vec![1.0; n];
    let mut diag = vec![4.0; n];
    let mut sup = vec![1.0; n];
    let mut rhs: Vec<Vector3> = (0..n).map(|i| p[i] * 4.0 + p[i + 1] * 2.0).collect();
    sub[0] = 0.0;
    diag[0] = 2.0;
    rhs[0] = p[0] + p[1] * 2.0;
    sub[n - 1] = 2.0;
    diag[n - 1] = 7.0;
    sup[n - 1] = 0.0;
    rhs[n - 1] = p[n - 1] * 8.0 + p[n];

    // Thomas algorithm.
    for i in 1..n {
        let m = sub[i] / diag[i - 1];
        diag[i] -= m * sup[i - 1];
        let prev = rhs[i - 1];
        rhs[i] -= prev * m;
    }
    let mut first = vec![Vector3::zeros(); n];
    first[n - 1] = rhs[n - 1] / diag[n - 1];
    for i in (0..n - 1).rev() {
        first[i] = (rhs[i] - first[i + 1] * sup[i]) / diag[i];
    }

    (0..n)
        .map(|i| {
            let second = if i < n - 1 {
                p[i + 1] * 2.0 - first[i + 1]
            } else {
                (p[n] + first[n - 1]) * 0.5
            };
            Bezier4::new([
                points[i],
                Point3::from(first[i]),
                Point3::from(second),
                points[i + 1],
            ])
        })
        .collect()
}
