use std::sync::Arc;

use crate::error::Result;
use crate::geometry::{BSpline, Bezier3, Bezier4, Curve, Ellipse, PlineVertex};
use crate::math::arc_2d::bulge_to_arc;
use crate::math::{is_close, with_z, Ocs, Point3, Vector3};

use super::{Path, PathElement};

impl Path {
    /// Adds a chain of quadratic Bézier curves.
    ///
    /// If the path end point coincides with the end of the last curve, the
    /// whole chain is traversed backwards. Every curve whose start point is
    /// not at the current path end is preceded by a connecting line.
    pub fn add_curves3<I>(&mut self, curves: I)
    where
        I: IntoIterator<Item = Bezier3>,
    {
        let mut curves: Vec<Bezier3> = curves.into_iter().collect();
        let Some(last) = curves.last() else {
            return;
        };
        if is_close(&self.end(), &last.end_point(), self.config.point_tolerance) {
            tracing::debug!(count = curves.len(), "reversing quadratic curve chain");
            curves = curves.iter().rev().map(Bezier3::reversed).collect();
        }
        for curve in curves {
            let [start, ctrl, end] = *curve.control_points();
            self.connect_to(start);
            self.curve3_to(end, ctrl);
        }
    }

    /// Adds a chain of cubic Bézier curves.
    ///
    /// Connection rules are the same as for [`Path::add_curves3`].
    pub fn add_curves4<I>(&mut self, curves: I)
    where
        I: IntoIterator<Item = Bezier4>,
    {
        let mut curves: Vec<Bezier4> = curves.into_iter().collect();
        let Some(last) = curves.last() else {
            return;
        };
        if is_close(&self.end(), &last.end_point(), self.config.point_tolerance) {
            tracing::debug!(count = curves.len(), "reversing cubic curve chain");
            curves = reversed_chain(&curves);
        }
        for curve in curves {
            let [start, ctrl1, ctrl2, end] = *curve.control_points();
            self.connect_to(start);
            self.curve4_to(end, ctrl1, ctrl2);
        }
    }

    /// Adds a 2D polyline given as `(x, y, bulge)` vertices.
    ///
    /// The first vertex becomes the start point. A non-zero bulge turns the
    /// segment to the next vertex into a circular arc made of cubic Bézier
    /// curves. After all vertices are added, the path is mapped from `ocs` to
    /// WCS at `elevation` if that changes any coordinate.
    ///
    /// # Errors
    ///
    /// Returns `PathError::InvalidState` if the path is not empty.
    pub fn add_2d_polyline<I>(&mut self, points: I, close: bool, ocs: &Ocs, elevation: f64) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<PlineVertex>,
    {
        let mut prev: Option<(Point3, Option<f64>)> = None;
        for vertex in points {
            let vertex: PlineVertex = vertex.into();
            let point = Point3::new(vertex.x, vertex.y, 0.0);
            let bulge = vertex.arc_bulge(self.config.bulge_tolerance);
            if bulge.is_none() && vertex.bulge != 0.0 {
                tracing::trace!(bulge = vertex.bulge, "near-zero bulge treated as line");
            }
            match prev {
                None => self.set_start(point)?,
                Some((prev_point, Some(prev_bulge))) => self.bulge_to(&prev_point, &point, prev_bulge)?,
                Some((_, None)) => self.line_to(point),
            }
            prev = Some((point, bulge));
        }

        if let Some((_, last_bulge)) = prev {
            if close && !self.is_closed() {
                let (end, start) = (self.end(), self.start());
                match last_bulge {
                    Some(bulge) => self.bulge_to(&end, &start, bulge)?,
                    None => self.line_to(start),
                }
            }
        }

        if ocs.transform() || elevation != 0.0 {
            self.to_wcs(ocs, elevation);
        }
        Ok(())
    }

    /// Adds an elliptic arc as cubic Bézier curves.
    ///
    /// Arcs with a zero parameter span are ignored. If the path is empty and
    /// `reset` is set, the start point moves to the start of the arc;
    /// otherwise the arc is connected like [`Path::add_curves4`]. `segments`
    /// is the minimum curve count, at least one curve per quarter turn is
    /// always used.
    pub fn add_ellipse(&mut self, ellipse: &Ellipse, segments: usize, reset: bool) {
        if ellipse.param_span().abs() < self.config.span_tolerance {
            return;
        }
        if self.is_empty() && reset {
            self.start = ellipse.start_point();
        }
        self.add_curves4(ellipse.to_cubic_beziers(segments));
    }

    /// Adds a B-spline as cubic Bézier curves.
    ///
    /// Clamped non-rational cubic splines are split exactly into their Bézier
    /// pieces, all others are approximated at subdivision `level`. If the path
    /// is empty and `reset` is set, the start point moves to the start of the
    /// spline.
    ///
    /// # Errors
    ///
    /// Propagates decomposition errors of the spline.
    pub fn add_spline(&mut self, spline: &BSpline, level: usize, reset: bool) -> Result<()> {
        if self.is_empty() && reset {
            self.start = spline.start_point();
        }
        let curves = if spline.degree() == 3 && !spline.is_rational() && spline.is_clamped() {
            spline
                .bezier_decomposition()?
                .into_iter()
                .map(Bezier4::new)
                .collect()
        } else {
            spline.cubic_bezier_approximation(level)
        };
        self.add_curves4(curves);
        Ok(())
    }

    /// Adds a line to `location` unless the path already ends there.
    fn connect_to(&mut self, location: Point3) {
        if !is_close(&location, &self.end(), self.config.point_tolerance) {
            tracing::debug!(
                gap = (location - self.end()).norm(),
                "bridging gap in curve chain with a line"
            );
            self.line_to(location);
        }
    }

    /// Adds a circular arc from `p1` to `p2` described by `bulge`.
    fn bulge_to(&mut self, p1: &Point3, p2: &Point3, bulge: f64) -> Result<()> {
        if is_close(p1, p2, self.config.point_tolerance) {
            return Ok(());
        }
        let (center, start_angle, end_angle, radius) = bulge_to_arc(p1, p2, bulge);
        let ellipse = Ellipse::from_arc(
            center,
            radius,
            Vector3::z(),
            start_angle.to_degrees(),
            end_angle.to_degrees(),
        )?;
        let mut curves = ellipse.to_cubic_beziers(1);
        if let Some(first) = curves.first() {
            let s = first.start_point();
            if (s - p2).norm() < (s - p1).norm() {
                curves = reversed_chain(&curves);
            }
        }
        self.add_curves4(curves);
        Ok(())
    }

    /// Maps start and commands from OCS to WCS in one pass.
    fn to_wcs(&mut self, ocs: &Ocs, elevation: f64) {
        self.start = ocs.to_wcs(&with_z(&self.start, elevation));
        let commands: Vec<PathElement> = self.commands.iter().map(|c| c.to_wcs(ocs, elevation)).collect();
        self.commands = Arc::new(commands);
    }
}

/// Reverses the curve order and the direction of every curve.
fn reversed_chain(curves: &[Bezier4]) -> Vec<Bezier4> {
    curves.iter().rev().map(Bezier4::reversed).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{DxfPathError, PathError};
    use crate::math::{lerp, TOLERANCE};
    use crate::path::Command;
    use crate::tessellation::{DEFAULT_FLATTENING_SEGMENTS, DEFAULT_SPLINE_LEVEL};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::TAU;

    /// Radial error of a quarter-turn cubic Bézier arc per unit radius.
    const CUBIC_ARC_ERROR: f64 = 2.73e-4;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn cubic(s: Point3, e: Point3) -> Bezier4 {
        Bezier4::new([s, lerp(&s, &e, 0.25) + Vector3::y(), lerp(&s, &e, 0.75) + Vector3::y(), e])
    }

    #[test]
    fn empty_chain_is_noop() {
        let mut path = Path::default();
        path.add_curves4(Vec::new());
        path.add_curves3(Vec::new());
        assert!(path.is_empty());
    }

    #[test]
    fn distant_curve_is_bridged_with_line() {
        let c = cubic(p(5.0, 5.0), p(7.0, 5.0));
        let [s, c1, c2, e] = *c.control_points();
        let mut path = Path::default();
        path.add_curves4([c]);
        assert_eq!(
            path.commands(),
            &[
                PathElement::LineTo { end: s },
                PathElement::Curve4To {
                    end: e,
                    ctrl1: c1,
                    ctrl2: c2,
                },
            ]
        );
    }

    #[test]
    fn connected_chain_adds_no_lines() {
        let mut path = Path::default();
        path.add_curves4([cubic(p(0.0, 0.0), p(1.0, 0.0)), cubic(p(1.0, 0.0), p(2.0, 0.0))]);
        assert_eq!(path.len(), 2);
        assert!(!path.has_lines());
        assert_eq!(path.end(), p(2.0, 0.0));
    }

    #[test]
    fn chain_ending_at_path_end_is_reversed() {
        let mut path = Path::new(p(2.0, 0.0));
        let chain = [cubic(p(0.0, 0.0), p(1.0, 0.0)), cubic(p(1.0, 0.0), p(2.0, 0.0))];
        path.add_curves4(chain);
        assert_eq!(path.len(), 2);
        assert!(!path.has_lines());
        assert_eq!(path.end(), p(0.0, 0.0));
        // First command traverses the last curve backwards.
        if let PathElement::Curve4To { end, ctrl1, ctrl2 } = path[0] {
            let [_, c1, c2, s] = *chain[1].control_points();
            assert_eq!(end, chain[1].control_points()[0]);
            assert_eq!(ctrl1, c2);
            assert_eq!(ctrl2, c1);
            assert_eq!(s, p(2.0, 0.0));
        } else {
            panic!("expected cubic curve");
        }
    }

    #[test]
    fn closed_chain_prefers_reversal() {
        // Both extremities touch the path end: the last-end rule wins.
        let mut path = Path::default();
        let chain = [
            cubic(p(0.0, 0.0), p(1.0, 0.0)),
            cubic(p(1.0, 0.0), p(1.0, 1.0)),
            cubic(p(1.0, 1.0), p(0.0, 0.0)),
        ];
        path.add_curves4(chain);
        assert_eq!(path.len(), 3);
        assert_eq!(path[0].end(), p(1.0, 1.0));
        assert_eq!(path[2].end(), p(0.0, 0.0));
    }

    #[test]
    fn only_whole_chain_is_reversed() {
        // The second curve points the wrong way; it is bridged, not flipped.
        let mut path = Path::default();
        path.add_curves4([cubic(p(0.0, 0.0), p(1.0, 0.0)), cubic(p(2.0, 0.0), p(1.0, 0.0))]);
        let kinds: Vec<Command> = path.iter().map(PathElement::kind).collect();
        assert_eq!(kinds, vec![Command::Curve4To, Command::LineTo, Command::Curve4To]);
    }

    #[test]
    fn quadratic_chain_is_reversed() {
        let mut path = Path::new(p(2.0, 0.0));
        path.add_curves3([Bezier3::new([p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0)])]);
        assert_eq!(
            path.commands(),
            &[PathElement::Curve3To {
                end: p(0.0, 0.0),
                ctrl: p(1.0, 1.0),
            }]
        );
    }

    #[test]
    fn polyline_semicircle_is_flattened_within_tolerance() {
        let mut path = Path::default();
        path.add_2d_polyline([(0.0, 0.0, 1.0), (2.0, 0.0, 0.0)], false, &Ocs::default(), 0.0)
            .unwrap();
        assert!(path.iter().all(|c| c.kind() == Command::Curve4To));

        let pts: Vec<Point3> = path.flattening(0.01, DEFAULT_FLATTENING_SEGMENTS).collect();
        assert_eq!(pts[0], p(0.0, 0.0));
        assert_abs_diff_eq!(*pts.last().unwrap(), p(2.0, 0.0), epsilon = 1e-9);
        let center = p(1.0, 0.0);
        for pt in &pts {
            assert!(((pt - center).norm() - 1.0).abs() < 1e-3);
            assert!(pt.y <= 1e-9, "positive bulge runs below the chord");
        }
        for w in pts.windows(2) {
            let mid = lerp(&w[0], &w[1], 0.5);
            assert!(1.0 - (mid - center).norm() <= 0.01 + CUBIC_ARC_ERROR);
        }
    }

    #[test]
    fn negative_bulge_runs_above_chord() {
        let mut path = Path::default();
        path.add_2d_polyline([(0.0, 0.0, -1.0), (2.0, 0.0, 0.0)], false, &Ocs::default(), 0.0)
            .unwrap();
        assert!(!path.has_lines());
        assert_abs_diff_eq!(path.end(), p(2.0, 0.0), epsilon = 1e-9);
        let pts: Vec<Point3> = path.approximate(8).collect();
        assert!(pts.iter().all(|pt| pt.y >= -1e-9));
        assert!(pts.iter().any(|pt| (pt.y - 1.0).abs() < 1e-3));
    }

    #[test]
    fn near_zero_bulge_is_a_line() {
        let mut path = Path::default();
        path.add_2d_polyline([(0.0, 0.0, 1e-8), (2.0, 0.0, 0.0)], false, &Ocs::default(), 0.0)
            .unwrap();
        assert_eq!(path.commands(), &[PathElement::LineTo { end: p(2.0, 0.0) }]);
    }

    #[test]
    fn coincident_bulge_vertices_are_skipped() {
        let mut path = Path::default();
        path.add_2d_polyline(
            [(0.0, 0.0, 0.5), (0.0, 0.0, 0.0), (1.0, 0.0, 0.0)],
            false,
            &Ocs::default(),
            0.0,
        )
        .unwrap();
        assert_eq!(path.commands(), &[PathElement::LineTo { end: p(1.0, 0.0) }]);
    }

    #[test]
    fn close_with_line() {
        let mut path = Path::default();
        path.add_2d_polyline([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], true, &Ocs::default(), 0.0)
            .unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[2], PathElement::LineTo { end: p(0.0, 0.0) });
        assert!(path.is_closed());
    }

    #[test]
    fn close_with_bulge_makes_full_circle() {
        let mut path = Path::default();
        path.add_2d_polyline([(0.0, 0.0, 1.0), (2.0, 0.0, 1.0)], true, &Ocs::default(), 0.0)
            .unwrap();
        assert!(path.is_closed());
        assert_eq!(path.len(), 4);
        assert!(!path.has_lines());
        // Counter-clockwise circle.
        assert!(!path.has_clockwise_orientation());
        let length: f64 = path
            .approximate(64)
            .collect::<Vec<_>>()
            .windows(2)
            .map(|w| (w[1] - w[0]).norm())
            .sum();
        assert!((length - TAU).abs() < 1e-2, "length={length}");
    }

    #[test]
    fn polyline_is_mapped_to_wcs() {
        let ocs = Ocs::new(-Vector3::z()).unwrap();
        let mut path = Path::default();
        path.add_2d_polyline([(1.0, 0.0, 0.0), (1.0, 1.0, 0.0)], false, &ocs, 2.0)
            .unwrap();
        assert_abs_diff_eq!(path.start(), Point3::new(-1.0, 0.0, -2.0), epsilon = TOLERANCE);
        assert_abs_diff_eq!(path.end(), Point3::new(-1.0, 1.0, -2.0), epsilon = TOLERANCE);
    }

    #[test]
    fn elevation_alone_lifts_every_point() {
        let mut path = Path::default();
        path.add_2d_polyline([(0.0, 0.0, 0.5), (1.0, 0.0, 0.0)], false, &Ocs::default(), 3.0)
            .unwrap();
        assert!(path.control_vertices().all(|v| (v.z - 3.0).abs() < TOLERANCE));
    }

    #[test]
    fn polyline_requires_empty_path() {
        let mut path = Path::default();
        path.line_to(p(1.0, 0.0));
        let err = path
            .add_2d_polyline([(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)], false, &Ocs::default(), 0.0)
            .unwrap_err();
        assert!(matches!(err, DxfPathError::Path(PathError::InvalidState(_))));
    }

    #[test]
    fn ellipse_resets_start_of_empty_path() {
        let e = Ellipse::from_arc(p(0.0, 0.0), 1.0, Vector3::z(), 0.0, 180.0).unwrap();
        let mut path = Path::default();
        path.add_ellipse(&e, 1, true);
        assert_abs_diff_eq!(path.start(), p(1.0, 0.0), epsilon = TOLERANCE);
        assert_eq!(path.len(), 2);
        assert!(!path.has_lines());
        assert_abs_diff_eq!(path.end(), p(-1.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn ellipse_without_reset_is_bridged() {
        let e = Ellipse::from_arc(p(0.0, 0.0), 1.0, Vector3::z(), 0.0, 90.0).unwrap();
        let mut path = Path::default();
        path.add_ellipse(&e, 1, false);
        assert_eq!(path.start(), Point3::origin());
        assert_eq!(path[0].kind(), Command::LineTo);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn zero_span_ellipse_is_ignored() {
        let e = Ellipse::from_arc(p(0.0, 0.0), 1.0, Vector3::z(), 45.0, 45.0).unwrap();
        let mut path = Path::new(p(5.0, 5.0));
        path.add_ellipse(&e, 1, true);
        assert!(path.is_empty());
        assert_eq!(path.start(), p(5.0, 5.0));
    }

    #[test]
    fn ellipse_segments_is_a_minimum() {
        let e = Ellipse::from_arc(p(0.0, 0.0), 1.0, Vector3::z(), 0.0, 360.0).unwrap();
        let mut path = Path::default();
        path.add_ellipse(&e, 6, true);
        assert_eq!(path.len(), 6);
        assert!(path.is_closed());
    }

    #[test]
    fn flattened_arc_stays_within_distance() {
        let r = 2.0;
        let e = Ellipse::from_arc(p(1.0, 1.0), r, Vector3::z(), 0.0, 270.0).unwrap();
        let mut path = Path::default();
        path.add_ellipse(&e, 1, true);
        let d = 0.01;
        let pts: Vec<Point3> = path.flattening(d, 4).collect();
        let center = p(1.0, 1.0);
        for w in pts.windows(2) {
            let mid = lerp(&w[0], &w[1], 0.5);
            let deviation = r - (mid - center).norm();
            assert!(deviation <= d + CUBIC_ARC_ERROR * r, "deviation={deviation}");
        }
        let angle_end = 1.5 * std::f64::consts::PI;
        assert_abs_diff_eq!(
            *pts.last().unwrap(),
            p(1.0 + r * angle_end.cos(), 1.0 + r * angle_end.sin()),
            epsilon = 1e-9
        );
    }

    #[test]
    fn cubic_spline_is_decomposed_exactly() {
        let spline = BSpline::new(
            vec![p(0.0, 0.0), p(1.0, 2.0), p(3.0, 3.0), p(5.0, 1.0), p(6.0, 0.0)],
            4,
        )
        .unwrap();
        let mut path = Path::default();
        path.add_spline(&spline, DEFAULT_SPLINE_LEVEL, true).unwrap();
        assert_abs_diff_eq!(path.start(), p(0.0, 0.0), epsilon = TOLERANCE);
        assert_eq!(path.len(), 2);
        assert!(!path.has_lines());
        assert_abs_diff_eq!(path.end(), p(6.0, 0.0), epsilon = TOLERANCE);
    }

    #[test]
    fn spline_with_full_multiplicity_knot_keeps_every_piece() {
        let pts = vec![
            p(0.0, 0.0),
            p(1.0, 2.0),
            p(3.0, 3.0),
            p(5.0, 1.0),
            p(6.0, 0.0),
            p(6.5, 2.0),
            p(6.0, 3.0),
            p(7.0, 1.0),
        ];
        let knots = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0];
        let spline = BSpline::with_knots(pts, 4, knots, None).unwrap();
        let mut path = Path::default();
        path.add_spline(&spline, DEFAULT_SPLINE_LEVEL, true).unwrap();
        assert_abs_diff_eq!(path.end(), spline.end_point(), epsilon = TOLERANCE);
        let kinds: Vec<Command> = path.iter().map(PathElement::kind).collect();
        assert_eq!(kinds, vec![Command::Curve4To, Command::LineTo, Command::Curve4To]);
    }

    #[test]
    fn quadratic_spline_is_approximated() {
        let spline = BSpline::new(vec![p(0.0, 0.0), p(1.0, 2.0), p(3.0, 3.0), p(5.0, 1.0)], 3).unwrap();
        let mut path = Path::default();
        path.add_spline(&spline, 2, true).unwrap();
        assert_eq!(path.len(), 6);
        assert!(!path.has_lines());
        assert_abs_diff_eq!(path.end(), p(5.0, 1.0), epsilon = TOLERANCE);
    }

    #[test]
    fn spline_without_reset_keeps_start() {
        let spline = BSpline::new(vec![p(1.0, 0.0), p(2.0, 1.0), p(3.0, 0.0), p(4.0, 1.0)], 4).unwrap();
        let mut path = Path::default();
        path.add_spline(&spline, DEFAULT_SPLINE_LEVEL, false).unwrap();
        assert_eq!(path.start(), Point3::origin());
        assert_eq!(path[0], PathElement::LineTo { end: p(1.0, 0.0) });
    }
}
