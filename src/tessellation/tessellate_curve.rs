use crate::geometry::Curve;
use crate::math::{lerp, Point3};

use super::{TessellationParams, MIN_RELATIVE_TOLERANCE};

/// Samples a curve at `segments` uniformly spaced parameter steps.
///
/// Yields `segments + 1` points; the first and last are the exact curve end
/// points. A segment count of zero is treated as one.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn approximate_curve<C: Curve + ?Sized>(curve: &C, segments: usize) -> Vec<Point3> {
    let segments = segments.max(1);
    let domain = curve.domain();
    let mut points = Vec::with_capacity(segments + 1);
    points.push(curve.start_point());
    for i in 1..segments {
        points.push(curve.evaluate(domain.at(i as f64 / segments as f64)));
    }
    points.push(curve.end_point());
    points
}

/// Adaptive recursive flattening of a curve.
///
/// The domain is split into `params.min_segments` base chords. A chord is
/// bisected while the distance between its midpoint and the curve point at the
/// middle parameter exceeds the tolerance. Bisection below a base chord stops
/// at `params.max_depth`, the chord is accepted as is at that depth.
///
/// The tolerance never drops below [`MIN_RELATIVE_TOLERANCE`] times the extent
/// of the base samples.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn flatten_curve<C: Curve + ?Sized>(curve: &C, params: &TessellationParams) -> Vec<Point3> {
    let segments = params.min_segments.max(1);
    let domain = curve.domain();

    let mut base: Vec<(f64, Point3)> = (1..segments)
        .map(|i| {
            let t = domain.at(i as f64 / segments as f64);
            (t, curve.evaluate(t))
        })
        .collect();
    base.push((domain.t_max, curve.end_point()));

    let mut start_point = curve.start_point();
    let mid_sample = curve.evaluate(domain.at(0.5));
    let tolerance = params
        .tolerance
        .max(extent(start_point, mid_sample, &base) * MIN_RELATIVE_TOLERANCE);

    let mut points = Vec::with_capacity(segments + 1);
    points.push(start_point);
    let mut t0 = domain.t_min;
    let mut capped = 0usize;
    let mut stack: Vec<(f64, Point3, u32)> = Vec::new();

    for (t_base, p_base) in base {
        stack.push((t_base, p_base, 0));

        while let Some((t1, end_point, depth)) = stack.pop() {
            let mid_t = (t0 + t1) * 0.5;
            let mid_point = curve.evaluate(mid_t);
            let chord_mid = lerp(&start_point, &end_point, 0.5);
            let within = (mid_point - chord_mid).norm() <= tolerance;
            if within || depth >= params.max_depth {
                if !within {
                    capped += 1;
                }
                points.push(end_point);
                t0 = t1;
                start_point = end_point;
            } else {
                stack.push((t1, end_point, depth + 1));
                stack.push((mid_t, mid_point, depth + 1));
            }
        }
    }

    if capped > 0 {
        tracing::debug!(
            capped,
            max_depth = params.max_depth,
            "flattening accepted chords at the depth limit"
        );
    }
    points
}

/// Bounding box diagonal of the given samples.
fn extent(first: Point3, second: Point3, rest: &[(f64, Point3)]) -> f64 {
    let mut min = first;
    let mut max = first;
    for p in std::iter::once(&second).chain(rest.iter().map(|(_, p)| p)) {
        min = min.inf(p);
        max = max.sup(p);
    }
    (max - min).norm()
}
