/// 2D arc/bulge math utilities.
///
/// Bulge convention: `bulge = tan(sweep_angle / 4)`.
/// - `bulge = 0`: straight line
/// - `bulge > 0`: counter-clockwise arc
/// - `bulge < 0`: clockwise arc
/// - `|bulge| = 1`: semicircle
use std::f64::consts::TAU;

use super::Point3;

/// Converts a bulge segment from `p1` to `p2` into a counter-clockwise arc.
///
/// Returns `(center, start_angle, end_angle, radius)` in radians. The arc
/// always runs counter-clockwise from `start_angle` to `end_angle`, so for a
/// negative bulge it starts at `p2` and ends at `p1`. The z coordinate of the
/// center is taken from `p1`. A zero bulge or zero-length chord returns `p1`
/// with zero angles and radius.
#[must_use]
pub fn bulge_to_arc(p1: &Point3, p2: &Point3, bulge: f64) -> (Point3, f64, f64, f64) {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let chord_len = (dx * dx + dy * dy).sqrt();

    if chord_len < 1e-12 || bulge == 0.0 {
        return (*p1, 0.0, 0.0, 0.0);
    }

    // Distance from chord midpoint to center, in half-chord units.
    let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
    let half = chord_len * 0.5;

    // Left normal of the chord.
    let nx = -dy / chord_len;
    let ny = dx / chord_len;

    let cx = (p1.x + p2.x) * 0.5 + sagitta_ratio * half * nx;
    let cy = (p1.y + p2.y) * 0.5 + sagitta_ratio * half * ny;

    // r = d*(1+b²)/(4*|b|) derived from r = d/(2*sin(θ/2)) with θ=4*atan(b)
    let radius = half * (1.0 + bulge * bulge) / (2.0 * bulge.abs());

    let center = Point3::new(cx, cy, p1.z);
    let angle_to = |p: &Point3| normalize_angle((p.y - cy).atan2(p.x - cx));
    if bulge < 0.0 {
        (center, angle_to(p2), angle_to(p1), radius)
    } else {
        (center, angle_to(p1), angle_to(p2), radius)
    }
}

/// Maps an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU {
        0.0
    } else {
        a
    }
}
