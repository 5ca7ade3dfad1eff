use super::Point3;

/// Computes the signed area of a polygon in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. The polygon is
/// closed implicitly, z coordinates are ignored.
#[must_use]
pub fn signed_area_2d(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` if the vertices wind clockwise in the XY plane.
///
/// Fewer than three vertices or a zero area count as counter-clockwise.
#[must_use]
pub fn has_clockwise_orientation<I>(vertices: I) -> bool
where
    I: IntoIterator<Item = Point3>,
{
    let points: Vec<Point3> = vertices.into_iter().collect();
    signed_area_2d(&points) < 0.0
}
