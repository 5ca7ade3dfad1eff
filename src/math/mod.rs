pub mod arc_2d;
pub mod ocs;
pub mod polygon_2d;

pub use ocs::Ocs;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Default tolerance for deciding whether two points coincide.
pub const POINT_TOLERANCE: f64 = 1e-9;

/// Returns `true` if `a` and `b` are within `tol` of each other.
#[must_use]
pub fn is_close(a: &Point3, b: &Point3, tol: f64) -> bool {
    (a - b).norm() <= tol
}

/// Returns a copy of `point` with its z coordinate replaced.
#[must_use]
pub fn with_z(point: &Point3, z: f64) -> Point3 {
    Point3::new(point.x, point.y, z)
}

/// Transforms a point by a 4x4 matrix (homogeneous coordinates).
#[must_use]
pub fn transform_point(matrix: &Matrix4, point: &Point3) -> Point3 {
    let v = matrix * nalgebra::Vector4::new(point.x, point.y, point.z, 1.0);
    Point3::new(v.x, v.y, v.z)
}

/// Linear interpolation between two points.
#[must_use]
pub fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}
