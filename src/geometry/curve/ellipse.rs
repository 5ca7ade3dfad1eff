use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::{GeometryError, Result};
use crate::math::{Ocs, Point3, Vector3, TOLERANCE};

use super::{Bezier4, Curve, CurveDomain};

/// An ellipse (or elliptical arc) in 3D space.
///
/// Defined by a center, semi-major and semi-minor axes, a normal,
/// a major axis direction, and a parameter range in radians.
///
/// `P(t) = center + a * cos(t) * major_dir + b * sin(t) * minor_dir`
/// where `minor_dir = normal x major_dir`. The arc always runs in positive
/// parameter direction from `start_angle` to `end_angle`.
#[derive(Debug, Clone)]
pub struct Ellipse {
    center: Point3,
    semi_major: f64,
    semi_minor: f64,
    normal: Vector3,
    major_dir: Vector3,
    start_angle: f64,
    end_angle: f64,
}

impl Ellipse {
    /// Creates a new ellipse.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the ellipse
    /// * `semi_major` - Semi-major axis length (must be positive)
    /// * `semi_minor` - Semi-minor axis length (must be positive)
    /// * `normal` - Normal vector defining the ellipse plane
    /// * `major_dir` - Major axis direction (must be perpendicular to normal)
    /// * `start_angle` - Start parameter in radians
    /// * `end_angle` - End parameter in radians
    ///
    /// # Errors
    ///
    /// Returns an error if either axis length is non-positive, the normal is
    /// zero-length, or the major direction is not perpendicular to the normal.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        center: Point3,
        semi_major: f64,
        semi_minor: f64,
        normal: Vector3,
        major_dir: Vector3,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<Self> {
        if semi_major < TOLERANCE {
            return Err(
                GeometryError::Degenerate("semi-major axis must be positive".into()).into(),
            );
        }
        if semi_minor < TOLERANCE {
            return Err(
                GeometryError::Degenerate("semi-minor axis must be positive".into()).into(),
            );
        }

        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / normal_len;

        let major_len = major_dir.norm();
        if major_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let major_dir = major_dir / major_len;

        if normal.dot(&major_dir).abs() > TOLERANCE {
            return Err(GeometryError::Degenerate(
                "major direction must be perpendicular to normal".into(),
            )
            .into());
        }

        Ok(Self {
            center,
            semi_major,
            semi_minor,
            normal,
            major_dir,
            start_angle,
            end_angle,
        })
    }

    /// Creates a circular arc, angles in degrees measured from the x-axis of
    /// the OCS defined by `normal`.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or the normal is
    /// zero-length.
    pub fn from_arc(
        center: Point3,
        radius: f64,
        normal: Vector3,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<Self> {
        let ocs = Ocs::new(normal)?;
        Self::new(
            center,
            radius,
            radius,
            *ocs.uz(),
            *ocs.ux(),
            start_angle.to_radians(),
            end_angle.to_radians(),
        )
    }

    /// Returns the center of the ellipse.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the semi-major axis length.
    #[must_use]
    pub fn semi_major(&self) -> f64 {
        self.semi_major
    }

    /// Returns the semi-minor axis length.
    #[must_use]
    pub fn semi_minor(&self) -> f64 {
        self.semi_minor
    }

    /// Returns the normal vector of the ellipse plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Returns the major axis direction.
    #[must_use]
    pub fn major_dir(&self) -> &Vector3 {
        &self.major_dir
    }

    /// Returns the start parameter.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// Returns the end parameter.
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    /// Returns the parameter span in `[0, 2π]`.
    ///
    /// Raw parameters a full turn apart give `2π`, identical parameters give 0.
    #[must_use]
    pub fn param_span(&self) -> f64 {
        let raw = self.end_angle - self.start_angle;
        let span = raw.rem_euclid(TAU);
        if span < TOLERANCE || TAU - span < TOLERANCE {
            if raw.abs() > PI {
                TAU
            } else {
                0.0
            }
        } else {
            span
        }
    }

    /// Converts the arc to cubic Bézier curves.
    ///
    /// Produces at least one curve per quarter turn and at least `segments`
    /// curves, all spanning equal parameter ranges. A zero span yields none.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn to_cubic_beziers(&self, segments: usize) -> Vec<Bezier4> {
        let span = self.param_span();
        if span < TOLERANCE {
            return Vec::new();
        }
        let quarters = (span / FRAC_PI_2 - TOLERANCE).ceil().max(1.0) as usize;
        let count = quarters.max(segments);
        let delta = span / count as f64;
        let k = 4.0 / 3.0 * (delta / 4.0).tan();

        (0..count)
            .map(|i| {
                let t0 = self.start_angle + delta * i as f64;
                let t1 = t0 + delta;
                let p0 = self.evaluate(t0);
                let p3 = self.evaluate(t1);
                Bezier4::new([
                    p0,
                    p0 + self.derivative(t0) * k,
                    p3 - self.derivative(t1) * k,
                    p3,
                ])
            })
            .collect()
    }

    /// Computes the minor axis direction (`normal x major_dir`).
    fn minor_dir(&self) -> Vector3 {
        self.normal.cross(&self.major_dir)
    }

    /// First derivative with respect to the parameter.
    fn derivative(&self, t: f64) -> Vector3 {
        self.major_dir * (-self.semi_major * t.sin()) + self.minor_dir() * (self.semi_minor * t.cos())
    }
}

impl Curve for Ellipse {
    fn evaluate(&self, t: f64) -> Point3 {
        let minor = self.minor_dir();
        let x = self.semi_major * t.cos();
        let y = self.semi_minor * t.sin();
        self.center + self.major_dir * x + minor * y
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(self.start_angle, self.start_angle + self.param_span())
    }
}
