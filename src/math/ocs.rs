use crate::error::{GeometryError, Result};

use super::{Point3, Vector3, TOLERANCE};

/// Threshold of the arbitrary axis algorithm.
const ARBITRARY_AXIS_LIMIT: f64 = 1.0 / 64.0;

/// Object coordinate system of a planar entity.
///
/// The axes are derived from the extrusion direction with the arbitrary axis
/// algorithm, so every entity sharing an extrusion shares the same frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ocs {
    ux: Vector3,
    uy: Vector3,
    uz: Vector3,
}

impl Default for Ocs {
    fn default() -> Self {
        Self {
            ux: Vector3::x(),
            uy: Vector3::y(),
            uz: Vector3::z(),
        }
    }
}

impl Ocs {
    /// Creates the OCS for the given extrusion vector.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` if `extrusion` has zero length.
    pub fn new(extrusion: Vector3) -> Result<Self> {
        let len = extrusion.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let uz = extrusion / len;
        let ux = if uz.x.abs() < ARBITRARY_AXIS_LIMIT && uz.y.abs() < ARBITRARY_AXIS_LIMIT {
            Vector3::y().cross(&uz)
        } else {
            Vector3::z().cross(&uz)
        }
        .normalize();
        let uy = uz.cross(&ux).normalize();
        Ok(Self { ux, uy, uz })
    }

    /// Returns the x-axis of the OCS in WCS.
    #[must_use]
    pub fn ux(&self) -> &Vector3 {
        &self.ux
    }

    /// Returns the y-axis of the OCS in WCS.
    #[must_use]
    pub fn uy(&self) -> &Vector3 {
        &self.uy
    }

    /// Returns the extrusion direction.
    #[must_use]
    pub fn uz(&self) -> &Vector3 {
        &self.uz
    }

    /// Returns `true` if mapping to WCS changes coordinates.
    #[must_use]
    pub fn transform(&self) -> bool {
        (self.uz - Vector3::z()).norm() > TOLERANCE
    }

    /// Maps an OCS point to WCS.
    #[must_use]
    pub fn to_wcs(&self, point: &Point3) -> Point3 {
        Point3::from(self.ux * point.x + self.uy * point.y + self.uz * point.z)
    }
}
