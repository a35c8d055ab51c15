#![warn(missing_docs)]

//! Math types for the trimarch triangulation harness.
//!
//! Thin wrappers around nalgebra providing the point, vector and direction
//! types shared by the surface, mesh and marching crates, plus the projection
//! tolerance and the relative error used when comparing measured quantities.

use nalgebra::{Unit, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Tolerance used when snapping points onto a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Absolute distance tolerance, relative to a unit-sized surface.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-12).
    pub const DEFAULT: Self = Self { linear: 1e-12 };

    /// Distance tolerance for a surface of characteristic length `scale`.
    ///
    /// Surfaces smaller than unit size keep the absolute tolerance.
    pub fn scaled(&self, scale: f64) -> f64 {
        self.linear * scale.max(1.0)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Relative deviation `|measured - exact| / |exact|`.
///
/// Returns the absolute deviation when `exact` is zero.
pub fn relative_error(measured: f64, exact: f64) -> f64 {
    let diff = (measured - exact).abs();
    if exact == 0.0 {
        diff
    } else {
        diff / exact.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_scaled() {
        let tol = Tolerance::DEFAULT;
        assert_eq!(tol.scaled(1000.0), 1e-9);
        assert_eq!(tol.scaled(0.01), 1e-12);
        assert_eq!(Tolerance::default(), tol);
    }

    #[test]
    fn test_relative_error() {
        assert!((relative_error(11.0, 10.0) - 0.1).abs() < 1e-12);
        assert!((relative_error(9.0, -10.0) - 1.9).abs() < 1e-12);
        assert_eq!(relative_error(0.5, 0.0), 0.5);
    }

    #[test]
    fn test_dir3_is_unit() {
        let d = Dir3::new_normalize(Vec3::new(3.0, 0.0, 4.0));
        assert!((d.as_ref().norm() - 1.0).abs() < 1e-12);
        assert!((d.as_ref().x - 0.6).abs() < 1e-12);
    }
}
