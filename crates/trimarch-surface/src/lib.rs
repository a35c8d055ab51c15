#![warn(missing_docs)]

//! Implicit surface descriptors for the trimarch triangulator.
//!
//! A surface is described by a scalar field whose zero level set is the
//! surface itself: negative inside, positive outside. Descriptors are plain
//! values; the triangulator receives one by reference and never holds on to
//! any mutable state of the caller.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use trimarch_math::{Dir3, Point3, Tolerance, Vec3};

/// Maximum Newton steps taken by [`ImplicitSurface::project`].
const MAX_PROJECTION_STEPS: usize = 16;

/// An implicitly defined closed surface.
///
/// Parameterization is by level set: `value(p) == 0` on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImplicitSurface {
    /// Sphere centered at the origin.
    Sphere {
        /// Radius of the sphere.
        radius: f64,
    },
}

impl ImplicitSurface {
    /// Create a sphere centered at the origin with the given radius.
    pub fn sphere(radius: f64) -> Self {
        Self::Sphere { radius }
    }

    /// Signed field value at `p`; negative inside, positive outside.
    ///
    /// For the sphere this is the exact signed distance.
    pub fn value(&self, p: &Point3) -> f64 {
        match *self {
            Self::Sphere { radius } => p.coords.norm() - radius,
        }
    }

    /// Gradient of the field at `p`.
    ///
    /// Returns the zero vector where the gradient is undefined (sphere center).
    pub fn gradient(&self, p: &Point3) -> Vec3 {
        match *self {
            Self::Sphere { .. } => {
                let r = p.coords.norm();
                if r > 0.0 {
                    p.coords / r
                } else {
                    Vec3::zeros()
                }
            }
        }
    }

    /// Outward unit normal at `p`.
    ///
    /// Falls back to +Z where the gradient vanishes.
    pub fn normal(&self, p: &Point3) -> Dir3 {
        Dir3::try_new(self.gradient(p), 0.0).unwrap_or_else(|| Dir3::new_normalize(Vec3::z()))
    }

    /// A point lying on the surface, used to seed the marching front.
    pub fn seed_point(&self) -> Point3 {
        match *self {
            Self::Sphere { radius } => Point3::new(radius, 0.0, 0.0),
        }
    }

    /// Characteristic length of the surface (radius for spheres).
    pub fn scale(&self) -> f64 {
        match *self {
            Self::Sphere { radius } => radius.abs(),
        }
    }

    /// Move `p` onto the zero level set by Newton iteration along the gradient.
    ///
    /// Stops early once the field value is within `tol` (scaled by the
    /// surface size) or when the gradient vanishes.
    pub fn project(&self, p: &Point3, tol: &Tolerance) -> Point3 {
        let eps = tol.scaled(self.scale());
        let mut q = *p;
        for _ in 0..MAX_PROJECTION_STEPS {
            let f = self.value(&q);
            if f.abs() <= eps {
                break;
            }
            let g = self.gradient(&q);
            let g2 = g.norm_squared();
            if g2 == 0.0 {
                break;
            }
            q -= g * (f / g2);
        }
        q
    }

    /// Closed-form surface area.
    pub fn area(&self) -> f64 {
        match *self {
            Self::Sphere { radius } => 4.0 * PI * radius * radius,
        }
    }

    /// Closed-form enclosed volume.
    pub fn volume(&self) -> f64 {
        match *self {
            Self::Sphere { radius } => 4.0 / 3.0 * PI * radius * radius * radius,
        }
    }
}
