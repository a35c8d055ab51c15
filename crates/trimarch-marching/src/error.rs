//! Error types for the marching triangulator.

use thiserror::Error;

/// Errors that stop a triangulation before any triangle is produced.
///
/// Running out of triangle budget is not an error; it is reported as
/// [`Triangulation::Partial`](crate::Triangulation::Partial).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarchError {
    /// Resolution is not a positive finite number.
    #[error("resolution must be positive and finite, got {0}")]
    InvalidResolution(f64),

    /// Triangle budget of zero.
    #[error("triangle budget must be at least 1")]
    ZeroBudget,

    /// No lattice cell near the seed point straddles the surface, even after
    /// refining the spacing.
    #[error("surface not found on the lattice at delta {0}")]
    SurfaceNotFound(f64),
}

/// Result type for marching operations.
pub type Result<T> = std::result::Result<T, MarchError>;
