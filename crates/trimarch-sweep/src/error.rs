//! Error types for the sweep driver.

use thiserror::Error;
use trimarch_marching::MarchError;

/// Errors that stop a sweep before or while it runs.
///
/// A trial that runs out of triangle budget is not an error; see
/// [`MeshStatus::Partial`](crate::MeshStatus::Partial).
#[derive(Error, Debug)]
pub enum SweepError {
    /// Sweep parameters are out of range.
    #[error("invalid sweep configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Reading the configuration or writing the report failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The triangulator rejected its parameters.
    #[error("triangulation failed: {0}")]
    March(#[from] MarchError),
}

/// Result type for sweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;
