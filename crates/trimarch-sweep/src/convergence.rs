//! Convergence statistics over a finished sweep.

use crate::record::SweepRecord;
use serde::Serialize;
use trimarch_surface::ImplicitSurface;

/// Relative errors of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorSample {
    /// Resolution of the trial.
    pub delta: f64,
    /// Relative area error.
    pub area_error: f64,
    /// Relative volume error.
    pub volume_error: f64,
}

impl ErrorSample {
    /// Errors of `record` against the closed forms of `surface`.
    pub fn from_record(record: &SweepRecord, surface: &ImplicitSurface) -> Self {
        Self {
            delta: record.delta,
            area_error: record.area_error(surface),
            volume_error: record.volume_error(surface),
        }
    }
}

/// How the errors evolved over the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergenceSummary {
    /// Errors of the first sample.
    pub first: ErrorSample,
    /// Errors of the last sample.
    pub last: ErrorSample,
    /// Observed order of the area error, if it could be fitted.
    pub area_order: Option<f64>,
    /// Observed order of the volume error, if it could be fitted.
    pub volume_order: Option<f64>,
}

impl ConvergenceSummary {
    /// Summarize samples in sweep order. `None` when there are none.
    pub fn from_samples(samples: &[ErrorSample]) -> Option<Self> {
        let first = *samples.first()?;
        let last = *samples.last()?;
        Some(Self {
            first,
            last,
            area_order: observed_order(samples.iter().map(|s| (s.delta, s.area_error))),
            volume_order: observed_order(samples.iter().map(|s| (s.delta, s.volume_error))),
        })
    }

    /// True when both errors at the end are below those at the start.
    pub fn improved(&self) -> bool {
        self.last.area_error < self.first.area_error
            && self.last.volume_error < self.first.volume_error
    }
}

/// Least-squares slope of `ln(error)` against `ln(delta)`.
///
/// Samples with a non-positive or non-finite error are ignored. Needs at
/// least two distinct deltas.
pub fn observed_order(samples: impl IntoIterator<Item = (f64, f64)>) -> Option<f64> {
    let points: Vec<(f64, f64)> = samples
        .into_iter()
        .filter(|&(delta, err)| delta > 0.0 && err > 0.0 && err.is_finite())
        .map(|(delta, err)| (delta.ln(), err.ln()))
        .collect();
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    let sxy: f64 = points
        .iter()
        .map(|p| (p.0 - mean_x) * (p.1 - mean_y))
        .sum();
    if sxx <= f64::EPSILON * n {
        return None;
    }
    Some(sxy / sxx)
}
