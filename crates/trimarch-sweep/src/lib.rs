#![warn(missing_docs)]

//! Resolution sweep for validating the marching triangulator on a sphere.
//!
//! Each trial triangulates a sphere of known radius at a geometrically
//! shrinking resolution, measures the mesh, and emits one record of
//! `(delta, vertices, triangles, area, volume)`. Comparing those against
//! `4πR²` and `4π/3·R³` shows how fast the triangulation converges.
//!
//! # Example
//!
//! ```no_run
//! use trimarch_sweep::{ReportWriter, Sweep, SweepConfig};
//!
//! let mut sweep = Sweep::new(SweepConfig::default())?;
//! let mut report = ReportWriter::new(std::io::stdout().lock(), false);
//! let summary = sweep.run_with(|record| report.write_record(record))?;
//! println!("{} records", summary.emitted);
//! # Ok::<(), trimarch_sweep::SweepError>(())
//! ```

pub mod config;
pub mod convergence;
pub mod error;
pub mod record;
pub mod schedule;

pub use config::{FailurePolicy, SweepConfig};
pub use convergence::{observed_order, ConvergenceSummary, ErrorSample};
pub use error::{Result, SweepError};
pub use record::{MeshStatus, ReportWriter, SweepRecord};
pub use schedule::{decay_factor, Schedule};

use log::{debug, info, warn};
use trimarch_marching::{MarchParams, Marcher};
use trimarch_mesh::measure;
use trimarch_surface::ImplicitSurface;

/// Diagnostic written when a trial exceeds its triangle budget.
pub const BUDGET_WARNING: &str = "There is too much triangles";

/// Totals for a finished sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSummary {
    /// Records handed to the sink.
    pub emitted: usize,
    /// Trials whose triangulation ran out of budget.
    pub partial: usize,
    /// Records dropped by [`FailurePolicy::Skip`].
    pub skipped: usize,
    /// Error trend over the complete trials.
    pub convergence: Option<ConvergenceSummary>,
}

/// The sweep driver.
#[derive(Debug)]
pub struct Sweep {
    config: SweepConfig,
    marcher: Marcher,
}

impl Sweep {
    /// Create a driver for a validated configuration.
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            marcher: Marcher::new(),
        })
    }

    /// The configuration this sweep runs with.
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// The surface being triangulated.
    pub fn surface(&self) -> ImplicitSurface {
        ImplicitSurface::sphere(self.config.radius)
    }

    /// The resolution of every trial, in order.
    pub fn schedule(&self) -> Schedule {
        Schedule::new(self.config.delta0, self.config.delta1, self.config.steps)
    }

    /// Run every trial, passing each record to `sink` as soon as it exists.
    ///
    /// A trial that exceeds the triangle budget logs [`BUDGET_WARNING`] and is
    /// then handled according to the configured [`FailurePolicy`]. Only sink
    /// or triangulator errors stop the sweep.
    pub fn run_with<F>(&mut self, mut sink: F) -> Result<SweepSummary>
    where
        F: FnMut(&SweepRecord) -> std::io::Result<()>,
    {
        let policy = self.config.policy;
        let mut summary = SweepSummary {
            emitted: 0,
            partial: 0,
            skipped: 0,
            convergence: None,
        };
        let mut samples = Vec::with_capacity(self.config.steps);

        for (index, delta) in self.schedule() {
            let surface = self.surface();
            let params = MarchParams::new(delta, self.config.max_triangles);
            let triangulation = self.marcher.triangulate(&surface, &params)?;

            let status = if triangulation.is_complete() {
                MeshStatus::Complete
            } else {
                warn!("{BUDGET_WARNING}");
                summary.partial += 1;
                MeshStatus::Partial
            };
            if status == MeshStatus::Partial && policy == FailurePolicy::Skip {
                debug!("trial {index} at delta {delta:e} skipped");
                summary.skipped += 1;
                continue;
            }

            let mesh = triangulation.mesh();
            if status == MeshStatus::Complete {
                if let Err(e) = mesh.check_closed() {
                    warn!("trial {index} at delta {delta:e}: {e}; volume is unreliable");
                }
            }
            let m = measure(mesh);
            let record = SweepRecord {
                index,
                delta,
                vertices: mesh.num_vertices(),
                triangles: mesh.num_triangles(),
                area: m.area,
                volume: m.volume,
                status,
            };
            debug!(
                "trial {index}: delta {delta:e}, {} vertices, {} triangles, area error {:e}, volume error {:e}",
                record.vertices,
                record.triangles,
                record.area_error(&surface),
                record.volume_error(&surface)
            );
            if record.is_complete() {
                samples.push(ErrorSample::from_record(&record, &surface));
            }

            sink(&record)?;
            summary.emitted += 1;
        }

        summary.convergence = ConvergenceSummary::from_samples(&samples);
        if let Some(c) = &summary.convergence {
            info!(
                "area error {:e} -> {:e} (order {}), volume error {:e} -> {:e} (order {})",
                c.first.area_error,
                c.last.area_error,
                format_order(c.area_order),
                c.first.volume_error,
                c.last.volume_error,
                format_order(c.volume_order)
            );
        }
        Ok(summary)
    }

    /// Run every trial and collect the records.
    pub fn run(&mut self) -> Result<Vec<SweepRecord>> {
        let mut records = Vec::with_capacity(self.config.steps);
        self.run_with(|record| {
            records.push(*record);
            Ok(())
        })?;
        Ok(records)
    }
}

fn format_order(order: Option<f64>) -> String {
    order.map_or_else(|| "n/a".to_string(), |o| format!("{o:.3}"))
}
