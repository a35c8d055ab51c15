//! sphere-sweep - triangulation convergence check
//!
//! Triangulates a sphere at a geometric sweep of resolutions and prints one
//! tab-separated line per trial: delta, vertex count, triangle count, mesh
//! area and mesh volume. Budget overruns are reported on stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use trimarch_sweep::{FailurePolicy, ReportWriter, Sweep, SweepConfig};

#[derive(Parser, Debug)]
#[command(name = "sphere-sweep")]
#[command(about = "Sphere area/volume convergence sweep for the marching triangulator", long_about = None)]
struct Cli {
    /// TOML file with sweep settings; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Sphere radius
    #[arg(long)]
    radius: Option<f64>,
    /// Resolution of the first trial
    #[arg(long)]
    delta0: Option<f64>,
    /// Resolution the sweep decays towards
    #[arg(long)]
    delta1: Option<f64>,
    /// Number of trials
    #[arg(long)]
    steps: Option<usize>,
    /// Triangle budget per trial
    #[arg(long)]
    max_triangles: Option<usize>,
    /// Handling of trials over budget: measure, skip or flag
    #[arg(long)]
    policy: Option<FailurePolicy>,
}

impl Cli {
    /// Defaults, then the config file, then individual flags.
    fn resolve(&self) -> Result<SweepConfig> {
        let mut config = match &self.config {
            Some(path) => SweepConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => SweepConfig::default(),
        };
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        if let Some(delta0) = self.delta0 {
            config.delta0 = delta0;
        }
        if let Some(delta1) = self.delta1 {
            config.delta1 = delta1;
        }
        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if let Some(max_triangles) = self.max_triangles {
            config.max_triangles = max_triangles;
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Bare messages: the budget diagnostic is a fixed line on stderr.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let cli = Cli::parse();
    let config = cli.resolve()?;
    log::debug!("sweep configuration: {config:?}");

    let mut sweep = Sweep::new(config)?;
    let stdout = io::stdout();
    let mut report = ReportWriter::new(stdout.lock(), sweep.config().policy.flags_status());
    sweep
        .run_with(|record| report.write_record(record))
        .context("sweep aborted")?;

    Ok(())
}
