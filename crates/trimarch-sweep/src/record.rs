//! Sweep records and the tab-separated report.

use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use trimarch_math::relative_error;
use trimarch_surface::ImplicitSurface;

/// Whether a trial's mesh covers the whole surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshStatus {
    /// Triangulation finished within budget.
    Complete,
    /// Triangulation hit the budget; the mesh is a fragment.
    Partial,
}

impl fmt::Display for MeshStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Complete => "complete",
            Self::Partial => "partial",
        })
    }
}

/// Measurement of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepRecord {
    /// Trial index, starting at 0.
    pub index: usize,
    /// Resolution used for the trial.
    pub delta: f64,
    /// Number of mesh vertices.
    pub vertices: usize,
    /// Number of mesh triangles.
    pub triangles: usize,
    /// Mesh surface area.
    pub area: f64,
    /// Mesh enclosed volume.
    pub volume: f64,
    /// Coverage of the mesh.
    pub status: MeshStatus,
}

impl SweepRecord {
    /// Relative deviation of the area from the closed form of `surface`.
    pub fn area_error(&self, surface: &ImplicitSurface) -> f64 {
        relative_error(self.area, surface.area())
    }

    /// Relative deviation of the volume from the closed form of `surface`.
    pub fn volume_error(&self, surface: &ImplicitSurface) -> f64 {
        relative_error(self.volume, surface.volume())
    }

    /// True when the mesh covered the whole surface.
    pub fn is_complete(&self) -> bool {
        self.status == MeshStatus::Complete
    }

    /// One report line without the trailing newline.
    ///
    /// Fields are `delta`, `vertices`, `triangles`, `area`, `volume` in
    /// scientific notation with 16 fractional digits, separated by tabs.
    /// With `with_status` the mesh status is appended as a sixth field.
    ///
    /// The two counts are formatted as floats too (`13` becomes
    /// `1.3000000000000000e1`), so readers must parse every numeric column
    /// as a float and convert the counts back to integers.
    pub fn to_tsv(&self, with_status: bool) -> String {
        let mut line = [
            self.delta,
            self.vertices as f64,
            self.triangles as f64,
            self.area,
            self.volume,
        ]
        .iter()
        .map(|v| format!("{v:.16e}"))
        .collect::<Vec<_>>()
        .join("\t");
        if with_status {
            line.push('\t');
            line.push_str(&self.status.to_string());
        }
        line
    }
}

/// Line-buffered writer for sweep reports.
#[derive(Debug)]
pub struct ReportWriter<W: Write> {
    out: W,
    with_status: bool,
}

impl<W: Write> ReportWriter<W> {
    /// Writer emitting five columns, or six with `with_status`.
    pub fn new(out: W, with_status: bool) -> Self {
        Self { out, with_status }
    }

    /// Write one record and flush.
    pub fn write_record(&mut self, record: &SweepRecord) -> io::Result<()> {
        writeln!(self.out, "{}", record.to_tsv(self.with_status))?;
        self.out.flush()
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}
