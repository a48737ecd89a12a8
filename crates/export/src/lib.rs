//! Export helpers for CSV trajectories and JSON run summaries.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub mod trajectory {
    use std::fs::File;
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    use drift_core::Particle;
    use serde::Serialize;

    use super::{ExportError, ensure_parent};

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        ensure_parent(path)?;
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// CSV row: one particle at one output step.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct Record {
        pub step: usize,
        pub time: f64,
        pub index: usize,
        pub x: f64,
        pub y: f64,
        pub z: f64,
        pub vx: f64,
        pub vy: f64,
        pub vz: f64,
    }

    impl Record {
        pub fn from_particle(step: usize, time: f64, index: usize, particle: &Particle) -> Self {
            let [x, y, z] = particle.position;
            let [vx, vy, vz] = particle.velocity;
            Self {
                step,
                time,
                index,
                x,
                y,
                z,
                vx,
                vy,
                vz,
            }
        }
    }

    /// Streams particle snapshots as CSV with a `step,time,index,x,y,z,vx,vy,vz` header.
    pub struct TrajectoryWriter<W: Write> {
        inner: csv::Writer<W>,
        rows: usize,
    }

    impl TrajectoryWriter<Box<dyn Write>> {
        /// Open a trajectory file (or stdout for `-`).
        pub fn create(path: &Path) -> Result<Self, ExportError> {
            Ok(Self::new(writer_for_path(path)?))
        }
    }

    impl<W: Write> TrajectoryWriter<W> {
        pub fn new(writer: W) -> Self {
            Self {
                inner: csv::Writer::from_writer(writer),
                rows: 0,
            }
        }

        /// Append every particle of one snapshot.
        pub fn write_snapshot(
            &mut self,
            step: usize,
            time: f64,
            particles: &[Particle],
        ) -> Result<(), ExportError> {
            for (index, particle) in particles.iter().enumerate() {
                self.inner
                    .serialize(Record::from_particle(step, time, index, particle))?;
                self.rows += 1;
            }
            Ok(())
        }

        /// Rows written so far.
        pub fn rows(&self) -> usize {
            self.rows
        }

        pub fn flush(&mut self) -> Result<(), ExportError> {
            self.inner.flush()?;
            Ok(())
        }

        /// Flush and hand back the underlying writer.
        pub fn into_inner(self) -> Result<W, ExportError> {
            self.inner
                .into_inner()
                .map_err(|err| ExportError::Io(err.into_error()))
        }
    }
}

pub mod summary {
    use std::fs::File;
    use std::path::Path;

    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use super::{ExportError, ensure_parent};

    /// Conservation diagnostics for one orbiting particle.
    #[derive(Debug, Clone, Serialize)]
    pub struct ParticleSummary {
        pub index: usize,
        pub energy_initial: f64,
        pub energy_final: f64,
        pub energy_relative_drift: f64,
        pub angular_momentum_relative_drift: f64,
    }

    /// Envelope of a completed run.
    #[derive(Debug, Clone, Serialize)]
    pub struct RunSummary {
        pub scenario: String,
        pub steps: usize,
        pub dt: f64,
        pub initial_time: f64,
        pub final_time: f64,
        pub skipped_particle_steps: usize,
        pub max_solver_iterations: usize,
        pub particles: Vec<ParticleSummary>,
    }

    /// Write the summary as pretty-printed JSON, creating parent directories.
    pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<(), ExportError> {
        ensure_parent(path)?;
        to_writer_pretty(File::create(path)?, summary)?;
        Ok(())
    }
}
