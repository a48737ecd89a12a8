use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail, ensure};
use clap::{Parser, ValueEnum};
use kepler_drift::diagnostics::{conservation_drift, invariants};
use kepler_drift::export::summary::{ParticleSummary, RunSummary, write_summary};
use kepler_drift::export::trajectory::TrajectoryWriter;
use kepler_drift::scenario::load_simulation;
use kepler_drift::{DriverError, FailurePolicy};

/// Integrate a scenario with the Kepler drift and export the trajectory.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Kepler drift integrator for particles around a central mass"
)]
struct Cli {
    /// Scenario file (TOML or YAML)
    #[arg(long)]
    scenario: PathBuf,

    /// Number of steps to integrate
    #[arg(long, default_value_t = 100)]
    steps: usize,

    /// Write every k-th step to the trajectory output (the final step is always written)
    #[arg(long, default_value_t = 1)]
    every: usize,

    /// Trajectory CSV path (`-` for stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Run summary JSON path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Override the scenario's failure policy
    #[arg(long, value_enum)]
    on_failure: Option<FailureArg>,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum FailureArg {
    Abort,
    Skip,
}

impl From<FailureArg> for FailurePolicy {
    fn from(value: FailureArg) -> Self {
        match value {
            FailureArg::Abort => FailurePolicy::Abort,
            FailureArg::Skip => FailurePolicy::Skip,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    ensure!(cli.every > 0, "--every must be at least 1");

    let (config, mut sim) = load_simulation(&cli.scenario)
        .with_context(|| format!("loading scenario {}", cli.scenario.display()))?;
    if let Some(mode) = cli.on_failure {
        let mut settings = *sim.settings();
        settings.on_failure = mode.into();
        sim = sim.with_settings(settings);
    }

    let csv_on_stdout = cli.output.as_deref() == Some(Path::new("-"));
    let mut writer = cli
        .output
        .as_deref()
        .map(TrajectoryWriter::create)
        .transpose()?;
    if let Some(writer) = writer.as_mut() {
        writer.write_snapshot(0, sim.time(), sim.particles())?;
    }

    let initial = invariants(&sim);
    let initial_time = sim.time();
    let mut skipped = 0;
    let mut max_iterations = 0;

    for step in 1..=cli.steps {
        let report = match sim.step() {
            Ok(report) => report,
            Err(DriverError::StepFailed { time, failures }) => {
                for failure in &failures {
                    eprintln!("[error] t = {time}: {failure}");
                }
                bail!(
                    "aborted at step {step}: {} particle(s) failed to propagate",
                    failures.len()
                );
            }
            Err(err) => return Err(err.into()),
        };

        for failure in &report.skipped {
            eprintln!("[warn] step {step}: skipped {failure}");
        }
        skipped += report.skipped.len();
        max_iterations = max_iterations.max(report.max_iterations);

        if step % cli.every == 0 || step == cli.steps {
            if let Some(writer) = writer.as_mut() {
                writer.write_snapshot(step, sim.time(), sim.particles())?;
            }
        }
    }
    if let Some(writer) = writer.as_mut() {
        writer.flush()?;
    }

    let drift = conservation_drift(&initial, &invariants(&sim));

    let mut out: Box<dyn Write> = if csv_on_stdout {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    writeln!(out, "=== Kepler drift ===")?;
    writeln!(out, "Scenario       : {}", config.name)?;
    writeln!(
        out,
        "Particles      : {} (central mass = {})",
        sim.particles().len(),
        sim.central_mass()
    )?;
    writeln!(
        out,
        "Steps          : {} (dt = {}, t = {} -> {})",
        cli.steps,
        sim.dt(),
        initial_time,
        sim.time()
    )?;
    writeln!(
        out,
        "Solver         : max iterations = {max_iterations}, skipped particle-steps = {skipped}"
    )?;
    for d in &drift {
        writeln!(
            out,
            "  particle {:>4}: dE/E = {:.3e}, dL/L = {:.3e}",
            d.index, d.energy, d.angular_momentum
        )?;
    }

    if let Some(path) = &cli.summary {
        let summary = RunSummary {
            scenario: config.name.clone(),
            steps: cli.steps,
            dt: sim.dt(),
            initial_time,
            final_time: sim.time(),
            skipped_particle_steps: skipped,
            max_solver_iterations: max_iterations,
            particles: drift
                .iter()
                .map(|d| ParticleSummary {
                    index: d.index,
                    energy_initial: d.energy_initial,
                    energy_final: d.energy_final,
                    energy_relative_drift: d.energy,
                    angular_momentum_relative_drift: d.angular_momentum,
                })
                .collect(),
        };
        write_summary(path, &summary)
            .with_context(|| format!("writing summary {}", path.display()))?;
    }

    Ok(())
}
