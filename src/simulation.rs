//! Simulation state and the two-phase step driver.
//!
//! The driver owns the particle collection and the clock. Each step runs a no-op
//! pre-force phase (`part1`) followed by the Kepler drift of every particle around the
//! central mass (`part2`), after which the clock advances by `dt`.

use drift_core::Particle;
use drift_core::constants::CENTRAL_INDEX;
use drift_kepler::{KeplerError, SolverSettings, propagate};
use thiserror::Error;

/// What `part2` does when a particle fails to propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Commit nothing, keep the clock, and return the failures.
    #[default]
    Abort,
    /// Commit the successful particles, keep failed ones at their pre-step state.
    Skip,
}

/// Options of the Kepler drift integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorSettings {
    pub solver: SolverSettings,
    pub on_failure: FailurePolicy,
    /// Accepted for compatibility with other integrators; no effect here.
    pub force_is_velocity_dependent: bool,
    /// Accepted for compatibility with other integrators; no effect here.
    pub epsilon: f64,
    /// Accepted for compatibility with other integrators; no effect here.
    pub min_dt: f64,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            solver: SolverSettings::default(),
            on_failure: FailurePolicy::default(),
            force_is_velocity_dependent: true,
            epsilon: 0.0,
            min_dt: 0.0,
        }
    }
}

/// A particle that could not be advanced.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("particle {index}: {error}")]
pub struct ParticleFailure {
    pub index: usize,
    #[source]
    pub error: KeplerError,
}

/// Outcome of one `part2` pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub advanced: usize,
    pub skipped: Vec<ParticleFailure>,
    pub max_iterations: usize,
}

/// Aggregate of several steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegrationReport {
    pub steps: usize,
    pub skipped_particle_steps: usize,
    pub max_iterations: usize,
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("simulation requires a central mass at index 0")]
    MissingCentralMass,
    #[error("timestep must be finite and non-zero (got {0})")]
    InvalidTimestep(f64),
    #[error("kepler step at t = {time} failed for {} particle(s)", .failures.len())]
    StepFailed {
        time: f64,
        failures: Vec<ParticleFailure>,
    },
}

/// Particles, clock and integrator options.
#[derive(Debug, Clone)]
pub struct Simulation {
    particles: Vec<Particle>,
    t: f64,
    dt: f64,
    settings: IntegratorSettings,
}

impl Simulation {
    /// Particle 0 is the central mass; every other particle orbits it.
    pub fn new(particles: Vec<Particle>, dt: f64) -> Result<Self, DriverError> {
        if particles.is_empty() {
            return Err(DriverError::MissingCentralMass);
        }
        if !dt.is_finite() || dt == 0.0 {
            return Err(DriverError::InvalidTimestep(dt));
        }
        Ok(Self {
            particles,
            t: 0.0,
            dt,
            settings: IntegratorSettings::default(),
        })
    }

    /// Replace the integrator options.
    pub fn with_settings(mut self, settings: IntegratorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Start the clock at `t` instead of zero.
    pub fn with_time(mut self, t: f64) -> Self {
        self.t = t;
        self
    }

    /// All particles, central mass first.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for an external force model acting between `part1` and `part2`.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Mass of particle 0.
    pub fn central_mass(&self) -> f64 {
        self.particles[CENTRAL_INDEX].mass
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Fixed timestep.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Integrator options in effect.
    pub fn settings(&self) -> &IntegratorSettings {
        &self.settings
    }

    /// Pre-force phase. The Kepler drift needs no work here.
    pub fn part1(&mut self) {}

    /// Drift every orbiting particle by `dt`, then advance the clock.
    ///
    /// New states are computed from the pre-step snapshot before anything is written, so
    /// the clock only moves once every particle has been handled.
    pub fn part2(&mut self) -> Result<StepReport, DriverError> {
        let central_mass = self.central_mass();
        let mut updates = Vec::with_capacity(self.particles.len().saturating_sub(1));
        let mut failures = Vec::new();
        let mut max_iterations = 0;

        for (index, particle) in self.particles.iter().enumerate().skip(CENTRAL_INDEX + 1) {
            match propagate(particle, central_mass, self.dt, &self.settings.solver) {
                Ok((next, step)) => {
                    max_iterations = max_iterations.max(step.iterations);
                    updates.push((index, next));
                }
                Err(error) => failures.push(ParticleFailure { index, error }),
            }
        }

        if !failures.is_empty() && self.settings.on_failure == FailurePolicy::Abort {
            return Err(DriverError::StepFailed {
                time: self.t,
                failures,
            });
        }

        let advanced = updates.len();
        for (index, next) in updates {
            self.particles[index] = next;
        }
        self.t += self.dt;

        Ok(StepReport {
            advanced,
            skipped: failures,
            max_iterations,
        })
    }

    /// One full tick: `part1` then `part2`.
    pub fn step(&mut self) -> Result<StepReport, DriverError> {
        self.part1();
        self.part2()
    }

    /// Run `steps` ticks, stopping at the first aborted step.
    pub fn integrate(&mut self, steps: usize) -> Result<IntegrationReport, DriverError> {
        let mut report = IntegrationReport::default();
        for _ in 0..steps {
            let step = self.step()?;
            report.steps += 1;
            report.skipped_particle_steps += step.skipped.len();
            report.max_iterations = report.max_iterations.max(step.max_iterations);
        }
        Ok(report)
    }
}
