//! Mapping from scenario files to runnable simulations.

use std::path::Path;

use drift_config::{
    ConfigError, FailureMode, IntegratorConfig, ParticleConfig, ScenarioConfig, SolverKind,
    load_scenario,
};
use drift_core::Particle;
use drift_kepler::{SolverMethod, SolverSettings};
use thiserror::Error;

use crate::simulation::{DriverError, FailurePolicy, IntegratorSettings, Simulation};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to load scenario: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build simulation: {0}")]
    Driver(#[from] DriverError),
}

/// Convert one particle entry into its runtime state.
pub fn particle_from_config(config: &ParticleConfig) -> Particle {
    Particle::new(config.position, config.velocity, config.mass)
}

impl From<&IntegratorConfig> for IntegratorSettings {
    fn from(value: &IntegratorConfig) -> Self {
        let method = match value.solver {
            SolverKind::Newton => SolverMethod::Newton,
            SolverKind::Householder => SolverMethod::Householder,
        };
        let on_failure = match value.on_failure {
            FailureMode::Abort => FailurePolicy::Abort,
            FailureMode::Skip => FailurePolicy::Skip,
        };
        IntegratorSettings {
            solver: SolverSettings {
                method,
                max_iterations: value.max_iterations,
                tolerance: value.tolerance,
            },
            on_failure,
            force_is_velocity_dependent: value.force_is_velocity_dependent,
            epsilon: value.epsilon,
            min_dt: value.min_dt,
        }
    }
}

/// Build a simulation from an already loaded scenario.
pub fn from_config(config: &ScenarioConfig) -> Result<Simulation, ScenarioError> {
    config.validate()?;
    let particles = config.particles.iter().map(particle_from_config).collect();
    Ok(Simulation::new(particles, config.dt)?
        .with_time(config.t0)
        .with_settings(IntegratorSettings::from(&config.integrator)))
}

/// Load a scenario file and build its simulation.
pub fn load_simulation<P: AsRef<Path>>(
    path: P,
) -> Result<(ScenarioConfig, Simulation), ScenarioError> {
    let config = load_scenario(path)?;
    let simulation = from_config(&config)?;
    Ok((config, simulation))
}
