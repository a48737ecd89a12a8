//! Scenario models and loaders for kepler_drift simulations.
//!
//! A scenario lists the particles (the first entry is the central mass), the global
//! timestep, and the integrator options. TOML and YAML are both accepted:
//!
//! ```yaml
//! name: two-planets
//! dt: 0.01
//! particles:
//!   - { position: [0, 0, 0], velocity: [0, 0, 0], mass: 1.0 }
//!   - { position: [1, 0, 0], velocity: [0, 1, 0], mass: 1.0e-6 }
//! integrator:
//!   solver: newton
//!   on_failure: skip
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Top-level scenario description.
#[derive(Debug, Deserialize, Clone)]
pub struct ScenarioConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub dt: f64,
    #[serde(default)]
    pub t0: f64,
    pub particles: Vec<ParticleConfig>,
    #[serde(default)]
    pub integrator: IntegratorConfig,
}

/// Initial state of one particle.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ParticleConfig {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub mass: f64,
}

/// Update rule for the universal anomaly iteration.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    #[default]
    Newton,
    Householder,
}

/// What the driver does when a particle fails to propagate.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    #[default]
    Abort,
    Skip,
}

/// Integrator options. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct IntegratorConfig {
    pub solver: SolverKind,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub on_failure: FailureMode,
    /// Accepted for compatibility with other integrators; no effect on the Kepler drift.
    pub force_is_velocity_dependent: bool,
    /// Accepted for compatibility with other integrators; no effect on the Kepler drift.
    pub epsilon: f64,
    /// Accepted for compatibility with other integrators; no effect on the Kepler drift.
    pub min_dt: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            solver: SolverKind::Newton,
            max_iterations: 100,
            tolerance: 1e-15,
            on_failure: FailureMode::Abort,
            force_is_velocity_dependent: true,
            epsilon: 0.0,
            min_dt: 0.0,
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid scenario '{scenario}': {reason}")]
    Invalid { scenario: String, reason: String },
}

impl ScenarioConfig {
    /// Reject scenarios the driver cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            scenario: self.name.clone(),
            reason,
        };

        let Some(central) = self.particles.first() else {
            return Err(invalid("at least the central mass is required".into()));
        };
        if !(central.mass.is_finite() && central.mass > 0.0) {
            return Err(invalid(format!(
                "central mass must be positive (got {})",
                central.mass
            )));
        }
        if !self.dt.is_finite() || self.dt == 0.0 {
            return Err(invalid(format!(
                "dt must be finite and non-zero (got {})",
                self.dt
            )));
        }
        if !self.t0.is_finite() {
            return Err(invalid(format!("t0 must be finite (got {})", self.t0)));
        }
        for (index, particle) in self.particles.iter().enumerate() {
            let finite = particle
                .position
                .iter()
                .chain(particle.velocity.iter())
                .chain(std::iter::once(&particle.mass))
                .all(|v| v.is_finite());
            if !finite {
                return Err(invalid(format!("particle {index} has a non-finite state")));
            }
        }
        if self.integrator.max_iterations == 0 {
            return Err(invalid("max_iterations must be at least 1".into()));
        }
        if self.integrator.tolerance.is_nan() || self.integrator.tolerance <= 0.0 {
            return Err(invalid(format!(
                "tolerance must be positive (got {})",
                self.integrator.tolerance
            )));
        }
        Ok(())
    }
}

/// Load and validate a single scenario file (`.toml`, otherwise YAML).
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioConfig, ConfigError> {
    let scenario: ScenarioConfig = read_record(path.as_ref())?;
    scenario.validate()?;
    Ok(scenario)
}

/// Load every scenario in a directory (sorted by file name), or the single file at `path`.
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioConfig>, ConfigError> {
    let path = path.as_ref();
    if !path.is_dir() {
        return Ok(vec![load_scenario(path)?]);
    }

    let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map(|ext| ext == "toml" || ext == "yaml" || ext == "yml")
                .unwrap_or(false)
        })
        .collect();
    entries.sort();
    entries.iter().map(load_scenario).collect()
}

fn read_record<T>(path: &Path) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn default_name() -> String {
    "scenario".to_string()
}
