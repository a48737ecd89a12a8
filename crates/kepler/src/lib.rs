//! Two-body drift of a particle around a fixed central mass.
//!
//! The particle state is advanced with the universal-variable formulation: the universal
//! anomaly `X` is solved from Kepler's equation with a bounded Newton (or Householder)
//! iteration and the Gauss f and g functions map the old state onto the new one. The
//! same code path covers elliptic, parabolic and hyperbolic orbits.

pub mod propagator;
pub mod scalars;
pub mod solver;

pub use propagator::{GaussCoefficients, KeplerStep, kepler_step, propagate};
pub use scalars::OrbitalScalars;
pub use solver::{AnomalySolution, SolverMethod, SolverSettings, solve_universal_anomaly};

use thiserror::Error;

/// Numerical failures of a single Kepler propagation.
///
/// None of these leave the particle modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KeplerError {
    #[error("particle sits on the central mass (zero radius)")]
    ZeroRadius,
    #[error("non-finite state: {0}")]
    NonFiniteState(&'static str),
    #[error("kepler equation derivative vanished at iteration {iteration} (X = {anomaly})")]
    SingularDerivative { iteration: usize, anomaly: f64 },
    #[error("non-finite anomaly update at iteration {iteration} (X = {anomaly})")]
    NonFiniteStep { iteration: usize, anomaly: f64 },
    #[error(
        "universal anomaly did not converge after {iterations} iterations (X = {anomaly}, last dX = {last_step})"
    )]
    NotConverged {
        iterations: usize,
        anomaly: f64,
        last_step: f64,
    },
}
