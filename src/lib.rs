//! Kepler drift integrator for particles orbiting a dominant central mass.
//!
//! Every particle except the central one (index 0) is advanced on its exact two-body
//! orbit with a universal-variable Kepler solver. The numerical pieces live in their own
//! crates and are re-exported here so front-ends only depend on this facade.

pub mod diagnostics;
pub mod scenario;
pub mod simulation;

pub use drift_config as config;
pub use drift_core::{Particle, Vector3, constants, vector};
pub use drift_export as export;
pub use drift_kepler as kepler;
pub use drift_stumpff as stumpff;
pub use simulation::{
    DriverError, FailurePolicy, IntegrationReport, IntegratorSettings, ParticleFailure,
    Simulation, StepReport,
};
