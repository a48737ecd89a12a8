//! Per-step orbital scalars derived from a particle state.

use drift_core::Particle;

use crate::KeplerError;

/// Scalars fixed for the duration of one propagation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalScalars {
    /// Central mass (gravitational parameter).
    pub mass: f64,
    /// Radial distance `|r|`.
    pub r0: f64,
    /// Squared speed `|v|²`.
    pub v2: f64,
    /// Energy parameter `2M/r0 - v²`; positive for bound orbits.
    pub beta: f64,
    /// Radial velocity projection `r · v`.
    pub eta: f64,
    /// `M - beta r0`.
    pub zeta: f64,
}

impl OrbitalScalars {
    pub fn from_state(particle: &Particle, central_mass: f64) -> Result<Self, KeplerError> {
        if !particle.is_finite() {
            return Err(KeplerError::NonFiniteState("particle position or velocity"));
        }
        if !central_mass.is_finite() {
            return Err(KeplerError::NonFiniteState("central mass"));
        }

        let r0 = particle.radius();
        if r0 == 0.0 {
            return Err(KeplerError::ZeroRadius);
        }
        let v2 = particle.speed_squared();
        let beta = 2.0 * central_mass / r0 - v2;
        let eta = particle.radial_projection();
        let zeta = central_mass - beta * r0;

        Ok(Self {
            mass: central_mass,
            r0,
            v2,
            beta,
            eta,
            zeta,
        })
    }

    /// Semi-major axis `M / beta`; negative for hyperbolic orbits, infinite for parabolic.
    pub fn semi_major_axis(&self) -> f64 {
        self.mass / self.beta
    }

    pub fn is_bound(&self) -> bool {
        self.beta > 0.0
    }

    /// Orbital period `2π sqrt(a³/M)` of a bound orbit.
    pub fn period(&self) -> Option<f64> {
        if !self.is_bound() || self.mass <= 0.0 {
            return None;
        }
        let a = self.semi_major_axis();
        Some(drift_core::constants::TWO_PI * (a * a * a / self.mass).sqrt())
    }
}
