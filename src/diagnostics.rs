//! Two-body invariants used to monitor the drift.

use drift_core::Particle;
use drift_core::vector::{self, Vector3};

use crate::simulation::Simulation;

/// Specific energy `v²/2 - M/r` of a particle relative to the central mass.
pub fn specific_energy(particle: &Particle, central_mass: f64) -> f64 {
    0.5 * particle.speed_squared() - central_mass / particle.radius()
}

/// Invariants of one orbiting particle at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitInvariants {
    pub index: usize,
    pub energy: f64,
    pub angular_momentum: Vector3,
}

impl OrbitInvariants {
    pub fn of(index: usize, particle: &Particle, central_mass: f64) -> Self {
        Self {
            index,
            energy: specific_energy(particle, central_mass),
            angular_momentum: particle.angular_momentum(),
        }
    }
}

/// Invariants of every orbiting particle in the simulation.
pub fn invariants(simulation: &Simulation) -> Vec<OrbitInvariants> {
    let central_mass = simulation.central_mass();
    simulation
        .particles()
        .iter()
        .enumerate()
        .skip(1)
        .map(|(index, particle)| OrbitInvariants::of(index, particle, central_mass))
        .collect()
}

/// Relative change of the invariants of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleDrift {
    pub index: usize,
    pub energy_initial: f64,
    pub energy_final: f64,
    pub energy: f64,
    pub angular_momentum: f64,
}

/// Compare two snapshots taken with [`invariants`] on the same simulation.
pub fn conservation_drift(
    before: &[OrbitInvariants],
    after: &[OrbitInvariants],
) -> Vec<ParticleDrift> {
    before
        .iter()
        .zip(after)
        .map(|(a, b)| ParticleDrift {
            index: a.index,
            energy_initial: a.energy,
            energy_final: b.energy,
            energy: relative_change(a.energy, b.energy),
            angular_momentum: relative_change(
                vector::norm(&a.angular_momentum),
                vector::norm(&b.angular_momentum),
            ),
        })
        .collect()
}

fn relative_change(initial: f64, current: f64) -> f64 {
    let delta = (current - initial).abs();
    if initial == 0.0 {
        delta
    } else {
        delta / initial.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_orbit_invariants() {
        let p = Particle::test_particle([2.0, 0.0, 0.0], [0.0, 0.5, 0.0]);
        let inv = OrbitInvariants::of(1, &p, 0.5);
        assert_eq!(inv.energy, 0.125 - 0.25);
        assert_eq!(inv.angular_momentum, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn drift_is_relative_to_initial_value() {
        let a = OrbitInvariants {
            index: 1,
            energy: -0.5,
            angular_momentum: [0.0, 0.0, 1.0],
        };
        let b = OrbitInvariants {
            index: 1,
            energy: -0.4,
            angular_momentum: [0.0, 0.0, 1.0],
        };
        let drift = conservation_drift(&[a], &[b]);
        assert_eq!(drift.len(), 1);
        assert!((drift[0].energy - 0.2).abs() < 1e-15);
        assert_eq!(drift[0].angular_momentum, 0.0);
        assert_eq!(relative_change(0.0, 1e-3), 1e-3);
    }
}
