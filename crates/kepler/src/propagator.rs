//! Gauss f and g propagation of one particle over one timestep.

use drift_core::Particle;
use drift_core::vector;
use drift_stumpff::UniversalFunctions;

use crate::KeplerError;
use crate::scalars::OrbitalScalars;
use crate::solver::{SolverSettings, solve_universal_anomaly};

/// Lagrange coefficients mapping the pre-step state onto the post-step state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussCoefficients {
    pub f: f64,
    pub g: f64,
    pub fd: f64,
    pub gd: f64,
}

impl GaussCoefficients {
    /// `f gd - fd g`, identically one for an exact two-body map.
    pub fn wronskian(&self) -> f64 {
        self.f * self.gd - self.fd * self.g
    }
}

/// Diagnostics of a successful propagation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerStep {
    pub anomaly: f64,
    pub iterations: usize,
    /// Radial distance at the end of the step.
    pub radius: f64,
    pub coefficients: GaussCoefficients,
}

/// Advance `particle` by `dt` on its two-body orbit around `central_mass`.
///
/// The state is interpreted relative to the central mass. Returns the new state and the
/// step diagnostics; the input is not touched.
pub fn propagate(
    particle: &Particle,
    central_mass: f64,
    dt: f64,
    settings: &SolverSettings,
) -> Result<(Particle, KeplerStep), KeplerError> {
    let scalars = OrbitalScalars::from_state(particle, central_mass)?;
    let solution = solve_universal_anomaly(&scalars, dt, settings)?;

    let OrbitalScalars {
        mass,
        r0,
        beta,
        eta,
        zeta,
        ..
    } = scalars;
    let x = solution.anomaly;
    let g = UniversalFunctions::new(beta, x);

    let r = r0 + eta * g.g1 + zeta * g.g2;
    let coefficients = GaussCoefficients {
        f: 1.0 - mass * g.g2 / r0,
        g: dt - mass * g.g3,
        fd: -mass * g.g1 / (r0 * r),
        gd: 1.0 - mass * g.g2 / r,
    };
    let GaussCoefficients { f, g, fd, gd } = coefficients;

    // Both updates read the pre-step position.
    let position = vector::combine(f, &particle.position, g, &particle.velocity);
    let velocity = vector::combine(fd, &particle.position, gd, &particle.velocity);

    let next = Particle {
        position,
        velocity,
        mass: particle.mass,
    };
    if !next.is_finite() {
        return Err(KeplerError::NonFiniteState("propagated particle"));
    }

    Ok((
        next,
        KeplerStep {
            anomaly: x,
            iterations: solution.iterations,
            radius: r,
            coefficients,
        },
    ))
}

/// In-place variant of [`propagate`]; the particle is only written on success.
pub fn kepler_step(
    particle: &mut Particle,
    central_mass: f64,
    dt: f64,
    settings: &SolverSettings,
) -> Result<KeplerStep, KeplerError> {
    let (next, step) = propagate(particle, central_mass, dt, settings)?;
    *particle = next;
    Ok(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::SolverMethod;
    use approx::assert_relative_eq;

    fn energy(p: &Particle, mass: f64) -> f64 {
        0.5 * p.speed_squared() - mass / p.radius()
    }

    #[test]
    fn small_step_on_unit_circle_is_a_rotation() {
        let mut p = Particle::test_particle([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let step = kepler_step(&mut p, 1.0, 0.01, &SolverSettings::default()).unwrap();

        assert!((p.position[0] - 0.99995).abs() < 1e-6);
        assert!((p.position[1] - 0.0099998).abs() < 1e-7);
        assert_eq!(p.position[2], 0.0);
        assert!((p.velocity[0] + 0.0099998).abs() < 1e-7);
        assert!((p.velocity[1] - 0.99995).abs() < 1e-6);
        assert_eq!(p.velocity[2], 0.0);

        assert_relative_eq!(p.position[0], f64::cos(0.01), max_relative = 1e-14);
        assert_relative_eq!(p.position[1], f64::sin(0.01), max_relative = 1e-14);
        assert_relative_eq!(step.radius, 1.0, max_relative = 1e-14);
    }

    #[test]
    fn velocity_update_uses_pre_step_position() {
        let start = Particle::test_particle([1.0, 0.2, -0.1], [-0.2, 1.05, 0.3]);
        let (next, step) = propagate(&start, 1.0, 0.4, &SolverSettings::default()).unwrap();
        let GaussCoefficients { f, g, fd, gd } = step.coefficients;
        for k in 0..3 {
            let expected_r = f * start.position[k] + g * start.velocity[k];
            let expected_v = fd * start.position[k] + gd * start.velocity[k];
            assert_eq!(next.position[k], expected_r);
            assert_eq!(next.velocity[k], expected_v);
        }
        assert!((step.coefficients.wronskian() - 1.0).abs() < 1e-13);
    }

    #[test]
    fn zero_timestep_is_identity() {
        let start = Particle::new([0.3, -1.1, 0.2], [0.7, 0.1, -0.2], 1e-3);
        let (next, step) = propagate(&start, 1.0, 0.0, &SolverSettings::default()).unwrap();
        assert_eq!(next, start);
        assert_eq!(step.anomaly, 0.0);
    }

    #[test]
    fn forward_then_backward_returns_to_start() {
        for start in [
            Particle::test_particle([1.0, 0.0, 0.0], [0.3, 1.2, 0.1]),
            Particle::test_particle([1.0, 0.5, 0.0], [0.0, 1.6, 0.0]),
            Particle::test_particle([1.0, 0.0, 0.0], [0.0, std::f64::consts::SQRT_2, 0.0]),
        ] {
            let settings = SolverSettings::default();
            let (mid, _) = propagate(&start, 1.0, 0.8, &settings).unwrap();
            let (back, _) = propagate(&mid, 1.0, -0.8, &settings).unwrap();
            for k in 0..3 {
                assert!((back.position[k] - start.position[k]).abs() < 1e-12);
                assert!((back.velocity[k] - start.velocity[k]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn unbound_orbit_conserves_energy() {
        let mut p = Particle::test_particle([1.0, 0.0, 0.0], [0.1, 1.6, 0.0]);
        let e0 = energy(&p, 1.0);
        assert!(e0 > 0.0);
        for _ in 0..50 {
            kepler_step(&mut p, 1.0, 0.05, &SolverSettings::default()).unwrap();
        }
        assert_relative_eq!(energy(&p, 1.0), e0, max_relative = 1e-12);
        assert!(p.radius() > 1.5);
    }

    #[test]
    fn householder_step_matches_newton_step() {
        let start = Particle::test_particle([0.7, 0.4, 0.0], [-0.5, 1.0, 0.2]);
        let (newton, _) = propagate(&start, 1.0, 0.9, &SolverSettings::default()).unwrap();
        let (householder, _) = propagate(
            &start,
            1.0,
            0.9,
            &SolverSettings {
                method: SolverMethod::Householder,
                ..SolverSettings::default()
            },
        )
        .unwrap();
        for k in 0..3 {
            assert!((newton.position[k] - householder.position[k]).abs() < 1e-13);
            assert!((newton.velocity[k] - householder.velocity[k]).abs() < 1e-13);
        }
    }

    #[test]
    fn failed_step_leaves_particle_untouched() {
        let mut p = Particle::test_particle([2.0, 0.0, 0.0], [-1.0, 0.0, 0.0]);
        let before = p;
        let err = kepler_step(&mut p, 1.0, 4.0, &SolverSettings::default()).unwrap_err();
        assert!(matches!(err, KeplerError::SingularDerivative { .. }));
        assert_eq!(p, before);

        let mut centred = Particle::test_particle([0.0; 3], [1.0, 0.0, 0.0]);
        assert_eq!(
            kepler_step(&mut centred, 1.0, 0.1, &SolverSettings::default()),
            Err(KeplerError::ZeroRadius)
        );
    }

    #[test]
    fn mass_is_carried_through() {
        let mut p = Particle::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], 3.5e-6);
        kepler_step(&mut p, 1.0, 0.3, &SolverSettings::default()).unwrap();
        assert_eq!(p.mass, 3.5e-6);
    }
}
