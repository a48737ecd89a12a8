//! Particle state, constants, and vector primitives shared by the kepler_drift workspace.

/// Numerical constants used by the propagator and its callers.
pub mod constants {
    /// Full turn in radians.
    pub const TWO_PI: f64 = 2.0 * std::f64::consts::PI;
    /// Index of the particle acting as the fixed central mass.
    pub const CENTRAL_INDEX: usize = 0;
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a Cartesian 3-vector (position or velocity depending on context).
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Squared Euclidean norm.
    #[inline]
    pub fn norm_squared(v: &Vector3) -> f64 {
        dot(v, v)
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Linear combination `a * u + b * v`, evaluated per component.
    #[inline]
    pub fn combine(a: f64, u: &Vector3, b: f64, v: &Vector3) -> Vector3 {
        [a * u[0] + b * v[0], a * u[1] + b * v[1], a * u[2] + b * v[2]]
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(v: &Vector3) -> bool {
        v.iter().all(|c| c.is_finite())
    }
}

/// Point-mass particle state.
pub mod particle {
    use serde::{Deserialize, Serialize};

    use super::vector::{self, Vector3};

    /// Position, velocity and mass of one body.
    ///
    /// Positions and velocities of orbiting particles are interpreted relative to
    /// the central mass (particle 0) when handed to the Kepler propagator.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Particle {
        pub position: Vector3,
        pub velocity: Vector3,
        pub mass: f64,
    }

    impl Particle {
        pub fn new(position: Vector3, velocity: Vector3, mass: f64) -> Self {
            Self {
                position,
                velocity,
                mass,
            }
        }

        /// A massive body at the origin with zero velocity.
        pub fn central(mass: f64) -> Self {
            Self::new([0.0; 3], [0.0; 3], mass)
        }

        /// A massless test particle.
        pub fn test_particle(position: Vector3, velocity: Vector3) -> Self {
            Self::new(position, velocity, 0.0)
        }

        /// Distance from the origin.
        pub fn radius(&self) -> f64 {
            vector::norm(&self.position)
        }

        /// Squared speed.
        pub fn speed_squared(&self) -> f64 {
            vector::norm_squared(&self.velocity)
        }

        /// Radial velocity projection `r · v`.
        pub fn radial_projection(&self) -> f64 {
            vector::dot(&self.position, &self.velocity)
        }

        /// Specific angular momentum `r × v`.
        pub fn angular_momentum(&self) -> Vector3 {
            vector::cross(&self.position, &self.velocity)
        }

        pub fn is_finite(&self) -> bool {
            vector::is_finite(&self.position) && vector::is_finite(&self.velocity)
        }
    }
}

pub use particle::Particle;
pub use vector::Vector3;

#[cfg(test)]
mod tests {
    use super::particle::Particle;
    use super::vector::{combine, cross, norm};
    use approx::assert_relative_eq;

    #[test]
    fn cross_product_follows_right_hand_rule() {
        assert_eq!(cross(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(cross(&[0.0, 1.0, 0.0], &[1.0, 0.0, 0.0]), [0.0, 0.0, -1.0]);
    }

    #[test]
    fn combine_matches_componentwise_sum() {
        let out = combine(2.0, &[1.0, 2.0, 3.0], -1.0, &[0.5, 0.5, 0.5]);
        assert_eq!(out, [1.5, 3.5, 5.5]);
    }

    #[test]
    fn particle_scalars() {
        let p = Particle::test_particle([3.0, 4.0, 0.0], [0.0, 2.0, 0.0]);
        assert_relative_eq!(p.radius(), 5.0);
        assert_relative_eq!(p.speed_squared(), 4.0);
        assert_relative_eq!(p.radial_projection(), 8.0);
        assert_relative_eq!(norm(&p.angular_momentum()), 6.0);
        assert!(p.is_finite());
        assert!(!Particle::test_particle([f64::NAN, 0.0, 0.0], [0.0; 3]).is_finite());
    }
}
