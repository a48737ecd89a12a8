//! Root finding for the universal anomaly.
//!
//! Solves `r0 X + eta G2(beta, X) + zeta G3(beta, X) - dt = 0` starting from `X = 0`.
//! The derivative of the left-hand side is `r0 + eta G1 + zeta G2`, the radius at `X`.

use drift_stumpff::UniversalFunctions;

use crate::KeplerError;
use crate::scalars::OrbitalScalars;

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Default relative step tolerance on `|dX / X|`.
pub const DEFAULT_TOLERANCE: f64 = 1e-15;

/// Relative step size, in units of machine epsilon, below which a step that no longer
/// shrinks is accepted as round-off noise around the root.
pub const STALL_ULPS: f64 = 64.0;

/// Update rule used by the anomaly iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverMethod {
    /// `dX = -s / s'`.
    #[default]
    Newton,
    /// Second-order Householder update `dX = -s s' / (s'² - s s'' / 2)`.
    Householder,
}

/// Update rule, iteration cap and relative step tolerance of the anomaly iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    pub method: SolverMethod,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            method: SolverMethod::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Converged universal anomaly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalySolution {
    pub anomaly: f64,
    pub iterations: usize,
}

/// Iterate on the universal Kepler equation for a step of length `dt`.
///
/// Converges when the update is exactly zero or `|dX| < tolerance * |X|`; the first form
/// covers `dt == 0`, where `X` stays at zero and the relative test is undefined.
///
/// Once `|X|` is a few units the residual cannot resolve `tolerance * |X|`, and Newton
/// bounces between neighbouring floats. An update that did not shrink and is within
/// [`STALL_ULPS`] epsilons of `|X|` is therefore also accepted.
pub fn solve_universal_anomaly(
    scalars: &OrbitalScalars,
    dt: f64,
    settings: &SolverSettings,
) -> Result<AnomalySolution, KeplerError> {
    let OrbitalScalars {
        r0,
        beta,
        eta,
        zeta,
        ..
    } = *scalars;

    let mut x = 0.0_f64;
    let mut last_step = f64::NAN;

    for iteration in 1..=settings.max_iterations {
        let g = UniversalFunctions::new(beta, x);
        let s = r0 * x + eta * g.g2 + zeta * g.g3 - dt;
        let sp = r0 + eta * g.g1 + zeta * g.g2;
        if sp == 0.0 || !sp.is_finite() {
            return Err(KeplerError::SingularDerivative {
                iteration,
                anomaly: x,
            });
        }

        let dx = match settings.method {
            SolverMethod::Newton => -s / sp,
            SolverMethod::Householder => {
                let spp = eta * g.g0 + zeta * g.g1;
                -(s * sp) / (sp * sp - 0.5 * s * spp)
            }
        };
        if !dx.is_finite() {
            return Err(KeplerError::NonFiniteStep {
                iteration,
                anomaly: x,
            });
        }

        x += dx;
        let stalled =
            dx.abs() >= last_step.abs() && dx.abs() <= STALL_ULPS * f64::EPSILON * x.abs();
        last_step = dx;
        if dx == 0.0 || dx.abs() < settings.tolerance * x.abs() || stalled {
            return Ok(AnomalySolution {
                anomaly: x,
                iterations: iteration,
            });
        }
    }

    Err(KeplerError::NotConverged {
        iterations: settings.max_iterations,
        anomaly: x,
        last_step,
    })
}
