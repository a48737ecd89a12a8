//! Universal Kepler functions `G_n(beta, X) = X^n c_n(beta X²)`.

use crate::StumpffOrder;
use crate::reduction::{c, stumpff_set};

/// Single universal function `G_n(beta, X)`.
pub fn g(order: StumpffOrder, beta: f64, x: f64) -> f64 {
    x.powi(order.index() as i32) * c(order, beta * x * x)
}

/// `G_0 .. G_3` evaluated together from one Stumpff set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniversalFunctions {
    pub g0: f64,
    pub g1: f64,
    pub g2: f64,
    pub g3: f64,
}

impl UniversalFunctions {
    pub fn new(beta: f64, x: f64) -> Self {
        let set = stumpff_set(beta * x * x);
        Self {
            g0: set.get(StumpffOrder::C0),
            g1: x.powi(1) * set.get(StumpffOrder::C1),
            g2: x.powi(2) * set.get(StumpffOrder::C2),
            g3: x.powi(3) * set.get(StumpffOrder::C3),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.g0.is_finite() && self.g1.is_finite() && self.g2.is_finite() && self.g3.is_finite()
    }
}
