//! Stumpff evaluation with 4-fold argument reduction.
//!
//! For `z > 0.5` the six orders at `z` are rebuilt from the six orders at `z / 4`:
//!
//! ```text
//! c4(z) = c3(z/4) (1 + c1(z/4)) / 8        c5(z) = (c5(z/4) + c4(z/4) + c3(z/4) c2(z/4)) / 16
//! c2(z) = 1/2 - z c4(z)                    c3(z) = 1/6 - z c5(z)
//! c0(z) = 1 - z c2(z)                      c1(z) = 1 - z c3(z)
//! ```
//!
//! Each level needs the complete set one level down, so the recursion carries all six
//! values at once and stays linear in depth.

use crate::series::c_n_series;
use crate::{SERIES_THRESHOLD, StumpffOrder};

/// Deepest argument reduction attempted before giving up.
///
/// Arguments above `0.5 * 4^30` (including `+inf`) produce a NaN set.
pub const MAX_REDUCTION_DEPTH: u32 = 30;

/// Values of `c_0 .. c_5` at a single argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StumpffSet {
    values: [f64; 6],
}

impl StumpffSet {
    /// Direct series evaluation of every order.
    pub fn series(z: f64) -> Self {
        let mut values = [0.0; 6];
        for order in StumpffOrder::ALL {
            values[order.index()] = c_n_series(order.index(), z);
        }
        Self { values }
    }

    /// Rebuild the set at `z` from the set evaluated at `z / 4`.
    pub fn recombine(z: f64, quarter: &StumpffSet) -> Self {
        let q = &quarter.values;
        let c4 = q[3] * (1.0 + q[1]) / 8.0;
        let c2 = 1.0 / 2.0 - z * c4;
        let c0 = 1.0 - z * c2;
        let c5 = (q[5] + q[4] + q[3] * q[2]) / 16.0;
        let c3 = 1.0 / 6.0 - z * c5;
        let c1 = 1.0 - z * c3;
        Self {
            values: [c0, c1, c2, c3, c4, c5],
        }
    }

    fn undefined() -> Self {
        Self {
            values: [f64::NAN; 6],
        }
    }

    pub fn get(&self, order: StumpffOrder) -> f64 {
        self.values[order.index()]
    }

    pub fn values(&self) -> [f64; 6] {
        self.values
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

/// Evaluate `c_0 .. c_5` at `z`, reducing the argument when it exceeds 0.5.
pub fn stumpff_set(z: f64) -> StumpffSet {
    set_at_depth(z, 0)
}

fn set_at_depth(z: f64, depth: u32) -> StumpffSet {
    if z > SERIES_THRESHOLD {
        if depth >= MAX_REDUCTION_DEPTH {
            return StumpffSet::undefined();
        }
        let quarter = set_at_depth(z / 4.0, depth + 1);
        StumpffSet::recombine(z, &quarter)
    } else {
        StumpffSet::series(z)
    }
}

/// Stumpff function `c_n(z)` for any real `z`.
///
/// Non-positive (and NaN) arguments go straight to the series; the series converges
/// for them without reduction.
pub fn c(order: StumpffOrder, z: f64) -> f64 {
    if z > SERIES_THRESHOLD {
        stumpff_set(z).get(order)
    } else {
        c_n_series(order.index(), z)
    }
}

/// Apply exactly one 4-fold reduction step regardless of the size of `z`.
///
/// Used to check that the identities reproduce the direct series where both apply.
pub fn reduce_once(order: StumpffOrder, z: f64) -> f64 {
    StumpffSet::recombine(z, &stumpff_set(z / 4.0)).get(order)
}
