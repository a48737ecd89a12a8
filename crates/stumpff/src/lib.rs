//! Stumpff functions `c_n(z) = Σ (-z)^j / (n + 2j)!` and the universal Kepler functions
//! `G_n(beta, X) = X^n c_n(beta X²)` built on them.
//!
//! Small arguments are summed directly; arguments above 0.5 are quartered until the
//! series is well conditioned and the result is rebuilt with exact recurrence identities.

pub mod reduction;
pub mod series;
pub mod universal;

pub use reduction::{MAX_REDUCTION_DEPTH, StumpffSet, c, reduce_once, stumpff_set};
pub use series::{MAX_SERIES_ORDER, c_n_series};
pub use universal::{UniversalFunctions, g};

/// Argument at or below which the power series is used directly.
pub const SERIES_THRESHOLD: f64 = 0.5;

/// Orders of the Stumpff function used by the propagator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StumpffOrder {
    C0,
    C1,
    C2,
    C3,
    C4,
    C5,
}

impl StumpffOrder {
    pub const ALL: [StumpffOrder; 6] = [
        StumpffOrder::C0,
        StumpffOrder::C1,
        StumpffOrder::C2,
        StumpffOrder::C3,
        StumpffOrder::C4,
        StumpffOrder::C5,
    ];

    /// Numeric order `n`.
    pub fn index(self) -> usize {
        match self {
            StumpffOrder::C0 => 0,
            StumpffOrder::C1 => 1,
            StumpffOrder::C2 => 2,
            StumpffOrder::C3 => 3,
            StumpffOrder::C4 => 4,
            StumpffOrder::C5 => 5,
        }
    }

    /// Order for `n` in `0..=5`.
    pub fn from_index(n: usize) -> Option<Self> {
        Self::ALL.get(n).copied()
    }
}
