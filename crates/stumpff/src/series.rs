//! Direct power-series evaluation of the Stumpff functions.

/// Highest order whose 13-term series stays inside the inverse factorial table.
pub const MAX_SERIES_ORDER: usize = 8;

/// Number of series terms summed at most.
const SERIES_TERMS: usize = 13;

/// Early-exit threshold on `|term / sum|`.
const SERIES_CUTOFF: f64 = 1e-17;

/// `1 / k!` for `k = 0..=34`.
static INV_FACTORIAL: [f64; 35] = [
    1.0 / 1.0,
    1.0 / 1.0,
    1.0 / 2.0,
    1.0 / 6.0,
    1.0 / 24.0,
    1.0 / 120.0,
    1.0 / 720.0,
    1.0 / 5040.0,
    1.0 / 40320.0,
    1.0 / 362880.0,
    1.0 / 3628800.0,
    1.0 / 39916800.0,
    1.0 / 479001600.0,
    1.0 / 6227020800.0,
    1.0 / 87178291200.0,
    1.0 / 1307674368000.0,
    1.0 / 20922789888000.0,
    1.0 / 355687428096000.0,
    1.0 / 6402373705728000.0,
    1.0 / 121645100408832000.0,
    1.0 / 2432902008176640000.0,
    1.0 / 51090942171709440000.0,
    1.0 / 1124000727777607680000.0,
    1.0 / 25852016738884976640000.0,
    1.0 / 620448401733239439360000.0,
    1.0 / 15511210043330985984000000.0,
    1.0 / 403291461126605635584000000.0,
    1.0 / 10888869450418352160768000000.0,
    1.0 / 304888344611713860501504000000.0,
    1.0 / 8841761993739701954543616000000.0,
    1.0 / 265252859812191058636308480000000.0,
    1.0 / 8222838654177922817725562880000000.0,
    1.0 / 263130836933693530167218012160000000.0,
    1.0 / 8683317618811886495518194401280000000.0,
    1.0 / 295232799039604140847618609643520000000.0,
];

/// Sum `c_n(z) = Σ_{j=0}^{12} (-z)^j / (n + 2j)!`.
///
/// The loop stops as soon as a newly added term is negligible relative to the
/// running sum. Accuracy is only guaranteed for `|z| <= 0.5`; larger positive
/// arguments should go through [`crate::c`].
///
/// # Panics
///
/// Panics when `n > MAX_SERIES_ORDER`, since `n + 2j` would leave the factorial table.
pub fn c_n_series(n: usize, z: f64) -> f64 {
    assert!(
        n <= MAX_SERIES_ORDER,
        "stumpff series order {n} exceeds supported maximum {MAX_SERIES_ORDER}"
    );

    let mut c_n = 0.0;
    for j in 0..SERIES_TERMS {
        let term = (-z).powi(j as i32) * INV_FACTORIAL[n + 2 * j];
        c_n += term;
        if (term / c_n).abs() < SERIES_CUTOFF {
            break;
        }
    }
    c_n
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn table_matches_factorials() {
        let mut factorial = 1.0_f64;
        for (k, inv) in INV_FACTORIAL.iter().enumerate() {
            if k > 0 {
                factorial *= k as f64;
            }
            assert_relative_eq!(*inv, 1.0 / factorial, max_relative = 1e-14);
        }
    }

    #[test]
    fn zero_argument_gives_leading_coefficient() {
        for n in 0..=MAX_SERIES_ORDER {
            assert_eq!(c_n_series(n, 0.0), INV_FACTORIAL[n]);
        }
    }

    #[test]
    fn matches_trigonometric_forms_for_small_arguments() {
        for &z in &[0.5, 0.25, 1e-3, -0.3, -0.5] {
            let (c0, c1) = if z >= 0.0 {
                let s = f64::sqrt(z);
                (s.cos(), if s == 0.0 { 1.0 } else { s.sin() / s })
            } else {
                let s = f64::sqrt(-z);
                (s.cosh(), s.sinh() / s)
            };
            assert_relative_eq!(c_n_series(0, z), c0, max_relative = 1e-14);
            assert_relative_eq!(c_n_series(1, z), c1, max_relative = 1e-14);
        }
    }

    #[test]
    fn highest_order_is_accepted() {
        let value = c_n_series(MAX_SERIES_ORDER, 0.5);
        assert!(value > 0.0 && value < INV_FACTORIAL[MAX_SERIES_ORDER]);
    }

    #[test]
    #[should_panic(expected = "exceeds supported maximum")]
    fn order_beyond_table_panics() {
        c_n_series(MAX_SERIES_ORDER + 1, 0.1);
    }
}
