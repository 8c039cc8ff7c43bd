//! Tolerances and float comparison helpers shared by the solver.

/// Absolute tolerance used for all weight and coordinate comparisons.
pub const EPS: f64 = 1e-6;

/// Maximum distance in units-in-the-last-place for two floats to compare equal.
pub const ULPS: u64 = 4;

/// Largest magnitude a slider value may take after normalization.
pub const MAXVAL: f64 = 1.0;

/// Map the bit pattern onto a monotonic integer line so ULP distance is a subtraction.
#[inline]
fn ordered_bits(x: f64) -> i64 {
    let bits = x.to_bits() as i64;
    if bits < 0 {
        i64::MIN - bits
    } else {
        bits
    }
}

/// Tolerant equality: within [`EPS`] absolutely or within [`ULPS`] representable steps.
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    if (a - b).abs() <= EPS {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    ordered_bits(a).abs_diff(ordered_bits(b)) <= ULPS
}

/// Component-wise tolerant equality of two points.
pub fn points_eq(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| approx_eq(*x, *y))
}
