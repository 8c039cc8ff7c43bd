//! Interpolation modes and basis helpers for progressions:
//! - interval lookup over sorted positions
//! - linear two-point weights
//! - uniform Catmull-Rom four-point weights

use serde::{Deserialize, Serialize};

use crate::error::ParseErrorKind;
use crate::numeric::approx_eq;

/// How a progression blends between neighbouring pairs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interp {
    #[default]
    Linear,
    Spline,
}

impl std::str::FromStr for Interp {
    type Err = ParseErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Interp::Linear),
            "spline" => Ok(Interp::Spline),
            _ => Err(ParseErrorKind::UnknownInterp(s.to_string())),
        }
    }
}

/// Where `t` falls among sorted `positions`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Segment {
    /// `t` coincides with (or clamps to) the pair at this index.
    At(usize),
    /// `t` lies strictly inside `[positions[i], positions[i + 1]]`, at local offset `x` in (0, 1).
    Between(usize, f64),
}

/// Locate `t` among ascending `positions`. Values outside the range clamp to
/// the first or last pair. `positions` must not be empty.
pub fn find_segment(positions: &[f64], t: f64) -> Segment {
    let n = positions.len();
    debug_assert!(n > 0, "find_segment on empty positions");
    let last = n - 1;
    if n == 1 || t <= positions[0] || approx_eq(t, positions[0]) {
        return Segment::At(0);
    }
    if t >= positions[last] || approx_eq(t, positions[last]) {
        return Segment::At(last);
    }
    // partition_point gives the first position strictly greater than t
    let hi = positions.partition_point(|p| *p <= t);
    let lo = hi - 1;
    if approx_eq(t, positions[lo]) {
        return Segment::At(lo);
    }
    if approx_eq(t, positions[hi]) {
        return Segment::At(hi);
    }
    let x = (t - positions[lo]) / (positions[hi] - positions[lo]);
    Segment::Between(lo, x)
}

/// Weights of the left and right pair for linear blending.
#[inline]
pub fn linear_weights(x: f64) -> [f64; 2] {
    [1.0 - x, x]
}

/// Uniform Catmull-Rom basis for points `p0..p3` with the curve running
/// from `p1` (x = 0) to `p2` (x = 1). The four weights always sum to 1.
#[inline]
pub fn catmull_rom_weights(x: f64) -> [f64; 4] {
    let x2 = x * x;
    let x3 = x2 * x;
    [
        -0.5 * x3 + x2 - 0.5 * x,
        1.5 * x3 - 2.5 * x2 + 1.0,
        -1.5 * x3 + 2.0 * x2 + 0.5 * x,
        0.5 * x3 - 0.5 * x2,
    ]
}
