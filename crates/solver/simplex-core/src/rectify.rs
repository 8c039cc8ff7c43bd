//! Input normalization: the single place raw slider values are read.

use crate::numeric::MAXVAL;

/// Normalized views of one raw input vector, index-aligned with the sliders.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rectified {
    /// Signed value clamped to `[-MAXVAL, MAXVAL]`.
    pub values: Vec<f64>,
    /// `max(value, 0)`: the positive-direction activation.
    pub positive: Vec<f64>,
    /// `clamp(raw, -MAXVAL, MAXVAL)`.
    pub clamped: Vec<f64>,
    /// `raw < 0`: the slider sits in its negative half.
    pub inverses: Vec<bool>,
}

impl Rectified {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            values: Vec::with_capacity(n),
            positive: Vec::with_capacity(n),
            clamped: Vec::with_capacity(n),
            inverses: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overwrite every array from `raw`, reusing the existing allocations.
    /// NaN inputs are treated as 0.
    pub fn rectify(&mut self, raw: &[f64]) {
        self.values.clear();
        self.positive.clear();
        self.clamped.clear();
        self.inverses.clear();
        for &r in raw {
            let r = if r.is_nan() { 0.0 } else { r };
            let c = r.clamp(-MAXVAL, MAXVAL);
            self.clamped.push(c);
            self.values.push(c);
            self.positive.push(c.max(0.0));
            self.inverses.push(r < 0.0);
        }
    }

    /// Activation of slider `index` in the half selected by `negative`.
    /// Zero when the slider sits in the other half.
    #[inline]
    pub fn directional(&self, index: usize, negative: bool) -> f64 {
        if self.inverses[index] != negative {
            return 0.0;
        }
        self.clamped[index].abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_and_flags() {
        let raw = [2.5, -0.25, 0.0, -7.0, 0.6];
        let mut r = Rectified::default();
        r.rectify(&raw);
        for (i, x) in raw.iter().enumerate() {
            assert_eq!(r.clamped[i], x.clamp(-1.0, 1.0));
            assert_eq!(r.values[i], r.clamped[i]);
            assert_eq!(r.positive[i], r.clamped[i].max(0.0));
            assert_eq!(r.inverses[i], *x < 0.0);
        }
    }

    #[test]
    fn reuse_does_not_leak_previous_call() {
        let mut r = Rectified::with_capacity(3);
        r.rectify(&[1.0, -1.0, 0.5]);
        r.rectify(&[0.0]);
        assert_eq!(r.len(), 1);
        assert_eq!(r.values, vec![0.0]);
        assert_eq!(r.inverses, vec![false]);
    }

    #[test]
    fn nan_is_neutral() {
        let mut r = Rectified::default();
        r.rectify(&[f64::NAN]);
        assert_eq!(r.values, vec![0.0]);
        assert!(!r.inverses[0]);
    }

    #[test]
    fn directional_picks_a_half() {
        let mut r = Rectified::default();
        r.rectify(&[-0.4, 0.7, 0.0]);
        assert_eq!(r.directional(0, true), 0.4);
        assert_eq!(r.directional(0, false), 0.0);
        assert_eq!(r.directional(1, false), 0.7);
        assert_eq!(r.directional(1, true), 0.0);
        assert_eq!(r.directional(2, false), 0.0);
        assert_eq!(r.directional(2, true), 0.0);
    }
}
