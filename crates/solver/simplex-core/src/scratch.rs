//! Per-solve scratch buffers.
//!
//! Kept on the solver so repeated solves reuse allocations. Every buffer is
//! fully overwritten at the start of a solve; nothing carries over.

use crate::rectify::Rectified;

#[derive(Debug, Default)]
pub struct Scratch {
    pub rectified: Rectified,
    /// Resolved value per floater, indexed by `FloaterId`.
    pub floater_values: Vec<f64>,
}

impl Scratch {
    pub fn new(sliders: usize, floaters: usize) -> Self {
        Self {
            rectified: Rectified::with_capacity(sliders),
            floater_values: vec![0.0; floaters],
        }
    }

    #[inline]
    pub fn begin_solve(&mut self, raw: &[f64]) {
        self.rectified.rectify(raw);
        self.floater_values.iter_mut().for_each(|v| *v = 0.0);
    }
}
