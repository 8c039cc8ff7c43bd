//! Accumulation of per-shape contributions into the solve output.

use crate::ids::ShapeId;

/// Zero-initialized weight per shape; contributions add.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Accumulator {
    weights: Vec<f64>,
}

impl Accumulator {
    pub fn new(shapes: usize) -> Self {
        Self {
            weights: vec![0.0; shapes],
        }
    }

    #[inline]
    pub fn add(&mut self, shape: ShapeId, weight: f64) {
        if let Some(slot) = self.weights.get_mut(shape.index()) {
            *slot += weight;
        }
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.weights
    }
}
