//! Progressions: curves mapping one controller value onto weighted shapes.
//!
//! Model:
//! - A progression holds `(shape, position)` pairs sorted by position.
//! - A pair without a shape stands for the rest pose and never reaches the output.
//! - Linear mode blends the two bracketing pairs; spline mode runs a uniform
//!   Catmull-Rom basis over the four nearest pairs, repeating the end pairs
//!   past either boundary.

use serde::{Deserialize, Serialize};

use crate::error::ParseErrorKind;
use crate::ids::ShapeId;
use crate::interp::{catmull_rom_weights, find_segment, linear_weights, Interp, Segment};
use crate::numeric::approx_eq;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    name: String,
    shapes: Vec<Option<ShapeId>>,
    positions: Vec<f64>,
    interp: Interp,
}

impl Progression {
    /// Sort `pairs` by position (stable) and reject duplicate positions.
    pub fn new(
        name: impl Into<String>,
        mut pairs: Vec<(Option<ShapeId>, f64)>,
        interp: Interp,
    ) -> Result<Self, ParseErrorKind> {
        let name = name.into();
        pairs.sort_by(|a, b| a.1.total_cmp(&b.1));
        for w in pairs.windows(2) {
            if approx_eq(w[0].1, w[1].1) {
                return Err(ParseErrorKind::DuplicatePosition {
                    name,
                    position: w[1].1,
                });
            }
        }
        let (shapes, positions) = pairs.into_iter().unzip();
        Ok(Self {
            name,
            shapes,
            positions,
            interp,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interp(&self) -> Interp {
        self.interp
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sorted `(shape, position)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (Option<ShapeId>, f64)> + '_ {
        self.shapes.iter().copied().zip(self.positions.iter().copied())
    }

    /// Shapes of every pair, including rest entries.
    pub fn shape_ids(&self) -> &[Option<ShapeId>] {
        &self.shapes
    }

    /// Weighted shapes for control value `t`, each weight scaled by `mul`.
    /// Rest entries are skipped, so the weights sum to `mul` only when the
    /// curve has no rest pair in play.
    pub fn get_output(&self, t: f64, mul: f64) -> Vec<(ShapeId, f64)> {
        let mut out = Vec::with_capacity(4);
        self.for_each_weight(t, mul, |shape, w| {
            if let Some(shape) = shape {
                out.push((shape, w));
            }
        });
        out
    }

    /// Visit the per-pair weights for `t` without allocating. Rest entries are
    /// included (as `None`); duplicated spline end pairs are merged first.
    pub fn for_each_weight<F>(&self, t: f64, mul: f64, mut f: F)
    where
        F: FnMut(Option<ShapeId>, f64),
    {
        match self.positions.len() {
            0 => {}
            1 => f(self.shapes[0], mul),
            _ => match self.interp {
                Interp::Linear => self.linear(t, mul, &mut f),
                Interp::Spline => self.spline(t, mul, &mut f),
            },
        }
    }

    fn linear<F: FnMut(Option<ShapeId>, f64)>(&self, t: f64, mul: f64, f: &mut F) {
        match find_segment(&self.positions, t) {
            Segment::At(i) => f(self.shapes[i], mul),
            Segment::Between(i, x) => {
                let [w0, w1] = linear_weights(x);
                f(self.shapes[i], w0 * mul);
                f(self.shapes[i + 1], w1 * mul);
            }
        }
    }

    fn spline<F: FnMut(Option<ShapeId>, f64)>(&self, t: f64, mul: f64, f: &mut F) {
        let (i, x) = match find_segment(&self.positions, t) {
            Segment::At(i) => return f(self.shapes[i], mul),
            Segment::Between(i, x) => (i, x),
        };
        let last = self.positions.len() - 1;
        let idx = [i.saturating_sub(1), i, i + 1, (i + 2).min(last)];
        let basis = catmull_rom_weights(x);

        // Indices are non-decreasing, so duplicates are always adjacent.
        let mut k = 0;
        while k < 4 {
            let mut w = basis[k];
            while k + 1 < 4 && idx[k + 1] == idx[k] {
                k += 1;
                w += basis[k];
            }
            f(self.shapes[idx[k]], w * mul);
            k += 1;
        }
    }
}
