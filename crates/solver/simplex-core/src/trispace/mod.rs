//! TriSpace: seamless interpolation of floaters across multi-slider regions.
//!
//! Floaters driven by the same sliders in the same sign-region (orthant) share
//! one TriSpace. The region is the unit hypercube over those sliders' absolute
//! values. It is cut into canonical Kuhn simplices, and each simplex touched
//! by a floater is refined so the floater points become vertices. Per solve, the
//! current slider values are located in a refined simplex and its barycentric
//! weights become the floater values.
//!
//! - [`geometry`] encodes canonical simplices and computes barycentric weights.
//! - [`split`] refines simplices by inserted points.

pub mod geometry;
pub mod split;

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::controller::Floater;
use crate::ids::{FloaterId, SliderId};
use crate::numeric::{points_eq, EPS};
use crate::rectify::Rectified;
use geometry::{
    barycentric, clamp_weights, is_inside, point_to_adjacent_simplices, point_to_simplex,
    simplex_to_corners, Point, SimplexCode,
};
use split::split_simplices;

/// A floater placed in its TriSpace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpaceFloater {
    pub id: FloaterId,
    /// Absolute target per axis, in axis order.
    pub point: Point,
}

#[derive(Clone, Debug)]
pub struct TriSpace {
    axes: Vec<SliderId>,
    negative: Vec<bool>,
    floaters: Vec<SpaceFloater>,
    /// Canonical simplex -> refined children. Canonical simplices that hold no
    /// floater are absent; every floater resolves to 0 inside them.
    simplex_map: HashMap<SimplexCode, Vec<Vec<Point>>>,
}

/// Shared axis set and sign-region of a group of floaters.
type SpaceKey = (Vec<SliderId>, Vec<bool>);

impl TriSpace {
    /// Group floaters by (sliders, sign-region) and triangulate each group.
    /// Group order follows the first floater of each group.
    pub fn build_spaces(floaters: &[Floater]) -> Vec<TriSpace> {
        let mut groups: IndexMap<SpaceKey, Vec<SpaceFloater>> = IndexMap::new();
        for f in floaters {
            let mut members = f.members.clone();
            members.sort_by_key(|m| m.slider);
            let axes = members.iter().map(|m| m.slider).collect();
            let negative = members.iter().map(|m| m.is_negative()).collect();
            let point = members.iter().map(|m| m.target.abs()).collect();
            groups
                .entry((axes, negative))
                .or_default()
                .push(SpaceFloater { id: f.id, point });
        }
        groups
            .into_iter()
            .map(|((axes, negative), floaters)| TriSpace::new(axes, negative, floaters))
            .collect()
    }

    pub fn new(axes: Vec<SliderId>, negative: Vec<bool>, floaters: Vec<SpaceFloater>) -> Self {
        let mut space = Self {
            axes,
            negative,
            floaters,
            simplex_map: HashMap::new(),
        };
        space.triangulate();
        space
    }

    fn triangulate(&mut self) {
        let mut touched: HashMap<SimplexCode, Vec<Point>> = HashMap::new();
        for f in &self.floaters {
            for code in point_to_adjacent_simplices(&f.point, EPS) {
                touched.entry(code).or_default().push(f.point.clone());
            }
        }
        self.simplex_map = touched
            .into_iter()
            .map(|(code, points)| {
                let base = vec![simplex_to_corners(&code)];
                let children = split_simplices(&points, base);
                (code, children)
            })
            .collect();
    }

    pub fn axes(&self) -> &[SliderId] {
        &self.axes
    }

    pub fn negative(&self) -> &[bool] {
        &self.negative
    }

    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    pub fn floaters(&self) -> &[SpaceFloater] {
        &self.floaters
    }

    /// Refined children of a canonical simplex, if any floater touches it.
    pub fn refined(&self, code: &[usize]) -> Option<&[Vec<Point>]> {
        self.simplex_map.get(code).map(Vec::as_slice)
    }

    /// Current slider values projected into this space, or `None` when a
    /// slider sits in the opposite sign-region.
    pub fn query_point(&self, inputs: &Rectified) -> Option<Point> {
        self.axes
            .iter()
            .zip(&self.negative)
            .map(|(slider, &neg)| {
                let i = slider.index();
                let v = inputs.clamped[i];
                if v != 0.0 && inputs.inverses[i] != neg {
                    None
                } else {
                    Some(v.abs())
                }
            })
            .collect()
    }

    /// The refined simplex containing `q` and its clamped barycentric weights.
    pub fn locate(&self, q: &[f64]) -> Option<(&[Point], Vec<f64>)> {
        let children = self.simplex_map.get(&point_to_simplex(q))?;
        let mut best: Option<(&[Point], Vec<f64>)> = None;
        let mut best_min = f64::NEG_INFINITY;
        for child in children {
            let weights = barycentric(child, q);
            if is_inside(&weights) {
                best = Some((child.as_slice(), weights));
                break;
            }
            let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
            if min > best_min {
                best_min = min;
                best = Some((child.as_slice(), weights));
            }
        }
        let (corners, mut weights) = best?;
        clamp_weights(&mut weights);
        Some((corners, weights))
    }

    /// Resolve every floater in this space for the current input. Floaters
    /// not sitting on a corner of the containing simplex resolve to 0.
    pub fn resolve(&self, inputs: &Rectified) -> Vec<(FloaterId, f64)> {
        let mut out: Vec<(FloaterId, f64)> = self.floaters.iter().map(|f| (f.id, 0.0)).collect();
        let Some(q) = self.query_point(inputs) else {
            return out;
        };
        let Some((corners, weights)) = self.locate(&q) else {
            return out;
        };
        for (corner, w) in corners.iter().zip(weights) {
            if w == 0.0 {
                continue;
            }
            for (slot, f) in out.iter_mut().zip(&self.floaters) {
                if points_eq(corner, &f.point) {
                    slot.1 += w;
                }
            }
        }
        out
    }
}
