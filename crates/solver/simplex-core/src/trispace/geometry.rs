//! Simplex geometry on the unit hypercube.
//!
//! Canonical simplices follow the Kuhn (Freudenthal) triangulation: a simplex is
//! encoded by an axis permutation `[a0, a1, ...]` and has the corners
//! `0, e_a0, e_a0 + e_a1, ..., 1`. A point belongs to the simplex whose
//! permutation sorts its coordinates in descending order.

use nalgebra::{DMatrix, DVector};

use crate::numeric::EPS;

pub type Point = Vec<f64>;

/// Axis permutation identifying one canonical simplex.
pub type SimplexCode = Vec<usize>;

/// Determinants below this are treated as a degenerate simplex.
const SINGULAR_DET: f64 = 1e-12;

/// Corners of the canonical simplex `code`, from the origin to the far corner.
pub fn simplex_to_corners(code: &[usize]) -> Vec<Point> {
    let mut corners = Vec::with_capacity(code.len() + 1);
    let mut p = vec![0.0; code.len()];
    corners.push(p.clone());
    for &axis in code {
        p[axis] = 1.0;
        corners.push(p.clone());
    }
    corners
}

/// The canonical simplex containing `pt`. Ties keep ascending axis order.
pub fn point_to_simplex(pt: &[f64]) -> SimplexCode {
    let mut axes: Vec<usize> = (0..pt.len()).collect();
    axes.sort_by(|&a, &b| pt[b].total_cmp(&pt[a]));
    axes
}

/// Every canonical simplex containing `pt`. Coordinates within `eps` of each
/// other put the point on a shared face, so each ordering of a tied group is
/// a valid simplex.
pub fn point_to_adjacent_simplices(pt: &[f64], eps: f64) -> Vec<SimplexCode> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for axis in point_to_simplex(pt) {
        match groups.last_mut() {
            Some(g) if g.last().is_some_and(|&l| (pt[l] - pt[axis]).abs() <= eps) => g.push(axis),
            _ => groups.push(vec![axis]),
        }
    }

    let mut out: Vec<SimplexCode> = vec![Vec::with_capacity(pt.len())];
    for group in &groups {
        let perms = permutations(group);
        out = out
            .into_iter()
            .flat_map(|prefix| {
                perms.iter().map(move |perm| {
                    let mut code = prefix.clone();
                    code.extend_from_slice(perm);
                    code
                })
            })
            .collect();
    }
    out
}

fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}

/// Barycentric coordinates of `p` with respect to `corners` (unclamped).
///
/// Solves `[corners; 1 .. 1] * w = [p; 1]`. A singular or non-square system
/// falls back to the SVD least-squares solution.
pub fn barycentric(corners: &[Point], p: &[f64]) -> Vec<f64> {
    let d = p.len();
    let n = corners.len();
    let a = DMatrix::from_fn(d + 1, n, |i, j| if i < d { corners[j][i] } else { 1.0 });
    let b = DVector::from_fn(d + 1, |i, _| if i < d { p[i] } else { 1.0 });

    if n == d + 1 {
        let lu = a.clone().lu();
        if lu.determinant().abs() > SINGULAR_DET {
            if let Some(w) = lu.solve(&b) {
                return w.iter().copied().collect();
            }
        }
    }

    log::trace!("degenerate simplex ({n} corners in {d}D), using least squares");
    match a.svd(true, true).solve(&b, EPS) {
        Ok(w) => w.iter().copied().collect(),
        Err(_) => vec![1.0 / n as f64; n],
    }
}

/// True when every coordinate is non-negative within [`EPS`].
#[inline]
pub fn is_inside(weights: &[f64]) -> bool {
    weights.iter().all(|w| *w >= -EPS)
}

/// Snap weights into `[0, 1]` (below EPS to 0, above 1 - EPS to 1) and
/// renormalize so they sum to 1.
pub fn clamp_weights(weights: &mut [f64]) {
    for w in weights.iter_mut() {
        if *w < EPS {
            *w = 0.0;
        } else if *w > 1.0 - EPS {
            *w = 1.0;
        }
    }
    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        weights.iter_mut().for_each(|w| *w /= sum);
    }
}
