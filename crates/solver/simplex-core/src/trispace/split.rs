//! Refinement of simplices by inserted points.

use super::geometry::{barycentric, is_inside, Point};
use crate::numeric::{points_eq, EPS};

/// Split every simplex containing one of `points` into the children obtained
/// by swapping one corner for the point. Corners whose weight is within EPS of
/// zero are not swapped, so no flat child is produced. Points that already
/// coincide with a corner leave the simplex untouched.
pub fn split_simplices(points: &[Point], mut simplices: Vec<Vec<Point>>) -> Vec<Vec<Point>> {
    for p in points {
        let mut next = Vec::with_capacity(simplices.len() + p.len());
        for simplex in simplices {
            if simplex.iter().any(|c| points_eq(c, p)) {
                next.push(simplex);
                continue;
            }
            let weights = barycentric(&simplex, p);
            if !is_inside(&weights) {
                next.push(simplex);
                continue;
            }
            for (j, w) in weights.iter().enumerate() {
                if *w > EPS {
                    let mut child = simplex.clone();
                    child[j] = p.clone();
                    next.push(child);
                }
            }
        }
        simplices = next;
    }
    simplices
}
