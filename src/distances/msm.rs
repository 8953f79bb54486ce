//! Move-Split-Merge (MSM) distance for time series.
//!
//! MSM is an elastic distance built from three edit operations: a move
//! (substitute one point for another at its Euclidean cost) and
//! split/merge operations charged a constant `c`, plus a surcharge when
//! the inserted point falls outside the segment between its neighbours.
//! MSM is a metric, which the clustering engine's triangle-inequality
//! pruning relies on.

use super::path::min_cost_path;
use crate::core::Series;

/// Compute the MSM distance between two series.
///
/// # Arguments
/// * `a` - First time series
/// * `b` - Second time series
/// * `c` - Cost of split and merge operations
pub fn msm_distance(a: &Series, b: &Series, c: f64) -> f64 {
    let acc = msm_accumulated_cost(a, b, c);
    acc[a.len() - 1][b.len() - 1]
}

/// Compute the MSM alignment path between two series.
pub fn msm_alignment_path(a: &Series, b: &Series, c: f64) -> Vec<(usize, usize)> {
    let acc = msm_accumulated_cost(a, b, c);
    min_cost_path(&acc)
}

/// Split/merge cost of inserting point `x` next to `prev` against `other`.
///
/// Charges `c` when `x` lies within the hypersphere spanned by `prev` and
/// `other`, and `c` plus the gap to the nearer endpoint otherwise.
fn split_merge_cost(
    x: (&Series, usize),
    prev: (&Series, usize),
    other: (&Series, usize),
    c: f64,
) -> f64 {
    let (xs, xi) = x;
    let (ps, pi) = prev;
    let (os, oi) = other;

    let diameter = ps.point_dist(pi, os, oi);
    let dist_to_mid = (0..xs.n_channels())
        .map(|ch| {
            let mid = (ps.channel(ch)[pi] + os.channel(ch)[oi]) / 2.0;
            (xs.channel(ch)[xi] - mid).powi(2)
        })
        .sum::<f64>()
        .sqrt();

    if dist_to_mid <= diameter / 2.0 {
        c
    } else {
        c + xs.point_dist(xi, ps, pi).min(xs.point_dist(xi, os, oi))
    }
}

/// Accumulated MSM cost matrix (`n x m`).
fn msm_accumulated_cost(a: &Series, b: &Series, c: f64) -> Vec<Vec<f64>> {
    let n = a.len();
    let m = b.len();

    let mut acc = vec![vec![0.0; m]; n];
    acc[0][0] = a.point_dist(0, b, 0);

    for i in 1..n {
        acc[i][0] = acc[i - 1][0] + split_merge_cost((a, i), (a, i - 1), (b, 0), c);
    }
    for j in 1..m {
        acc[0][j] = acc[0][j - 1] + split_merge_cost((b, j), (b, j - 1), (a, 0), c);
    }

    for i in 1..n {
        for j in 1..m {
            let move_cost = acc[i - 1][j - 1] + a.point_dist(i, b, j);
            let split = acc[i - 1][j] + split_merge_cost((a, i), (a, i - 1), (b, j), c);
            let merge = acc[i][j - 1] + split_merge_cost((b, j), (b, j - 1), (a, i), c);
            acc[i][j] = move_cost.min(split).min(merge);
        }
    }

    acc
}
