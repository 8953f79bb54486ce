//! Time Warp Edit (TWE) distance for time series.
//!
//! TWE combines warping with edit operations: deletions in either series
//! pay the local step cost plus a constant penalty `lambda`, and matches
//! pay the aligned pointwise costs plus a stiffness term `nu` scaled by
//! the index gap. Both series are implicitly prefixed with a zero point,
//! following the standard formulation.

use super::path::min_cost_path;
use crate::core::Series;

/// Compute the TWE distance between two series.
///
/// # Arguments
/// * `a` - First time series
/// * `b` - Second time series
/// * `nu` - Stiffness penalty on index gaps (>= 0)
/// * `lambda` - Constant penalty for delete operations (>= 0)
pub fn twe_distance(a: &Series, b: &Series, nu: f64, lambda: f64) -> f64 {
    let acc = twe_accumulated_cost(a, b, nu, lambda);
    acc[a.len()][b.len()]
}

/// Compute the TWE alignment path between two series.
pub fn twe_alignment_path(a: &Series, b: &Series, nu: f64, lambda: f64) -> Vec<(usize, usize)> {
    let acc = twe_accumulated_cost(a, b, nu, lambda);

    // Drop the zero-padding row and column before backtracking so the
    // path indexes the original timepoints.
    let trimmed: Vec<Vec<f64>> = acc[1..].iter().map(|row| row[1..].to_vec()).collect();
    min_cost_path(&trimmed)
}

/// Prefix every channel with a zero point.
fn zero_padded(s: &Series) -> Series {
    let values = s
        .values()
        .iter()
        .map(|channel| {
            let mut padded = Vec::with_capacity(channel.len() + 1);
            padded.push(0.0);
            padded.extend_from_slice(channel);
            padded
        })
        .collect();
    Series::multivariate(values).expect("padding a valid series cannot fail")
}

/// Accumulated TWE cost matrix over the padded series (`(n+1) x (m+1)`).
fn twe_accumulated_cost(a: &Series, b: &Series, nu: f64, lambda: f64) -> Vec<Vec<f64>> {
    let pa = zero_padded(a);
    let pb = zero_padded(b);
    let n = a.len();
    let m = b.len();

    let mut acc = vec![vec![f64::INFINITY; m + 1]; n + 1];
    acc[0][0] = 0.0;

    for i in 1..=n {
        for j in 1..=m {
            let delete_a = acc[i - 1][j] + pa.point_dist(i - 1, &pa, i) + nu + lambda;
            let delete_b = acc[i][j - 1] + pb.point_dist(j - 1, &pb, j) + nu + lambda;
            let matching = acc[i - 1][j - 1]
                + pa.point_dist(i, &pb, j)
                + pa.point_dist(i - 1, &pb, j - 1)
                + 2.0 * nu * i.abs_diff(j) as f64;
            acc[i][j] = delete_a.min(delete_b).min(matching);
        }
    }

    acc
}
