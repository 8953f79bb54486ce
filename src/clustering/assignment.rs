//! Assignment of series to their nearest centroid.
//!
//! Two strategies: a triangle-inequality pruned pass that skips distance
//! evaluations a bound proves redundant, and a plain Lloyd's pass that
//! computes the full pairwise matrix. Both produce identical labels and
//! distances for the same centroids; pruning is an optimization, not an
//! approximation.

use super::counters::DistanceCallCounts;
use crate::core::Series;
use crate::distances::ResolvedDistance;

/// Index and value of the minimum entry of a non-empty row. Ties go to
/// the lowest index.
pub(crate) fn argmin(row: &[f64]) -> (usize, f64) {
    let mut best = 0;
    let mut best_value = row[0];
    for (i, &v) in row.iter().enumerate().skip(1) {
        if v < best_value {
            best_value = v;
            best = i;
        }
    }
    (best, best_value)
}

/// Result of one pruned assignment pass.
pub(crate) struct AssignmentOutcome {
    /// Sum of squared distances to assigned centroids.
    pub inertia: f64,
    /// Series-to-centroid distances computed this pass, `NaN` where the
    /// evaluation was skipped. Reusable next iteration for centroids
    /// that do not move.
    pub cache: Vec<Vec<f64>>,
}

/// Assign each series to its nearest centroid, pruning with the
/// triangle inequality.
///
/// `labels` and `distances_to_centre` must describe the current
/// assignment (each series' distance to its assigned centroid); both are
/// updated in place. For each series with current nearest distance `d`,
/// a candidate centroid `j` is skipped outright when
/// `d < d(centroid_j, centroid_closest) / 2`, since the triangle
/// inequality then guarantees `j` cannot be closer. Candidates whose
/// centroid is unchanged from the previous iteration reuse the cached
/// distance when one was actually computed.
#[allow(clippy::too_many_arguments)]
pub(crate) fn assign(
    series: &[Series],
    centres: &[Series],
    labels: &mut [usize],
    distances_to_centre: &mut [f64],
    dist: &ResolvedDistance,
    is_first_iteration: bool,
    prev_centres: Option<&[Series]>,
    prev_cache: Option<&[Vec<f64>]>,
    counters: &mut DistanceCallCounts,
) -> AssignmentOutcome {
    let n = series.len();
    let k = centres.len();

    let between = dist.pairwise_self(centres);
    counters.assignment += (k * (k - 1) / 2) as u64;

    let centres_same: Vec<bool> = (0..k)
        .map(|j| {
            !is_first_iteration
                && prev_centres.map_or(false, |prev| prev[j] == centres[j])
        })
        .collect();

    let mut cache = vec![vec![f64::NAN; k]; n];

    for i in 0..n {
        let mut min_dist = distances_to_centre[i];
        let mut closest = labels[i];

        for j in 0..k {
            if !is_first_iteration && j == closest {
                continue;
            }

            let bound = between[j][closest] / 2.0;
            if min_dist < bound {
                continue;
            }

            let cached = if centres_same[j] {
                prev_cache.and_then(|prev| {
                    let d = prev[i][j];
                    d.is_finite().then_some(d)
                })
            } else {
                None
            };
            let d = match cached {
                Some(d) => d,
                None => {
                    counters.assignment += 1;
                    dist.distance(&series[i], &centres[j])
                }
            };
            cache[i][j] = d;

            if d < min_dist {
                min_dist = d;
                closest = j;
            }
        }

        labels[i] = closest;
        distances_to_centre[i] = min_dist;
    }

    let inertia = distances_to_centre.iter().map(|d| d * d).sum();
    AssignmentOutcome { inertia, cache }
}

/// Plain Lloyd's assignment: full pairwise matrix, unconditional.
///
/// Returns the inertia; `labels` and `distances_to_centre` are updated
/// in place.
pub(crate) fn assign_lloyds(
    series: &[Series],
    centres: &[Series],
    labels: &mut [usize],
    distances_to_centre: &mut [f64],
    dist: &ResolvedDistance,
    counters: &mut DistanceCallCounts,
) -> f64 {
    let pairwise = dist.pairwise(series, centres);
    counters.assignment += (series.len() * centres.len()) as u64;

    for (i, row) in pairwise.iter().enumerate() {
        let (j, d) = argmin(row);
        labels[i] = j;
        distances_to_centre[i] = d;
    }

    distances_to_centre.iter().map(|d| d * d).sum()
}
