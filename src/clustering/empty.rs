//! Repair of clusters that lost all members.

use log::warn;

use super::assignment::argmin;
use super::counters::DistanceCallCounts;
use crate::core::Series;
use crate::distances::ResolvedDistance;
use crate::error::{ClusterError, Result};

/// Repopulate empty clusters until every cluster index has a member.
///
/// Each repair installs the series currently farthest from its assigned
/// centroid as the centroid of the first empty cluster, then recomputes
/// the full pairwise matrix and reassigns all labels and distances.
/// Returns whether any repair happened, so the caller can discard
/// now-stale assignment caches.
///
/// # Errors
///
/// Returns [`ClusterError::EmptyCluster`] when more than `k` repairs are
/// needed; with that many rounds the input is degenerate (for example,
/// more duplicated series than distinct clusters requested).
pub(crate) fn resolve_empty_clusters(
    series: &[Series],
    centres: &mut [Series],
    distances_to_centre: &mut [f64],
    labels: &mut [usize],
    dist: &ResolvedDistance,
    counters: &mut DistanceCallCounts,
) -> Result<bool> {
    let n = series.len();
    let k = centres.len();
    let mut attempts = 0usize;

    loop {
        let mut has_member = vec![false; k];
        for &label in labels.iter() {
            has_member[label] = true;
        }
        let Some(empty_index) = has_member.iter().position(|&m| !m) else {
            return Ok(attempts > 0);
        };

        warn!("repairing empty cluster {empty_index} (attempt {})", attempts + 1);

        let farthest = argmax(distances_to_centre);
        centres[empty_index] = series[farthest].clone();

        let pairwise = dist.pairwise(series, centres);
        counters.empty_cluster += (n * k) as u64;
        for (i, row) in pairwise.iter().enumerate() {
            let (j, d) = argmin(row);
            labels[i] = j;
            distances_to_centre[i] = d;
        }

        attempts += 1;
        if attempts > k {
            return Err(ClusterError::EmptyCluster { attempts });
        }
    }
}

/// Index of the maximum entry of a non-empty slice. Ties go to the
/// lowest index.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    let mut best_value = values[0];
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > best_value {
            best_value = v;
            best = i;
        }
    }
    best
}
