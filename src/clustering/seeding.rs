//! Initial centroid selection for elastic K-means.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::assignment::argmin;
use super::counters::DistanceCallCounts;
use crate::core::Series;
use crate::distances::ResolvedDistance;

/// Select `k` initial centroids by distance-weighted probabilistic
/// sampling (K-means++ adapted to elastic distances).
///
/// The first centroid is chosen uniformly at random; each subsequent one
/// is drawn with probability proportional to the distance from each
/// series to its nearest already-chosen centroid. Returns the centroids,
/// the per-series distance to the nearest centroid, and the matching
/// labels.
pub(crate) fn kmeans_plus_plus(
    series: &[Series],
    k: usize,
    dist: &ResolvedDistance,
    rng: &mut StdRng,
    counters: &mut DistanceCallCounts,
) -> (Vec<Series>, Vec<f64>, Vec<usize>) {
    let n = series.len();

    let first = rng.gen_range(0..n);
    let mut chosen = Vec::with_capacity(k);
    chosen.push(first);

    let mut min_distances: Vec<f64> = series
        .iter()
        .map(|s| dist.distance(s, &series[first]))
        .collect();
    counters.init += n as u64;
    let mut labels = vec![0usize; n];

    for round in 1..k {
        let total: f64 = min_distances.iter().sum();

        let next = if total > 0.0 {
            // Walk the cumulative sum to find the sampled index.
            let threshold = rng.gen_range(0.0..total);
            let mut cumsum = 0.0;
            let mut selected = n - 1;
            for (i, &w) in min_distances.iter().enumerate() {
                cumsum += w;
                if cumsum > threshold {
                    selected = i;
                    break;
                }
            }
            selected
        } else {
            // Every remaining series coincides with an existing centroid
            // (duplicate data). Fall back to the first unchosen index.
            (0..n).find(|i| !chosen.contains(i)).unwrap_or(n - 1)
        };
        chosen.push(next);

        for (i, s) in series.iter().enumerate() {
            let d = dist.distance(s, &series[next]);
            if d < min_distances[i] {
                min_distances[i] = d;
                labels[i] = round;
            }
        }
        counters.init += n as u64;
    }

    let centres = chosen.iter().map(|&i| series[i].clone()).collect();
    (centres, min_distances, labels)
}

/// Select `k` distinct series uniformly at random as initial centroids,
/// then assign every series to its nearest one.
pub(crate) fn random_init(
    series: &[Series],
    k: usize,
    dist: &ResolvedDistance,
    rng: &mut StdRng,
    counters: &mut DistanceCallCounts,
) -> (Vec<Series>, Vec<f64>, Vec<usize>) {
    let n = series.len();

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices.truncate(k);

    let centres: Vec<Series> = indices.iter().map(|&i| series[i].clone()).collect();
    let pairwise = dist.pairwise(series, &centres);
    counters.init += (n * k) as u64;

    let mut labels = vec![0usize; n];
    let mut min_distances = vec![0.0; n];
    for (i, row) in pairwise.iter().enumerate() {
        let (j, d) = argmin(row);
        labels[i] = j;
        min_distances[i] = d;
    }

    (centres, min_distances, labels)
}
