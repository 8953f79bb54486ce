//! Lockstep (fixed-index) distances for same-length time series.

use crate::core::Series;

/// Euclidean distance for same-length series.
///
/// Returns infinity when shapes differ.
pub fn euclidean_distance(a: &Series, b: &Series) -> f64 {
    squared_euclidean_distance(a, b).sqrt()
}

/// Squared Euclidean distance for same-length series.
///
/// Returns infinity when shapes differ.
pub fn squared_euclidean_distance(a: &Series, b: &Series) -> f64 {
    if a.len() != b.len() || a.n_channels() != b.n_channels() {
        return f64::INFINITY;
    }

    (0..a.len()).map(|i| a.point_sq_dist(i, b, i)).sum()
}

/// Manhattan (L1) distance for same-length series.
///
/// Returns infinity when shapes differ.
pub fn manhattan_distance(a: &Series, b: &Series) -> f64 {
    if a.len() != b.len() || a.n_channels() != b.n_channels() {
        return f64::INFINITY;
    }

    a.values()
        .iter()
        .zip(b.values().iter())
        .map(|(ca, cb)| {
            ca.iter()
                .zip(cb.iter())
                .map(|(x, y)| (x - y).abs())
                .sum::<f64>()
        })
        .sum()
}

/// The lockstep alignment: every timepoint pairs with its own index.
pub(crate) fn identity_path(a: &Series, b: &Series) -> Vec<(usize, usize)> {
    let len = a.len().min(b.len());
    (0..len).map(|i| (i, i)).collect()
}
