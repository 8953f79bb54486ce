//! Dynamic Time Warping (DTW) distance for time series.
//!
//! DTW is a distance measure that allows for elastic alignment between
//! time series. Pointwise costs are squared Euclidean across channels,
//! so univariate and multivariate series share one kernel.

use super::path::min_cost_path;
use crate::core::Series;

/// Compute the DTW distance between two series.
///
/// # Arguments
/// * `a` - First time series
/// * `b` - Second time series
/// * `window` - Optional Sakoe-Chiba band constraint limiting warping to
///   within `window` positions of the diagonal
///
/// # Returns
/// DTW distance (lower is more similar)
pub fn dtw_distance(a: &Series, b: &Series, window: Option<usize>) -> f64 {
    let acc = dtw_accumulated_cost(a, b, window);
    acc[a.len() - 1][b.len() - 1]
}

/// Compute the DTW alignment path between two series.
///
/// Returns pairs of indices `(i, j)` showing how timepoints of `a` are
/// aligned to timepoints of `b`.
pub fn dtw_alignment_path(a: &Series, b: &Series, window: Option<usize>) -> Vec<(usize, usize)> {
    let acc = dtw_accumulated_cost(a, b, window);
    min_cost_path(&acc)
}

/// Accumulated DTW cost matrix (`n x m`).
fn dtw_accumulated_cost(a: &Series, b: &Series, window: Option<usize>) -> Vec<Vec<f64>> {
    let n = a.len();
    let m = b.len();

    // Ensure the band is at least |n - m| so the corner stays reachable.
    let window = window.map(|w| w.max(n.abs_diff(m)));
    let in_band = |i: usize, j: usize| match window {
        Some(w) => i.abs_diff(j) <= w,
        None => true,
    };

    let mut acc = vec![vec![f64::INFINITY; m]; n];
    acc[0][0] = a.point_sq_dist(0, b, 0);

    for i in 1..n {
        if in_band(i, 0) {
            acc[i][0] = acc[i - 1][0] + a.point_sq_dist(i, b, 0);
        }
    }
    for j in 1..m {
        if in_band(0, j) {
            acc[0][j] = acc[0][j - 1] + a.point_sq_dist(0, b, j);
        }
    }

    for i in 1..n {
        let j_start = 1.max(match window {
            Some(w) => i.saturating_sub(w),
            None => 1,
        });
        let j_end = match window {
            Some(w) => m.min(i + w + 1),
            None => m,
        };

        for j in j_start..j_end {
            let cost = a.point_sq_dist(i, b, j);
            acc[i][j] = cost + acc[i - 1][j].min(acc[i][j - 1]).min(acc[i - 1][j - 1]);
        }
    }

    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uni(values: &[f64]) -> Series {
        Series::univariate(values.to_vec()).unwrap()
    }

    // ==================== dtw_distance ====================

    #[test]
    fn dtw_identical_series() {
        let a = uni(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = uni(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_relative_eq!(dtw_distance(&a, &b, None), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn dtw_shifted_series() {
        // DTW should handle shifted series better than lockstep comparison.
        let a = uni(&[0.0, 0.0, 1.0, 2.0, 1.0, 0.0]);
        let b = uni(&[0.0, 1.0, 2.0, 1.0, 0.0, 0.0]);

        let dtw_dist = dtw_distance(&a, &b, None);
        let lockstep: f64 = (0..6).map(|i| a.point_sq_dist(i, &b, i)).sum();

        assert!(dtw_dist <= lockstep);
    }

    #[test]
    fn dtw_different_lengths() {
        let a = uni(&[1.0, 2.0, 3.0]);
        let b = uni(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        let dist = dtw_distance(&a, &b, None);
        assert!(!dist.is_nan());
        assert!(dist > 0.0);
    }

    #[test]
    fn dtw_single_element() {
        let a = uni(&[5.0]);
        let b = uni(&[3.0]);
        assert_relative_eq!(dtw_distance(&a, &b, None), 4.0, epsilon = 1e-10);
    }

    #[test]
    fn dtw_multivariate() {
        let a = Series::multivariate(vec![vec![0.0, 0.0], vec![0.0, 0.0]]).unwrap();
        let b = Series::multivariate(vec![vec![3.0, 3.0], vec![4.0, 4.0]]).unwrap();

        // Every aligned pair costs 3^2 + 4^2 = 25; the diagonal has 2 pairs.
        assert_relative_eq!(dtw_distance(&a, &b, None), 50.0, epsilon = 1e-10);
    }

    // ==================== windowed ====================

    #[test]
    fn dtw_windowed_identical() {
        let a = uni(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = uni(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_relative_eq!(dtw_distance(&a, &b, Some(2)), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn dtw_windowed_vs_full() {
        let a = uni(&[1.0, 3.0, 2.0, 4.0, 5.0]);
        let b = uni(&[2.0, 1.0, 4.0, 3.0, 5.0]);

        let full = dtw_distance(&a, &b, None);
        let windowed = dtw_distance(&a, &b, Some(1));

        // Windowed is more constrained, so never smaller.
        assert!(windowed >= full - 1e-10);
    }

    #[test]
    fn dtw_window_widened_for_length_gap() {
        let a = uni(&[1.0, 2.0]);
        let b = uni(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        // A window of 0 must still reach the far corner.
        let dist = dtw_distance(&a, &b, Some(0));
        assert!(dist.is_finite());
    }

    // ==================== alignment path ====================

    #[test]
    fn path_identical_is_diagonal() {
        let a = uni(&[1.0, 2.0, 3.0]);
        let b = uni(&[1.0, 2.0, 3.0]);

        assert_eq!(
            dtw_alignment_path(&a, &b, None),
            vec![(0, 0), (1, 1), (2, 2)]
        );
    }

    #[test]
    fn path_spans_both_series() {
        let a = uni(&[1.0, 2.0, 3.0]);
        let b = uni(&[1.0, 2.0, 2.5, 3.0]);

        let path = dtw_alignment_path(&a, &b, None);
        assert_eq!(path[0], (0, 0));
        assert_eq!(path[path.len() - 1], (2, 3));
    }
}
