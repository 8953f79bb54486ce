//! Scaling and normalization transforms for time series.

use crate::core::Series;

/// Z-normalize a series to zero mean and unit variance, per channel.
///
/// Channels with (near) zero variance are centred only, so constant
/// series stay constant instead of blowing up.
pub fn z_normalize(series: &Series) -> Series {
    let values = series
        .values()
        .iter()
        .map(|channel| {
            let n = channel.len() as f64;
            let mean = channel.iter().sum::<f64>() / n;

            let variance = if channel.len() > 1 {
                channel.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)
            } else {
                0.0
            };
            let std = variance.sqrt();

            let scale = if std < 1e-10 { 1.0 } else { std };
            channel.iter().map(|&x| (x - mean) / scale).collect()
        })
        .collect();

    Series::multivariate(values).expect("normalizing a valid series cannot fail")
}

/// Z-normalize every series of a collection independently.
pub fn z_normalize_batch(series: &[Series]) -> Vec<Series> {
    series.iter().map(z_normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ==================== z_normalize ====================

    #[test]
    fn zero_mean_unit_variance() {
        let series = Series::univariate(vec![2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
        let scaled = z_normalize(&series);

        let channel = scaled.channel(0);
        let n = channel.len() as f64;
        let mean: f64 = channel.iter().sum::<f64>() / n;
        let variance: f64 = channel.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);

        assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
        assert_relative_eq!(variance, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn constant_series_is_centred_not_scaled() {
        let series = Series::univariate(vec![5.0, 5.0, 5.0]).unwrap();
        let scaled = z_normalize(&series);

        assert!(scaled.channel(0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn channels_normalized_independently() {
        let series =
            Series::multivariate(vec![vec![0.0, 10.0], vec![100.0, 300.0]]).unwrap();
        let scaled = z_normalize(&series);

        // Both channels end up on the same scale.
        assert_relative_eq!(
            scaled.channel(0)[1],
            scaled.channel(1)[1],
            epsilon = 1e-12
        );
    }

    // ==================== z_normalize_batch ====================

    #[test]
    fn batch_maps_each_series() {
        let series = vec![
            Series::univariate(vec![1.0, 2.0, 3.0]).unwrap(),
            Series::univariate(vec![10.0, 20.0, 30.0]).unwrap(),
        ];
        let scaled = z_normalize_batch(&series);

        assert_eq!(scaled.len(), 2);
        // After normalization the two series coincide.
        assert_eq!(scaled[0], scaled[1]);
    }
}
