//! Series data structure for representing temporal data.

use crate::error::{ClusterError, Result};

/// A time series with one or more channels of equal length.
///
/// Values are stored channel-major: `values[channel][timepoint]`. Most
/// operations in this crate treat a series as immutable; the clustering
/// engine only mutates the centroid copies it owns.
///
/// # Example
///
/// ```
/// use anofox_cluster::core::Series;
///
/// let s = Series::univariate(vec![1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(s.n_channels(), 1);
/// assert_eq!(s.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    values: Vec<Vec<f64>>,
}

impl Series {
    /// Create a univariate series from a single channel of values.
    pub fn univariate(values: Vec<f64>) -> Result<Self> {
        Self::multivariate(vec![values])
    }

    /// Create a multivariate series from channel-major values.
    ///
    /// All channels must be non-empty and of equal length.
    pub fn multivariate(values: Vec<Vec<f64>>) -> Result<Self> {
        if values.is_empty() || values[0].is_empty() {
            return Err(ClusterError::EmptyData);
        }
        let len = values[0].len();
        for channel in &values[1..] {
            if channel.len() != len {
                return Err(ClusterError::DimensionMismatch {
                    expected: len,
                    got: channel.len(),
                });
            }
        }
        Ok(Self { values })
    }

    /// Number of channels (dimensions).
    pub fn n_channels(&self) -> usize {
        self.values.len()
    }

    /// Number of timepoints per channel.
    pub fn len(&self) -> usize {
        self.values[0].len()
    }

    /// Whether the series has no timepoints. Always false for a
    /// successfully constructed series.
    pub fn is_empty(&self) -> bool {
        self.values[0].is_empty()
    }

    /// Values of a single channel.
    pub fn channel(&self, c: usize) -> &[f64] {
        &self.values[c]
    }

    /// All channels, channel-major.
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [Vec<f64>] {
        &mut self.values
    }

    /// Squared Euclidean distance between timepoint `i` of `self` and
    /// timepoint `j` of `other`, across all channels.
    pub(crate) fn point_sq_dist(&self, i: usize, other: &Series, j: usize) -> f64 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a[i] - b[j]).powi(2))
            .sum()
    }

    /// Euclidean distance between timepoint `i` of `self` and timepoint
    /// `j` of `other`, across all channels.
    pub(crate) fn point_dist(&self, i: usize, other: &Series, j: usize) -> f64 {
        self.point_sq_dist(i, other, j).sqrt()
    }

    /// Element-wise arithmetic mean of a set of equal-shape series.
    pub fn mean(members: &[&Series]) -> Result<Self> {
        let first = members.first().ok_or(ClusterError::EmptyData)?;
        let n_channels = first.n_channels();
        let len = first.len();
        for m in &members[1..] {
            if m.n_channels() != n_channels {
                return Err(ClusterError::DimensionMismatch {
                    expected: n_channels,
                    got: m.n_channels(),
                });
            }
            if m.len() != len {
                return Err(ClusterError::DimensionMismatch {
                    expected: len,
                    got: m.len(),
                });
            }
        }

        let scale = members.len() as f64;
        let mut values = vec![vec![0.0; len]; n_channels];
        for m in members {
            for (c, channel) in m.values.iter().enumerate() {
                for (t, &v) in channel.iter().enumerate() {
                    values[c][t] += v;
                }
            }
        }
        for channel in &mut values {
            for v in channel.iter_mut() {
                *v /= scale;
            }
        }
        Self::multivariate(values)
    }
}
