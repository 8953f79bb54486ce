//! Data transformations for time series.
//!
//! Provides z-normalization, the standard preprocessing before elastic
//! distance comparison.
//!
//! # Example
//!
//! ```
//! use anofox_cluster::core::Series;
//! use anofox_cluster::transform::z_normalize;
//!
//! let series = Series::univariate(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! let scaled = z_normalize(&series);
//!
//! let mean: f64 = scaled.channel(0).iter().sum::<f64>() / 5.0;
//! assert!(mean.abs() < 1e-12);
//! ```

mod scale;

pub use scale::{z_normalize, z_normalize_batch};
