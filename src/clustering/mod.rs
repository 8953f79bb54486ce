//! Time series clustering algorithms.
//!
//! Provides K-means clustering under elastic distances, with barycenter
//! averaging as the centroid update, K-means++-style seeding, and
//! triangle-inequality pruned assignment.
//!
//! # Example
//!
//! ```
//! use anofox_cluster::clustering::{ElasticKMeans, ElasticKMeansConfig};
//! use anofox_cluster::core::Series;
//! use anofox_cluster::distances::DistanceSpec;
//!
//! let series: Vec<Series> = [
//!     [1.0, 2.0, 1.0],
//!     [1.1, 2.1, 1.1],
//!     [10.0, 11.0, 10.0],
//!     [10.1, 11.1, 10.1],
//! ]
//! .iter()
//! .map(|v| Series::univariate(v.to_vec()).unwrap())
//! .collect();
//!
//! let config = ElasticKMeansConfig::default()
//!     .n_clusters(2)
//!     .distance(DistanceSpec::from_name("euclidean").unwrap())
//!     .seed(42);
//! let mut model = ElasticKMeans::new(config);
//! model.fit(&series).unwrap();
//! assert_eq!(model.cluster_centers().unwrap().len(), 2);
//! ```

mod assignment;
pub mod barycenter;
mod config;
mod counters;
mod empty;
mod kmeans;
mod seeding;

pub use barycenter::{elastic_barycenter_average, BarycenterConfig};
pub use config::{AssignmentMode, ElasticKMeansConfig, SeedingMethod, StepSchedule};
pub use counters::DistanceCallCounts;
pub use kmeans::{elbow_inertias, ElasticKMeans};

use crate::core::Series;
use crate::error::Result;

/// Common interface for clustering estimators.
///
/// This trait is object-safe and can be used with `Box<dyn Clusterer>`.
pub trait Clusterer {
    /// Fit the estimator to a collection of series.
    fn fit(&mut self, series: &[Series]) -> Result<()>;

    /// Assign each series to a fitted cluster.
    fn predict(&self, series: &[Series]) -> Result<Vec<usize>>;

    /// Fit the estimator and return the training labels.
    fn fit_predict(&mut self, series: &[Series]) -> Result<Vec<usize>> {
        self.fit(series)?;
        self.predict(series)
    }

    /// Get the estimator name.
    fn name(&self) -> &str;

    /// Check if the estimator has been fitted.
    fn is_fitted(&self) -> bool;
}
