//! Elastic and lockstep distances between time series.
//!
//! Distances are selected through [`DistanceSpec`], either by name or by
//! constructing a variant with explicit parameters, and resolved once
//! into a [`ResolvedDistance`] that binds the parameters into concrete
//! callables. The clustering engine only ever sees the resolved form.
//!
//! # Example
//!
//! ```
//! use anofox_cluster::core::Series;
//! use anofox_cluster::distances::DistanceSpec;
//!
//! let a = Series::univariate(vec![1.0, 2.0, 3.0, 2.0, 1.0]).unwrap();
//! let b = Series::univariate(vec![1.0, 2.0, 3.0, 2.0, 1.0]).unwrap();
//!
//! let dtw = DistanceSpec::from_name("dtw").unwrap().resolve().unwrap();
//! assert_eq!(dtw.distance(&a, &b), 0.0);
//! ```

pub mod dtw;
pub mod lockstep;
pub mod msm;
mod path;
pub mod twe;

pub use dtw::{dtw_alignment_path, dtw_distance};
pub use lockstep::{euclidean_distance, manhattan_distance, squared_euclidean_distance};
pub use msm::{msm_alignment_path, msm_distance};
pub use twe::{twe_alignment_path, twe_distance};

use std::fmt;
use std::sync::Arc;

use crate::core::Series;
use crate::error::{ClusterError, Result};

/// Signature of a user-supplied distance function.
pub type CustomDistanceFn = dyn Fn(&Series, &Series) -> f64 + Send + Sync;

/// Specification of a distance between two time series.
///
/// Built-in variants carry their parameters; [`DistanceSpec::Custom`]
/// wraps an arbitrary user function.
#[derive(Clone)]
pub enum DistanceSpec {
    /// Euclidean distance (requires same-shape series).
    Euclidean,
    /// Squared Euclidean distance (requires same-shape series).
    SquaredEuclidean,
    /// Manhattan distance (requires same-shape series).
    Manhattan,
    /// Dynamic Time Warping with an optional Sakoe-Chiba window.
    Dtw { window: Option<usize> },
    /// Move-Split-Merge with split/merge cost `c`.
    Msm { c: f64 },
    /// Time Warp Edit with stiffness `nu` and delete penalty `lambda`.
    Twe { nu: f64, lambda: f64 },
    /// User-supplied distance function.
    Custom(Arc<CustomDistanceFn>),
}

impl Default for DistanceSpec {
    fn default() -> Self {
        DistanceSpec::Msm { c: 1.0 }
    }
}

impl fmt::Debug for DistanceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceSpec::Euclidean => write!(f, "Euclidean"),
            DistanceSpec::SquaredEuclidean => write!(f, "SquaredEuclidean"),
            DistanceSpec::Manhattan => write!(f, "Manhattan"),
            DistanceSpec::Dtw { window } => f.debug_struct("Dtw").field("window", window).finish(),
            DistanceSpec::Msm { c } => f.debug_struct("Msm").field("c", c).finish(),
            DistanceSpec::Twe { nu, lambda } => f
                .debug_struct("Twe")
                .field("nu", nu)
                .field("lambda", lambda)
                .finish(),
            DistanceSpec::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl DistanceSpec {
    /// Look up a built-in distance by name with default parameters.
    ///
    /// Recognized names: `"euclidean"`, `"sqeuclidean"`, `"manhattan"`,
    /// `"dtw"`, `"msm"`, `"twe"`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "euclidean" => Ok(DistanceSpec::Euclidean),
            "sqeuclidean" => Ok(DistanceSpec::SquaredEuclidean),
            "manhattan" => Ok(DistanceSpec::Manhattan),
            "dtw" => Ok(DistanceSpec::Dtw { window: None }),
            "msm" => Ok(DistanceSpec::Msm { c: 1.0 }),
            "twe" => Ok(DistanceSpec::Twe {
                nu: 0.001,
                lambda: 1.0,
            }),
            _ => Err(ClusterError::InvalidParameter(format!(
                "unknown distance name: {name}"
            ))),
        }
    }

    /// Validate parameters and bind them into concrete callables.
    pub fn resolve(&self) -> Result<ResolvedDistance> {
        match self {
            DistanceSpec::Euclidean => Ok(ResolvedDistance {
                name: "euclidean",
                dist: Arc::new(euclidean_distance),
                align: Arc::new(lockstep::identity_path),
            }),
            DistanceSpec::SquaredEuclidean => Ok(ResolvedDistance {
                name: "sqeuclidean",
                dist: Arc::new(squared_euclidean_distance),
                align: Arc::new(lockstep::identity_path),
            }),
            DistanceSpec::Manhattan => Ok(ResolvedDistance {
                name: "manhattan",
                dist: Arc::new(manhattan_distance),
                align: Arc::new(lockstep::identity_path),
            }),
            DistanceSpec::Dtw { window } => {
                let window = *window;
                Ok(ResolvedDistance {
                    name: "dtw",
                    dist: Arc::new(move |a, b| dtw_distance(a, b, window)),
                    align: Arc::new(move |a, b| dtw_alignment_path(a, b, window)),
                })
            }
            DistanceSpec::Msm { c } => {
                if !c.is_finite() || *c <= 0.0 {
                    return Err(ClusterError::InvalidParameter(format!(
                        "msm cost must be positive, got {c}"
                    )));
                }
                let c = *c;
                Ok(ResolvedDistance {
                    name: "msm",
                    dist: Arc::new(move |a, b| msm_distance(a, b, c)),
                    align: Arc::new(move |a, b| msm_alignment_path(a, b, c)),
                })
            }
            DistanceSpec::Twe { nu, lambda } => {
                if !nu.is_finite() || *nu < 0.0 {
                    return Err(ClusterError::InvalidParameter(format!(
                        "twe stiffness must be non-negative, got {nu}"
                    )));
                }
                if !lambda.is_finite() || *lambda < 0.0 {
                    return Err(ClusterError::InvalidParameter(format!(
                        "twe penalty must be non-negative, got {lambda}"
                    )));
                }
                let (nu, lambda) = (*nu, *lambda);
                Ok(ResolvedDistance {
                    name: "twe",
                    dist: Arc::new(move |a, b| twe_distance(a, b, nu, lambda)),
                    align: Arc::new(move |a, b| twe_alignment_path(a, b, nu, lambda)),
                })
            }
            DistanceSpec::Custom(f) => Ok(ResolvedDistance {
                name: "custom",
                dist: Arc::clone(f),
                // Custom functions carry no alignment of their own; the
                // DTW warping path stands in for barycenter updates.
                align: Arc::new(|a, b| dtw_alignment_path(a, b, None)),
            }),
        }
    }
}

/// A distance with its parameters bound, ready for repeated evaluation.
#[derive(Clone)]
pub struct ResolvedDistance {
    name: &'static str,
    dist: Arc<dyn Fn(&Series, &Series) -> f64 + Send + Sync>,
    align: Arc<dyn Fn(&Series, &Series) -> Vec<(usize, usize)> + Send + Sync>,
}

impl fmt::Debug for ResolvedDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedDistance")
            .field("name", &self.name)
            .finish()
    }
}

impl ResolvedDistance {
    /// Name of the underlying distance.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Distance between two series.
    pub fn distance(&self, a: &Series, b: &Series) -> f64 {
        (self.dist)(a, b)
    }

    /// Optimal alignment between two series as `(i, j)` index pairs.
    pub fn alignment_path(&self, a: &Series, b: &Series) -> Vec<(usize, usize)> {
        (self.align)(a, b)
    }

    /// Full rectangular pairwise distance matrix between two collections.
    pub fn pairwise(&self, xs: &[Series], ys: &[Series]) -> Vec<Vec<f64>> {
        xs.iter()
            .map(|x| ys.iter().map(|y| self.distance(x, y)).collect())
            .collect()
    }

    /// Symmetric pairwise distance matrix of one collection with itself.
    ///
    /// Computes the upper triangle and mirrors it; the diagonal is zero.
    pub fn pairwise_self(&self, xs: &[Series]) -> Vec<Vec<f64>> {
        let n = xs.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = self.distance(&xs[i], &xs[j]);
                matrix[i][j] = d;
                matrix[j][i] = d;
            }
        }
        matrix
    }
}
