//! Configuration for elastic K-means clustering.

use crate::distances::DistanceSpec;
use crate::error::{ClusterError, Result};

/// Strategy for the per-iteration assignment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignmentMode {
    /// Triangle-inequality pruned assignment that skips distance
    /// evaluations a bound proves redundant.
    #[default]
    Pruned,
    /// Plain Lloyd's assignment: the full pairwise matrix every
    /// iteration. Slower, useful as a reference.
    Lloyds,
}

/// Strategy for choosing initial centroids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedingMethod {
    /// Distance-weighted probabilistic seeding (K-means++ adapted to
    /// elastic distances).
    #[default]
    KMeansPlusPlus,
    /// Uniform selection of distinct series as initial centroids.
    Random,
}

/// Decaying step-size schedule for barycenter averaging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepSchedule {
    /// Linear interpolation from the initial to the final step size.
    Linear,
    /// Exponential decay from the initial toward the final step size.
    Exponential { decay_rate: f64 },
}

impl Default for StepSchedule {
    fn default() -> Self {
        StepSchedule::Exponential { decay_rate: 0.1 }
    }
}

impl StepSchedule {
    /// Step size for refinement iteration `iter` of `max_iters`.
    pub(crate) fn step_at(&self, iter: usize, max_iters: usize, initial: f64, last: f64) -> f64 {
        match self {
            StepSchedule::Linear => {
                let span = max_iters.saturating_sub(1).max(1) as f64;
                initial + (last - initial) * (iter as f64 / span)
            }
            StepSchedule::Exponential { decay_rate } => {
                last + (initial - last) * (-decay_rate * iter as f64).exp()
            }
        }
    }
}

/// Elastic K-means configuration.
///
/// # Example
///
/// ```
/// use anofox_cluster::clustering::ElasticKMeansConfig;
/// use anofox_cluster::distances::DistanceSpec;
///
/// let config = ElasticKMeansConfig::default()
///     .n_clusters(2)
///     .distance(DistanceSpec::Dtw { window: None })
///     .max_iter(50)
///     .seed(0);
/// assert_eq!(config.n_clusters, 2);
/// ```
#[derive(Debug, Clone)]
pub struct ElasticKMeansConfig {
    /// Number of clusters.
    pub n_clusters: usize,
    /// Distance between series.
    pub distance: DistanceSpec,
    /// Assignment strategy.
    pub assignment: AssignmentMode,
    /// Seeding strategy.
    pub seeding: SeedingMethod,
    /// Fraction of a cluster's members sampled per barycenter iteration.
    pub subset_fraction: f64,
    /// Step size at the start of each barycenter refinement.
    pub initial_step_size: f64,
    /// Step size the schedule decays toward.
    pub final_step_size: f64,
    /// Shape of the step-size decay.
    pub schedule: StepSchedule,
    /// Maximum barycenter refinement iterations per cluster update.
    pub ba_max_iters: usize,
    /// Use the full member set on the first barycenter iteration.
    pub warm_start_full_subset: bool,
    /// Skip the barycenter update for clusters whose membership did not
    /// change since the previous iteration.
    pub skip_unchanged_clusters: bool,
    /// Maximum clustering iterations.
    pub max_iter: usize,
    /// Convergence tolerance. Reserved: convergence is currently
    /// detected by label stability alone.
    pub tol: f64,
    /// Number of independent restarts; the lowest-inertia run wins.
    pub n_restarts: usize,
    /// Random seed for reproducibility (None for entropy).
    pub seed: Option<u64>,
    /// Emit summary diagnostics at info level. No behavioral effect.
    pub verbose: bool,
}

impl Default for ElasticKMeansConfig {
    fn default() -> Self {
        Self {
            n_clusters: 8,
            distance: DistanceSpec::default(),
            assignment: AssignmentMode::default(),
            seeding: SeedingMethod::default(),
            subset_fraction: 0.5,
            initial_step_size: 0.05,
            final_step_size: 0.005,
            schedule: StepSchedule::default(),
            ba_max_iters: 50,
            warm_start_full_subset: true,
            skip_unchanged_clusters: false,
            max_iter: 300,
            tol: 1e-6,
            n_restarts: 1,
            seed: None,
            verbose: false,
        }
    }
}

impl ElasticKMeansConfig {
    /// Set the number of clusters.
    pub fn n_clusters(mut self, n_clusters: usize) -> Self {
        self.n_clusters = n_clusters;
        self
    }

    /// Set the distance.
    pub fn distance(mut self, distance: DistanceSpec) -> Self {
        self.distance = distance;
        self
    }

    /// Set the assignment strategy.
    pub fn assignment(mut self, assignment: AssignmentMode) -> Self {
        self.assignment = assignment;
        self
    }

    /// Set the seeding strategy.
    pub fn seeding(mut self, seeding: SeedingMethod) -> Self {
        self.seeding = seeding;
        self
    }

    /// Set the barycenter subset fraction.
    pub fn subset_fraction(mut self, subset_fraction: f64) -> Self {
        self.subset_fraction = subset_fraction;
        self
    }

    /// Set the initial and final step sizes.
    pub fn step_sizes(mut self, initial: f64, last: f64) -> Self {
        self.initial_step_size = initial;
        self.final_step_size = last;
        self
    }

    /// Set the step-size schedule.
    pub fn schedule(mut self, schedule: StepSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Set the maximum barycenter refinement iterations.
    pub fn ba_max_iters(mut self, ba_max_iters: usize) -> Self {
        self.ba_max_iters = ba_max_iters;
        self
    }

    /// Toggle full-membership sampling on the first barycenter iteration.
    pub fn warm_start_full_subset(mut self, on: bool) -> Self {
        self.warm_start_full_subset = on;
        self
    }

    /// Toggle skipping updates for unchanged clusters.
    pub fn skip_unchanged_clusters(mut self, on: bool) -> Self {
        self.skip_unchanged_clusters = on;
        self
    }

    /// Set the maximum clustering iterations.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the number of restarts.
    pub fn n_restarts(mut self, n_restarts: usize) -> Self {
        self.n_restarts = n_restarts;
        self
    }

    /// Set the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Toggle verbose diagnostics.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate against the number of cases to be clustered.
    pub(crate) fn validate(&self, n_cases: usize) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(ClusterError::InvalidParameter(
                "n_clusters must be positive".to_string(),
            ));
        }
        if self.n_clusters > n_cases {
            return Err(ClusterError::InvalidParameter(format!(
                "n_clusters ({}) cannot be larger than n_cases ({n_cases})",
                self.n_clusters
            )));
        }
        if !(self.subset_fraction > 0.0 && self.subset_fraction <= 1.0) {
            return Err(ClusterError::InvalidParameter(format!(
                "subset_fraction must be in (0, 1], got {}",
                self.subset_fraction
            )));
        }
        if self.initial_step_size <= 0.0 || self.final_step_size <= 0.0 {
            return Err(ClusterError::InvalidParameter(
                "step sizes must be positive".to_string(),
            ));
        }
        if self.n_restarts == 0 {
            return Err(ClusterError::InvalidParameter(
                "n_restarts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
