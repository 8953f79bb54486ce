//! Elastic K-means clustering.
//!
//! The estimator alternates a barycenter update step per cluster with a
//! triangle-inequality pruned assignment step, repairing empty clusters
//! between the two, until labels stabilize or the iteration limit is
//! reached.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::assignment::{argmin, assign, assign_lloyds};
use super::barycenter::{elastic_barycenter_average, BarycenterConfig};
use super::config::{AssignmentMode, ElasticKMeansConfig, SeedingMethod};
use super::counters::DistanceCallCounts;
use super::empty::resolve_empty_clusters;
use super::seeding::{kmeans_plus_plus, random_init};
use super::Clusterer;
use crate::core::Series;
use crate::distances::ResolvedDistance;
use crate::error::{ClusterError, Result};

/// K-means clustering of time series under an elastic distance.
///
/// # Example
///
/// ```
/// use anofox_cluster::clustering::{Clusterer, ElasticKMeans, ElasticKMeansConfig};
/// use anofox_cluster::core::Series;
/// use anofox_cluster::distances::DistanceSpec;
///
/// let series: Vec<Series> = [
///     [1.0, 2.0, 1.0],
///     [1.1, 2.1, 1.1],
///     [10.0, 11.0, 10.0],
///     [10.1, 11.1, 10.1],
/// ]
/// .iter()
/// .map(|v| Series::univariate(v.to_vec()).unwrap())
/// .collect();
///
/// let config = ElasticKMeansConfig::default()
///     .n_clusters(2)
///     .distance(DistanceSpec::from_name("dtw").unwrap())
///     .seed(42);
/// let mut model = ElasticKMeans::new(config);
/// model.fit(&series).unwrap();
///
/// assert_eq!(model.cluster_centers().unwrap().len(), 2);
/// assert_eq!(model.labels().unwrap().len(), 4);
/// ```
#[derive(Debug)]
pub struct ElasticKMeans {
    config: ElasticKMeansConfig,
    labels_: Option<Vec<usize>>,
    cluster_centers_: Option<Vec<Series>>,
    inertia_: Option<f64>,
    n_iter_: usize,
    distance_calls: DistanceCallCounts,
}

/// Outcome of one seeded run of the clustering loop.
struct RunOutcome {
    labels: Vec<usize>,
    centres: Vec<Series>,
    inertia: f64,
    n_iter: usize,
}

impl ElasticKMeans {
    /// Create an unfitted model from a configuration.
    pub fn new(config: ElasticKMeansConfig) -> Self {
        Self {
            config,
            labels_: None,
            cluster_centers_: None,
            inertia_: None,
            n_iter_: 0,
            distance_calls: DistanceCallCounts::default(),
        }
    }

    /// The configuration this model was built with.
    pub fn config(&self) -> &ElasticKMeansConfig {
        &self.config
    }

    /// Cluster label per training series, once fitted.
    pub fn labels(&self) -> Option<&[usize]> {
        self.labels_.as_deref()
    }

    /// Cluster centroids, once fitted.
    pub fn cluster_centers(&self) -> Option<&[Series]> {
        self.cluster_centers_.as_deref()
    }

    /// Sum of squared distances to assigned centroids, once fitted.
    pub fn inertia(&self) -> Option<f64> {
        self.inertia_
    }

    /// Iterations performed by the winning run.
    pub fn n_iter(&self) -> usize {
        self.n_iter_
    }

    /// Distance evaluations performed by the last `fit`, by phase.
    pub fn distance_calls(&self) -> DistanceCallCounts {
        self.distance_calls
    }

    /// Negated inertia, once fitted. Higher is better.
    pub fn score(&self) -> Option<f64> {
        self.inertia_.map(|inertia| -inertia)
    }

    /// Fit the model to a collection of series.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ClusterError::EmptyData`] | `series` is empty |
    /// | [`ClusterError::DimensionMismatch`] | series of differing shapes |
    /// | [`ClusterError::InvalidParameter`] | bad configuration for this input |
    /// | [`ClusterError::EmptyCluster`] | degenerate input defeats repair |
    pub fn fit(&mut self, series: &[Series]) -> Result<()> {
        validate_collection(series)?;
        self.config.validate(series.len())?;
        let dist = self.config.distance.resolve()?;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut counters = DistanceCallCounts::default();

        let mut best: Option<RunOutcome> = None;
        for restart in 0..self.config.n_restarts {
            if self.config.n_restarts > 1 {
                debug!("starting restart {}", restart + 1);
            }
            let run = self.run_once(series, &dist, &mut rng, &mut counters)?;
            if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }

        let best = best.ok_or_else(|| {
            ClusterError::InvalidParameter("n_restarts must be at least 1".to_string())
        })?;
        self.labels_ = Some(best.labels);
        self.cluster_centers_ = Some(best.centres);
        self.inertia_ = Some(best.inertia);
        self.n_iter_ = best.n_iter;
        self.distance_calls = counters;

        if self.config.verbose {
            info!(
                "fit complete: inertia {:.6}, {} iterations, distance calls \
                 init {} / update {} / assignment {} / empty {} (total {})",
                best.inertia,
                best.n_iter,
                counters.init,
                counters.update,
                counters.assignment,
                counters.empty_cluster,
                counters.total()
            );
        }
        Ok(())
    }

    /// Assign each series to the nearest fitted centroid.
    ///
    /// Runs a single full pairwise pass; fitted state is not touched.
    pub fn predict(&self, series: &[Series]) -> Result<Vec<usize>> {
        let centres = self.cluster_centers_.as_ref().ok_or(ClusterError::FitRequired)?;
        validate_collection(series)?;
        let dist = self.config.distance.resolve()?;

        let pairwise = dist.pairwise(series, centres);
        Ok(pairwise.iter().map(|row| argmin(row).0).collect())
    }

    /// One seed-then-iterate run of the clustering loop.
    fn run_once(
        &self,
        series: &[Series],
        dist: &ResolvedDistance,
        rng: &mut StdRng,
        counters: &mut DistanceCallCounts,
    ) -> Result<RunOutcome> {
        let k = self.config.n_clusters;

        let (mut centres, mut dists, mut labels) = match self.config.seeding {
            SeedingMethod::KMeansPlusPlus => kmeans_plus_plus(series, k, dist, rng, counters),
            SeedingMethod::Random => random_init(series, k, dist, rng, counters),
        };
        debug!(
            "seeding complete, starting inertia {:.6}",
            dists.iter().map(|d| d * d).sum::<f64>()
        );

        if self.config.max_iter == 0 {
            let inertia = dists.iter().map(|d| d * d).sum();
            return Ok(RunOutcome {
                labels,
                centres,
                inertia,
                n_iter: 0,
            });
        }

        let ba_config = BarycenterConfig {
            max_iters: self.config.ba_max_iters,
            initial_step_size: self.config.initial_step_size,
            final_step_size: self.config.final_step_size,
            schedule: self.config.schedule,
            subset_fraction: self.config.subset_fraction,
            warm_start_full_subset: self.config.warm_start_full_subset,
        };

        let mut inertia = f64::INFINITY;
        let mut prev_inertia = f64::INFINITY;
        let mut prev_labels: Option<Vec<usize>> = None;
        let mut prev_centres: Option<Vec<Series>> = None;
        let mut cache: Option<Vec<Vec<f64>>> = None;
        let mut n_iter = 0;

        for i in 0..self.config.max_iter {
            n_iter = i + 1;

            self.update_step(
                series,
                &mut centres,
                &mut dists,
                &labels,
                prev_labels.as_deref(),
                dist,
                &ba_config,
                rng,
                counters,
            )?;

            match self.config.assignment {
                AssignmentMode::Pruned => {
                    let outcome = assign(
                        series,
                        &centres,
                        &mut labels,
                        &mut dists,
                        dist,
                        i == 0,
                        prev_centres.as_deref(),
                        cache.as_deref(),
                        counters,
                    );
                    inertia = outcome.inertia;
                    cache = Some(outcome.cache);
                }
                AssignmentMode::Lloyds => {
                    inertia =
                        assign_lloyds(series, &centres, &mut labels, &mut dists, dist, counters);
                    cache = None;
                }
            }

            let repaired = resolve_empty_clusters(
                series,
                &mut centres,
                &mut dists,
                &mut labels,
                dist,
                counters,
            )?;
            if repaired {
                // Repair moved centroids, so cached distances and the
                // inertia from the assignment pass are stale.
                cache = None;
                inertia = dists.iter().map(|d| d * d).sum();
            }

            if prev_labels.as_deref() == Some(labels.as_slice()) {
                debug!("converged at iteration {i}, inertia {inertia:.6}");
                break;
            }

            prev_inertia = inertia;
            prev_labels = Some(labels.clone());
            prev_centres = Some(centres.clone());
            debug!("iteration {i}, inertia {inertia:.6}");
        }

        // The final assignment can be worse than the state that
        // triggered the stability check; keep whichever is lower.
        if inertia <= prev_inertia {
            Ok(RunOutcome {
                labels,
                centres,
                inertia,
                n_iter,
            })
        } else {
            Ok(RunOutcome {
                labels: prev_labels.expect("previous iteration exists when its inertia is lower"),
                centres: prev_centres.expect("previous iteration exists when its inertia is lower"),
                inertia: prev_inertia,
                n_iter,
            })
        }
    }

    /// Refresh each cluster's centroid via barycenter averaging.
    #[allow(clippy::too_many_arguments)]
    fn update_step(
        &self,
        series: &[Series],
        centres: &mut [Series],
        dists: &mut [f64],
        labels: &[usize],
        prev_labels: Option<&[usize]>,
        dist: &ResolvedDistance,
        ba_config: &BarycenterConfig,
        rng: &mut StdRng,
        counters: &mut DistanceCallCounts,
    ) -> Result<()> {
        for j in 0..centres.len() {
            let member_indices: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter_map(|(i, &l)| (l == j).then_some(i))
                .collect();

            if member_indices.is_empty() {
                // Left for the empty-cluster repair after assignment.
                debug!("cluster {j} has no members, skipping update");
                continue;
            }

            if self.config.skip_unchanged_clusters {
                if let Some(prev) = prev_labels {
                    let unchanged = labels
                        .iter()
                        .zip(prev.iter())
                        .all(|(&now, &before)| (now == j) == (before == j));
                    if unchanged {
                        continue;
                    }
                }
            }

            let members: Vec<&Series> = member_indices.iter().map(|&i| &series[i]).collect();
            let prev_dists: Vec<f64> = member_indices.iter().map(|&i| dists[i]).collect();
            let prev_cost = prev_dists.iter().sum::<f64>();

            let (centre, new_dists, calls) = elastic_barycenter_average(
                &members,
                Some(&centres[j]),
                dist,
                ba_config,
                Some((prev_cost, prev_dists.as_slice())),
                rng,
            )?;
            counters.update += calls;

            centres[j] = centre;
            for (position, &i) in member_indices.iter().enumerate() {
                dists[i] = new_dists[position];
            }
        }
        Ok(())
    }
}

impl Clusterer for ElasticKMeans {
    fn fit(&mut self, series: &[Series]) -> Result<()> {
        ElasticKMeans::fit(self, series)
    }

    fn predict(&self, series: &[Series]) -> Result<Vec<usize>> {
        ElasticKMeans::predict(self, series)
    }

    fn fit_predict(&mut self, series: &[Series]) -> Result<Vec<usize>> {
        ElasticKMeans::fit(self, series)?;
        self.labels_.clone().ok_or(ClusterError::FitRequired)
    }

    fn name(&self) -> &str {
        "ElasticKMeans"
    }

    fn is_fitted(&self) -> bool {
        self.labels_.is_some()
    }
}

/// Check that the collection is non-empty and all series share a shape.
fn validate_collection(series: &[Series]) -> Result<()> {
    let first = series.first().ok_or(ClusterError::EmptyData)?;
    for s in &series[1..] {
        if s.n_channels() != first.n_channels() {
            return Err(ClusterError::DimensionMismatch {
                expected: first.n_channels(),
                got: s.n_channels(),
            });
        }
        if s.len() != first.len() {
            return Err(ClusterError::DimensionMismatch {
                expected: first.len(),
                got: s.len(),
            });
        }
    }
    Ok(())
}

/// Inertia per cluster count, for elbow-method selection of `k`.
///
/// Fits a model for every `k` in `1..=max_k` (capped at the number of
/// series) with the given base configuration and collects the inertias.
pub fn elbow_inertias(
    series: &[Series],
    max_k: usize,
    base: &ElasticKMeansConfig,
) -> Result<Vec<f64>> {
    (1..=max_k.min(series.len()))
        .map(|k| {
            let mut model = ElasticKMeans::new(base.clone().n_clusters(k));
            model.fit(series)?;
            Ok(model.inertia().unwrap_or(f64::INFINITY))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distances::DistanceSpec;
    use approx::assert_relative_eq;

    fn uni(values: &[f64]) -> Series {
        Series::univariate(values.to_vec()).unwrap()
    }

    /// Six series in two tight groups.
    fn two_groups() -> Vec<Series> {
        vec![
            uni(&[1.0, 2.0, 1.0, 2.0, 1.0]),
            uni(&[1.5, 2.5, 1.5, 2.5, 1.5]),
            uni(&[1.2, 2.2, 1.2, 2.2, 1.2]),
            uni(&[10.0, 11.0, 10.0, 11.0, 10.0]),
            uni(&[10.5, 11.5, 10.5, 11.5, 10.5]),
            uni(&[10.2, 11.2, 10.2, 11.2, 10.2]),
        ]
    }

    fn base_config() -> ElasticKMeansConfig {
        ElasticKMeansConfig::default()
            .n_clusters(2)
            .distance(DistanceSpec::Euclidean)
            .max_iter(50)
            .seed(0)
    }

    // ==================== fit ====================

    #[test]
    fn fit_separates_groups() {
        let series = two_groups();
        let mut model = ElasticKMeans::new(base_config());
        model.fit(&series).unwrap();

        let labels = model.labels().unwrap();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);

        assert!(model.n_iter() < 50);
        assert!(model.inertia().unwrap() >= 0.0);
        assert!(model.distance_calls().total() > 0);
    }

    #[test]
    fn fit_is_deterministic() {
        let series = two_groups();

        let mut model1 = ElasticKMeans::new(base_config());
        model1.fit(&series).unwrap();
        let mut model2 = ElasticKMeans::new(base_config());
        model2.fit(&series).unwrap();

        assert_eq!(model1.labels(), model2.labels());
        assert_eq!(model1.cluster_centers(), model2.cluster_centers());
        assert_eq!(model1.inertia(), model2.inertia());
        assert_eq!(model1.distance_calls(), model2.distance_calls());
    }

    #[test]
    fn fit_rejects_bad_input() {
        let mut model = ElasticKMeans::new(base_config());
        assert_eq!(model.fit(&[]), Err(ClusterError::EmptyData));

        let ragged = vec![uni(&[1.0, 2.0]), uni(&[1.0, 2.0, 3.0])];
        assert!(matches!(
            model.fit(&ragged),
            Err(ClusterError::DimensionMismatch { .. })
        ));

        let two = vec![uni(&[1.0, 2.0]), uni(&[3.0, 4.0])];
        let mut too_many = ElasticKMeans::new(base_config().n_clusters(3));
        assert!(matches!(
            too_many.fit(&two),
            Err(ClusterError::InvalidParameter(_))
        ));
    }

    #[test]
    fn max_iter_zero_returns_seeded_state() {
        let series = two_groups();
        let mut model = ElasticKMeans::new(base_config().max_iter(0));
        model.fit(&series).unwrap();

        assert_eq!(model.n_iter(), 0);
        assert_eq!(model.labels().unwrap().len(), 6);
        assert_eq!(model.cluster_centers().unwrap().len(), 2);
    }

    #[test]
    fn every_cluster_has_members() {
        let series = two_groups();
        let mut model = ElasticKMeans::new(base_config());
        model.fit(&series).unwrap();

        let labels = model.labels().unwrap();
        for cluster in 0..2 {
            assert!(labels.iter().any(|&l| l == cluster));
        }
    }

    // ==================== predict ====================

    #[test]
    fn predict_requires_fit() {
        let model = ElasticKMeans::new(base_config());
        let series = two_groups();
        assert_eq!(model.predict(&series), Err(ClusterError::FitRequired));
    }

    #[test]
    fn predict_matches_training_labels() {
        let series = two_groups();
        let mut model = ElasticKMeans::new(base_config());
        model.fit(&series).unwrap();

        let predicted = model.predict(&series).unwrap();
        assert_eq!(predicted.as_slice(), model.labels().unwrap());
    }

    #[test]
    fn predict_is_idempotent() {
        let series = two_groups();
        let mut model = ElasticKMeans::new(base_config());
        model.fit(&series).unwrap();

        let first = model.predict(&series).unwrap();
        let second = model.predict(&series).unwrap();
        assert_eq!(first, second);
    }

    // ==================== modes ====================

    #[test]
    fn lloyds_mode_matches_pruned_labels() {
        let series = two_groups();

        let mut pruned = ElasticKMeans::new(base_config());
        pruned.fit(&series).unwrap();
        let mut lloyds =
            ElasticKMeans::new(base_config().assignment(AssignmentMode::Lloyds));
        lloyds.fit(&series).unwrap();

        assert_eq!(pruned.labels(), lloyds.labels());
        assert_relative_eq!(
            pruned.inertia().unwrap(),
            lloyds.inertia().unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn random_seeding_still_clusters() {
        let series = two_groups();
        let mut model =
            ElasticKMeans::new(base_config().seeding(SeedingMethod::Random));
        model.fit(&series).unwrap();

        let labels = model.labels().unwrap();
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn multi_restart_keeps_best_inertia() {
        let series = two_groups();

        let mut single = ElasticKMeans::new(base_config());
        single.fit(&series).unwrap();
        let mut restarted = ElasticKMeans::new(base_config().n_restarts(5));
        restarted.fit(&series).unwrap();

        assert!(restarted.inertia().unwrap() <= single.inertia().unwrap() + 1e-9);
    }

    #[test]
    fn skip_unchanged_clusters_converges() {
        let series = two_groups();
        let mut model =
            ElasticKMeans::new(base_config().skip_unchanged_clusters(true));
        model.fit(&series).unwrap();

        let labels = model.labels().unwrap();
        assert_ne!(labels[0], labels[3]);
    }

    // ==================== trait ====================

    #[test]
    fn clusterer_trait_object() {
        let series = two_groups();
        let mut model: Box<dyn Clusterer> = Box::new(ElasticKMeans::new(base_config()));

        assert_eq!(model.name(), "ElasticKMeans");
        assert!(!model.is_fitted());

        let labels = model.fit_predict(&series).unwrap();
        assert!(model.is_fitted());
        assert_eq!(labels.len(), 6);
    }

    // ==================== elbow ====================

    #[test]
    fn elbow_inertias_shrink_with_k() {
        let series = two_groups();
        let inertias = elbow_inertias(&series, 4, &base_config()).unwrap();

        assert_eq!(inertias.len(), 4);
        // More clusters never fit worse on this well-separated data.
        assert!(inertias[1] <= inertias[0] + 1e-9);
    }
}
