//! End-to-end clustering scenarios with known expected outcomes.

use anofox_cluster::clustering::{Clusterer, ElasticKMeans, ElasticKMeansConfig};
use anofox_cluster::core::Series;
use anofox_cluster::distances::DistanceSpec;
use anofox_cluster::error::ClusterError;
use anofox_cluster::transform::z_normalize_batch;
use approx::assert_relative_eq;

/// Six sine-like series of length 8 in two visually obvious groups.
fn two_sine_groups() -> Vec<Series> {
    let wave = [0.0, 0.7, 1.0, 0.7, 0.0, -0.7, -1.0, -0.7];

    let mut series = Vec::new();
    for offset in [0.0, 0.05, -0.05] {
        series.push(
            Series::univariate(wave.iter().map(|v| v + offset).collect()).unwrap(),
        );
    }
    for offset in [5.0, 5.05, 4.95] {
        series.push(
            Series::univariate(wave.iter().map(|v| v + offset).collect()).unwrap(),
        );
    }
    series
}

#[test]
fn well_separated_groups_converge_early() {
    let series = two_sine_groups();
    let config = ElasticKMeansConfig::default()
        .n_clusters(2)
        .distance(DistanceSpec::Euclidean)
        .max_iter(50)
        .seed(0);

    let mut model = ElasticKMeans::new(config);
    model.fit(&series).unwrap();

    let labels = model.labels().unwrap();
    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[1], labels[2]);
    assert_eq!(labels[3], labels[4]);
    assert_eq!(labels[4], labels[5]);
    assert_ne!(labels[0], labels[3]);

    assert!(model.n_iter() < 50, "expected early convergence");
}

#[test]
fn one_cluster_per_series_has_zero_inertia() {
    let series = two_sine_groups();
    let config = ElasticKMeansConfig::default()
        .n_clusters(6)
        .distance(DistanceSpec::Euclidean)
        .max_iter(50)
        .seed(0);

    let mut model = ElasticKMeans::new(config);
    model.fit(&series).unwrap();

    assert_relative_eq!(model.inertia().unwrap(), 0.0, epsilon = 1e-12);

    // Every cluster is a singleton.
    let labels = model.labels().unwrap();
    let mut sizes = vec![0usize; 6];
    for &label in labels {
        sizes[label] += 1;
    }
    assert!(sizes.iter().all(|&size| size == 1));
}

#[test]
fn identical_series_fail_fast_for_multiple_clusters() {
    // Documented policy: clustering identical series into more than one
    // cluster cannot populate every cluster, and the repair loop gives
    // up with an error rather than spinning.
    let series: Vec<Series> = (0..5)
        .map(|_| Series::univariate(vec![1.0, 2.0, 3.0, 2.0]).unwrap())
        .collect();
    let config = ElasticKMeansConfig::default()
        .n_clusters(2)
        .distance(DistanceSpec::Euclidean)
        .max_iter(50)
        .seed(0);

    let mut model = ElasticKMeans::new(config);
    let result = model.fit(&series);

    assert!(matches!(result, Err(ClusterError::EmptyCluster { .. })));
}

#[test]
fn final_inertia_no_worse_than_first_iteration() {
    let series = two_sine_groups();
    let config = ElasticKMeansConfig::default()
        .n_clusters(2)
        .distance(DistanceSpec::Euclidean)
        .seed(0);

    // A run truncated to a single iteration reports the inertia of the
    // first full update+assignment pass.
    let mut first_pass = ElasticKMeans::new(config.clone().max_iter(1));
    first_pass.fit(&series).unwrap();

    let mut full = ElasticKMeans::new(config.max_iter(50));
    full.fit(&series).unwrap();

    assert!(full.inertia().unwrap() <= first_pass.inertia().unwrap() + 1e-9);
}

#[test]
fn distance_call_counts_are_reproducible() {
    let series = two_sine_groups();
    let config = ElasticKMeansConfig::default()
        .n_clusters(2)
        .distance(DistanceSpec::Dtw { window: None })
        .max_iter(50)
        .seed(3);

    let mut model1 = ElasticKMeans::new(config.clone());
    model1.fit(&series).unwrap();
    let mut model2 = ElasticKMeans::new(config);
    model2.fit(&series).unwrap();

    assert_eq!(model1.distance_calls(), model2.distance_calls());
    assert!(model1.distance_calls().init > 0);
    assert!(model1.distance_calls().update > 0);
    assert!(model1.distance_calls().assignment > 0);
}

#[test]
fn default_msm_distance_clusters_normalized_data() {
    // The default configuration (MSM distance) on z-normalized copies
    // of the raw series: shape, not level, drives the grouping, so the
    // offset groups collapse and a flat series stands apart.
    let flat = Series::univariate(vec![3.0; 8]).unwrap();
    let mut series = two_sine_groups();
    series.push(flat);
    let series = z_normalize_batch(&series);

    let config = ElasticKMeansConfig::default()
        .n_clusters(2)
        .max_iter(50)
        .seed(1);

    let mut model = ElasticKMeans::new(config);
    model.fit(&series).unwrap();

    let labels = model.labels().unwrap();
    // All six sine-shaped series normalize to (nearly) the same curve.
    assert!(labels[..6].iter().all(|&l| l == labels[0]));
    // The flat series lands alone in the other cluster.
    assert_ne!(labels[6], labels[0]);
}

#[test]
fn predict_assigns_new_series_to_nearest_centroid() {
    let series = two_sine_groups();
    let config = ElasticKMeansConfig::default()
        .n_clusters(2)
        .distance(DistanceSpec::Euclidean)
        .max_iter(50)
        .seed(0);

    let mut model = ElasticKMeans::new(config);
    let train_labels = model.fit_predict(&series).unwrap();

    let wave = [0.0, 0.7, 1.0, 0.7, 0.0, -0.7, -1.0, -0.7];
    let near_low = Series::univariate(wave.iter().map(|v| v + 0.02).collect()).unwrap();
    let near_high = Series::univariate(wave.iter().map(|v| v + 5.02).collect()).unwrap();

    let predicted = model.predict(&[near_low, near_high]).unwrap();
    assert_eq!(predicted[0], train_labels[0]);
    assert_eq!(predicted[1], train_labels[3]);
}
