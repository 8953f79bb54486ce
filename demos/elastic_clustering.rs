//! Elastic Time Series Clustering Example
//!
//! This example demonstrates how to cluster time series with K-means
//! under an elastic distance, inspect the fitted model, and assign new
//! series to the learned clusters.
//!
//! Run with: cargo run --example elastic_clustering

use anofox_cluster::clustering::{elbow_inertias, ElasticKMeans, ElasticKMeansConfig};
use anofox_cluster::core::Series;
use anofox_cluster::distances::DistanceSpec;
use anofox_cluster::transform::z_normalize_batch;

fn main() {
    env_logger::init();

    println!("=== Elastic Time Series Clustering Example ===\n");

    // Two kinds of shapes: a bump that drifts in time, and a ramp.
    let raw = vec![
        vec![0.0, 1.0, 3.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 3.0, 1.0, 0.0, 0.0, 0.0],
        vec![0.0, 0.0, 0.0, 1.0, 3.0, 1.0, 0.0, 0.0],
        vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
        vec![0.0, 1.1, 2.1, 3.1, 4.1, 5.1, 6.1, 7.1],
        vec![0.2, 1.2, 2.2, 3.0, 4.2, 5.2, 6.0, 7.2],
    ];
    let series: Vec<Series> = raw
        .iter()
        .map(|values| Series::univariate(values.clone()).unwrap())
        .collect();
    let series = z_normalize_batch(&series);

    println!("Clustering {} series of length 8 into 2 clusters\n", series.len());

    // DTW absorbs the time shift within the bump group; a lockstep
    // distance would not.
    let config = ElasticKMeansConfig::default()
        .n_clusters(2)
        .distance(DistanceSpec::Dtw { window: None })
        .max_iter(50)
        .seed(42)
        .verbose(true);

    let mut model = ElasticKMeans::new(config);
    model.fit(&series).unwrap();

    println!("Labels:      {:?}", model.labels().unwrap());
    println!("Inertia:     {:.6}", model.inertia().unwrap());
    println!("Iterations:  {}", model.n_iter());

    let calls = model.distance_calls();
    println!("\nDistance calls by phase:");
    println!("  init:          {}", calls.init);
    println!("  update:        {}", calls.update);
    println!("  assignment:    {}", calls.assignment);
    println!("  empty cluster: {}", calls.empty_cluster);
    println!("  total:         {}", calls.total());

    // Assign a new shifted bump to the fitted clusters.
    let new_bump =
        Series::univariate(vec![0.0, 0.0, 0.0, 0.0, 1.0, 3.0, 1.0, 0.0]).unwrap();
    let new_series = z_normalize_batch(&[new_bump]);
    let predicted = model.predict(&new_series).unwrap();
    println!("\nNew shifted bump lands in cluster {}", predicted[0]);

    // Elbow sweep over candidate cluster counts.
    let base = ElasticKMeansConfig::default()
        .distance(DistanceSpec::Dtw { window: None })
        .max_iter(50)
        .seed(42);
    let inertias = elbow_inertias(&series, 4, &base).unwrap();
    println!("\nElbow inertias for k = 1..=4:");
    for (i, inertia) in inertias.iter().enumerate() {
        println!("  k = {}: {:.6}", i + 1, inertia);
    }
}
