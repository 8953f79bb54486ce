//! Elastic Distance Example
//!
//! This example compares the built-in distances on shifted series and
//! shows how a named distance is resolved with its parameters.
//!
//! Run with: cargo run --example elastic_distances

use anofox_cluster::core::Series;
use anofox_cluster::distances::{
    dtw_distance, euclidean_distance, msm_distance, twe_distance, DistanceSpec,
};

fn main() {
    println!("=== Elastic Distance Example ===\n");

    let a = Series::univariate(vec![0.0, 0.0, 1.0, 2.0, 1.0, 0.0]).unwrap();
    let b = Series::univariate(vec![0.0, 1.0, 2.0, 1.0, 0.0, 0.0]).unwrap();

    println!("Series A: {:?}", a.channel(0));
    println!("Series B: {:?} (shifted version)", b.channel(0));
    println!();

    // Elastic distances align the peaks despite the shift.
    println!("dtw(A, B)       = {:.4}", dtw_distance(&a, &b, None));
    println!("dtw(A, B, w=1)  = {:.4}", dtw_distance(&a, &b, Some(1)));
    println!("msm(A, B)       = {:.4}", msm_distance(&a, &b, 1.0));
    println!("twe(A, B)       = {:.4}", twe_distance(&a, &b, 0.001, 1.0));
    println!("euclidean(A, B) = {:.4}", euclidean_distance(&a, &b));

    // Named lookup with default parameters, resolved once.
    let resolved = DistanceSpec::from_name("msm").unwrap().resolve().unwrap();
    println!("\nResolved '{}' distance: {:.4}", resolved.name(), resolved.distance(&a, &b));

    // Pairwise matrix over a small collection.
    let collection = vec![a, b];
    let matrix = resolved.pairwise_self(&collection);
    println!("\nPairwise matrix:");
    for row in &matrix {
        println!("  {row:?}");
    }

    // The optimal alignment path behind the distance.
    let path = resolved.alignment_path(&collection[0], &collection[1]);
    println!("\nAlignment path: {path:?}");
}
