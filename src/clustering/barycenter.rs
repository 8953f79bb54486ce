//! Stochastic subgradient barycenter averaging.
//!
//! The barycenter of a set of series under an elastic distance (the
//! Fréchet-mean analogue) has no closed form. This module refines a
//! centroid estimate by repeatedly sampling a random subset of members,
//! aligning each to the current estimate along the distance's optimal
//! warping path, and stepping the aligned centroid points toward the
//! member with a decaying step size. The best centroid seen across
//! refinements is returned.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::config::StepSchedule;
use crate::core::Series;
use crate::distances::ResolvedDistance;
use crate::error::{ClusterError, Result};

/// Configuration for barycenter averaging.
#[derive(Debug, Clone)]
pub struct BarycenterConfig {
    /// Maximum refinement iterations.
    pub max_iters: usize,
    /// Step size at the first refinement.
    pub initial_step_size: f64,
    /// Step size the schedule decays toward.
    pub final_step_size: f64,
    /// Shape of the step-size decay.
    pub schedule: StepSchedule,
    /// Fraction of members sampled per refinement.
    pub subset_fraction: f64,
    /// Use every member on the first refinement regardless of the
    /// subset fraction.
    pub warm_start_full_subset: bool,
}

impl Default for BarycenterConfig {
    fn default() -> Self {
        Self {
            max_iters: 50,
            initial_step_size: 0.05,
            final_step_size: 0.005,
            schedule: StepSchedule::default(),
            subset_fraction: 0.5,
            warm_start_full_subset: true,
        }
    }
}

/// Compute a barycenter of `members` under the given distance.
///
/// Starts from `init` when provided, otherwise from the element-wise
/// mean. When the caller already knows the members' distances to the
/// initial centroid it can pass them as `previous` (total cost and
/// per-member distances) to spare the initial evaluation.
///
/// Returns the best centroid found, the distances from every member to
/// it, and the number of distance evaluations performed.
///
/// # Errors
///
/// Returns [`ClusterError::EmptyData`] for an empty member set; empty
/// clusters are repaired upstream and never averaged.
pub fn elastic_barycenter_average(
    members: &[&Series],
    init: Option<&Series>,
    dist: &ResolvedDistance,
    config: &BarycenterConfig,
    previous: Option<(f64, &[f64])>,
    rng: &mut StdRng,
) -> Result<(Series, Vec<f64>, u64)> {
    if members.is_empty() {
        return Err(ClusterError::EmptyData);
    }
    if members.len() == 1 {
        return Ok((members[0].clone(), vec![0.0], 0));
    }

    let n = members.len();
    let mut calls = 0u64;

    let mut barycenter = match init {
        Some(series) => series.clone(),
        None => Series::mean(members)?,
    };

    let (mut best_cost, mut best_dists) = match previous {
        Some((cost, dists)) => (cost, dists.to_vec()),
        None => {
            let dists: Vec<f64> = members.iter().map(|m| dist.distance(m, &barycenter)).collect();
            calls += n as u64;
            (dists.iter().sum(), dists)
        }
    };
    let mut best = barycenter.clone();
    let mut prev_cost = best_cost;

    let subset_size = (config.subset_fraction * n as f64).ceil() as usize;
    let subset_size = subset_size.clamp(1, n);

    for iter in 0..config.max_iters {
        let step = config.schedule.step_at(
            iter,
            config.max_iters,
            config.initial_step_size,
            config.final_step_size,
        );

        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);
        let sampled = if iter == 0 && config.warm_start_full_subset {
            &order[..]
        } else {
            &order[..subset_size]
        };

        for &idx in sampled {
            let member = members[idx];
            let path = dist.alignment_path(&barycenter, member);
            calls += 1;

            // Subgradient of this member's contribution, accumulated
            // along the alignment.
            let n_channels = barycenter.n_channels();
            let len = barycenter.len();
            let mut grad = vec![vec![0.0; len]; n_channels];
            for &(i, j) in &path {
                for (ch, channel) in grad.iter_mut().enumerate() {
                    channel[i] += barycenter.channel(ch)[i] - member.channel(ch)[j];
                }
            }

            let values = barycenter.values_mut();
            for (ch, channel) in grad.iter().enumerate() {
                for (t, &g) in channel.iter().enumerate() {
                    values[ch][t] -= 2.0 * step * g;
                }
            }
        }

        // Cost over the full membership, not just the sample.
        let dists: Vec<f64> = members.iter().map(|m| dist.distance(m, &barycenter)).collect();
        calls += n as u64;
        let cost: f64 = dists.iter().sum();

        if cost < best_cost {
            best_cost = cost;
            best = barycenter.clone();
            best_dists = dists;
        }

        if (cost - prev_cost).abs() < f64::EPSILON {
            debug!("barycenter converged after {} refinements, cost {cost:.6}", iter + 1);
            break;
        }
        prev_cost = cost;
    }

    Ok((best, best_dists, calls))
}
