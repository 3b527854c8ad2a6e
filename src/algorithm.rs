use crate::config::ClusterConfig;
use crate::distance::{compute_centroid_shift, nearest_centroid, Distance};
use crate::error::Result;
use crate::point::{check_dimensions, Point};
use crate::update::{group_members, CentroidUpdater};
use ndarray::{Array1, Array2, ArrayView1};
use rand::{Rng, RngCore};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::ops::Range;
use std::time::Instant;

/// Assignment value of a point that no assignment phase has visited
/// (every entry after a run with `max_iters == 0`).
pub const UNASSIGNED: i64 = -1;

/// Result of a clustering run
#[derive(Debug, Clone)]
pub struct ClusterResult {
    /// `assignments[i]` is the cluster owning point `i`, or [`UNASSIGNED`]
    pub assignments: Array1<i64>,
    /// The `k` final centroids
    pub centroids: Vec<Point>,
    /// Completed assign/update iterations
    pub n_iterations: usize,
}

impl ClusterResult {
    /// Number of points assigned to each cluster
    pub fn cluster_sizes(&self) -> Vec<usize> {
        group_members(self.assignments.view(), self.centroids.len())
            .iter()
            .map(Vec::len)
            .collect()
    }

    /// Indices of the points assigned to `cluster`, in index order
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.assignments
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == cluster as i64)
            .map(|(i, _)| i)
            .collect()
    }

    /// Final centroids as a `(k, n_features)` matrix
    pub fn centroid_matrix(&self) -> Array2<f64> {
        let n_features = self.centroids.first().map_or(0, Point::dim);
        let mut matrix = Array2::zeros((self.centroids.len(), n_features));
        for (mut row, centroid) in matrix.outer_iter_mut().zip(self.centroids.iter()) {
            row.assign(&centroid.view());
        }
        matrix
    }
}

/// Run fixed-iteration k-means over `points`.
///
/// Configuration and dimension checks happen before any centroid is drawn.
/// Each iteration runs the parallel assignment phase to completion, then the
/// configured update rule; exactly `config.max_iters` iterations are run.
pub fn kmeans_fixed_iterations(
    points: &[Point],
    config: &ClusterConfig,
    rng: &mut dyn RngCore,
) -> Result<ClusterResult> {
    let updater = config.update_rule.updater(config.metric);
    kmeans_with_updater(points, config, updater.as_ref(), rng)
}

/// Same loop as [`kmeans_fixed_iterations`], driving an explicit `updater`
/// instead of the one named by `config.update_rule`
pub fn kmeans_with_updater(
    points: &[Point],
    config: &ClusterConfig,
    updater: &dyn CentroidUpdater,
    rng: &mut dyn RngCore,
) -> Result<ClusterResult> {
    let n_features = check_dimensions(points)?;
    let n_samples = points.len();
    config.validate(n_samples)?;
    config.metric.check_points(points)?;

    let k = config.k;
    let metric = config.metric;
    let pool = build_pool(config.num_threads)?;

    tracing::info!(
        n_samples,
        n_features,
        k,
        num_threads = config.num_threads,
        metric = %metric,
        update_rule = %config.update_rule,
        "Clustering"
    );

    let mut centroids = initialize_centroids(points, k, rng);
    let mut labels = vec![UNASSIGNED; n_samples];
    let run_start = Instant::now();
    let mut n_iterations = 0;

    for iteration in 0..config.max_iters {
        let iter_start = Instant::now();

        assign_clusters(points, &centroids, &metric, &mut labels, &pool)?;

        let prev_centroids = tracing::enabled!(tracing::Level::DEBUG).then(|| centroids.clone());
        updater.update(&mut centroids, points, ArrayView1::from(&labels[..]), rng)?;
        n_iterations += 1;

        if let Some(prev_centroids) = prev_centroids {
            tracing::debug!(
                iteration = iteration + 1,
                max_iters = config.max_iters,
                shift = compute_centroid_shift(&prev_centroids, &centroids),
                time = iter_start.elapsed().as_secs_f64(),
                "Iteration done"
            );
        }
    }

    tracing::info!(
        iterations = n_iterations,
        elapsed_ms = run_start.elapsed().as_millis() as u64,
        "Clustering finished"
    );

    Ok(ClusterResult {
        assignments: Array1::from(labels),
        centroids,
        n_iterations,
    })
}

/// Build the worker pool used by the assignment phase
pub fn build_pool(num_threads: usize) -> Result<ThreadPool> {
    Ok(rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("kmeans-assign-{}", i))
        .build()?)
}

/// Initialize centroids by drawing `k` points uniformly at random, with replacement
pub fn initialize_centroids(points: &[Point], k: usize, rng: &mut dyn RngCore) -> Vec<Point> {
    let n_samples = points.len();
    (0..k)
        .map(|_| points[rng.gen_range(0..n_samples)].clone())
        .collect()
}

/// Split `0..n` into `n_parts` contiguous ranges.
///
/// Every range but the last has `n / n_parts` elements; the last absorbs the
/// remainder. Bounds are clamped to `n`.
pub fn partition_ranges(n: usize, n_parts: usize) -> Vec<Range<usize>> {
    let n_parts = n_parts.max(1);
    let chunk_size = n / n_parts;

    (0..n_parts)
        .map(|i| {
            let start = (chunk_size * i).min(n);
            let end = if i == n_parts - 1 {
                n
            } else {
                (start + chunk_size).min(n)
            };
            start..end
        })
        .collect()
}

/// Write the nearest-centroid index of every point into `labels`.
///
/// `labels` is cut into one disjoint range per pool thread and each range is
/// written by exactly one task, so no locking is needed. Returns once every
/// range is done.
pub fn assign_clusters(
    points: &[Point],
    centroids: &[Point],
    metric: &dyn Distance,
    labels: &mut [i64],
    pool: &ThreadPool,
) -> Result<()> {
    let ranges = partition_ranges(points.len(), pool.current_num_threads());
    let parts = split_disjoint(labels, &ranges);

    pool.install(|| {
        parts
            .into_par_iter()
            .zip(ranges.into_par_iter())
            .try_for_each(|(part, range)| -> Result<()> {
                for (label, point) in part.iter_mut().zip(&points[range]) {
                    *label = nearest_centroid(point.view(), centroids, metric)? as i64;
                }
                Ok(())
            })
    })
}

/// Cut `labels` into the consecutive sub-slices described by `ranges`
fn split_disjoint<'a>(mut labels: &'a mut [i64], ranges: &[Range<usize>]) -> Vec<&'a mut [i64]> {
    let mut parts = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (head, tail) = std::mem::take(&mut labels).split_at_mut(range.len());
        parts.push(head);
        labels = tail;
    }
    parts
}
