use crate::algorithm::{assign_clusters, build_pool, kmeans_fixed_iterations, ClusterResult, UNASSIGNED};
use crate::config::ClusterConfig;
use crate::error::{KMeansError, Result};
use crate::point::{check_dimensions, Point};
use ndarray::Array1;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fixed-iteration k-means with a runtime-selected metric and update rule.
///
/// The engine keeps no state between calls: every [`KMeans::cluster`] call
/// draws fresh initial centroids and returns its own [`ClusterResult`].
///
/// # Example
///
/// ```
/// use kmeans_strategies::{ClusterConfig, KMeans, Point, UpdateRule};
///
/// let points = vec![
///     Point::new(vec![0.0, 0.0]),
///     Point::new(vec![0.5, 0.0]),
///     Point::new(vec![10.0, 10.0]),
///     Point::new(vec![10.5, 10.0]),
/// ];
///
/// let config = ClusterConfig::new(2)
///     .with_max_iters(10)
///     .with_update_rule(UpdateRule::Median)
///     .with_seed(42);
///
/// let result = KMeans::with_config(config).cluster(&points).unwrap();
/// assert_eq!(result.assignments.len(), 4);
/// assert_eq!(result.centroids.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct KMeans {
    config: ClusterConfig,
}

impl KMeans {
    /// Create an engine with the default configuration and `k` clusters
    pub fn new(k: usize) -> Self {
        Self {
            config: ClusterConfig::new(k),
        }
    }

    pub fn with_config(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// Cluster `points`, drawing randomness from the configured seed.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if `points` is empty or ragged
    /// - `InvalidConfiguration` if `k` is 0 or larger than the number of points,
    ///   or `num_threads` is 0
    /// - `DegenerateMetric` if the cosine metric meets a zero-norm vector
    pub fn cluster(&self, points: &[Point]) -> Result<ClusterResult> {
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        };
        self.cluster_with_rng(points, &mut rng)
    }

    /// Cluster `points` using a caller-supplied random source.
    ///
    /// The configured seed is ignored.
    pub fn cluster_with_rng(&self, points: &[Point], rng: &mut dyn RngCore) -> Result<ClusterResult> {
        kmeans_fixed_iterations(points, &self.config, rng)
    }

    /// Assign each point to its nearest centroid under the configured metric.
    ///
    /// Runs the same parallel assignment phase used during clustering, on
    /// `num_threads` workers.
    pub fn assign(&self, points: &[Point], centroids: &[Point]) -> Result<Array1<i64>> {
        let n_features = check_dimensions(points)?;
        let centroid_features = check_dimensions(centroids)?;
        if centroid_features != n_features {
            return Err(KMeansError::DimensionMismatch(format!(
                "Expected {} features, got {}",
                centroid_features, n_features
            )));
        }
        if self.config.num_threads == 0 {
            return Err(KMeansError::InvalidConfiguration(
                "num_threads must be at least 1".to_string(),
            ));
        }
        self.config.metric.check_points(points)?;
        self.config.metric.check_points(centroids)?;

        let pool = build_pool(self.config.num_threads)?;
        let mut labels = vec![UNASSIGNED; points.len()];
        assign_clusters(points, centroids, &self.config.metric, &mut labels, &pool)?;

        Ok(Array1::from(labels))
    }

    /// Get the number of clusters
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the configuration
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Metric;
    use crate::update::UpdateRule;

    fn two_blobs() -> Vec<Point> {
        vec![
            Point::new(vec![0.0, 0.0]),
            Point::new(vec![0.2, 0.1]),
            Point::new(vec![0.1, 0.3]),
            Point::new(vec![10.0, 10.0]),
            Point::new(vec![10.2, 9.9]),
            Point::new(vec![9.8, 10.1]),
        ]
    }

    #[test]
    fn test_kmeans_new() {
        let kmeans = KMeans::new(10);
        assert_eq!(kmeans.k(), 10);
        assert_eq!(kmeans.config().max_iters, 100);
    }

    #[test]
    fn test_cluster_seeded_is_deterministic() {
        let config = ClusterConfig::new(2).with_max_iters(5).with_seed(7);
        let kmeans = KMeans::with_config(config);

        let a = kmeans.cluster(&two_blobs()).unwrap();
        let b = kmeans.cluster(&two_blobs()).unwrap();

        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.centroids, b.centroids);
    }

    #[test]
    fn test_cluster_unseeded_runs() {
        let kmeans = KMeans::with_config(ClusterConfig::new(2).with_max_iters(3));
        let result = kmeans.cluster(&two_blobs()).unwrap();
        assert_eq!(result.assignments.len(), 6);
    }

    #[test]
    fn test_cluster_k_zero() {
        let result = KMeans::new(0).cluster(&two_blobs());
        assert!(matches!(result, Err(KMeansError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_assign() {
        let kmeans = KMeans::new(2);
        let centroids = vec![Point::new(vec![0.0, 0.0]), Point::new(vec![10.0, 10.0])];
        let points = vec![Point::new(vec![1.0, 1.0]), Point::new(vec![9.0, 9.0])];

        let labels = kmeans.assign(&points, &centroids).unwrap();
        assert_eq!(labels.to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_assign_dimension_mismatch() {
        let kmeans = KMeans::new(1);
        let centroids = vec![Point::new(vec![0.0, 0.0, 0.0])];
        let points = vec![Point::new(vec![1.0, 1.0])];

        let result = kmeans.assign(&points, &centroids);
        assert!(matches!(result, Err(KMeansError::DimensionMismatch(_))));
    }

    #[test]
    fn test_cosine_rejects_zero_point() {
        let mut points = two_blobs();
        points[0] = Point::new(vec![0.0, 0.0]);
        let config = ClusterConfig::new(2)
            .with_metric(Metric::Cosine)
            .with_update_rule(UpdateRule::WeightedReseed)
            .with_seed(1);

        let result = KMeans::with_config(config).cluster(&points);
        assert!(matches!(result, Err(KMeansError::DegenerateMetric(_))));
    }
}
