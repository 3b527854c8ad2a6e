use crate::distance::Metric;
use crate::error::{KMeansError, Result};
use crate::update::UpdateRule;

/// Configuration for a clustering run
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Number of clusters
    pub k: usize,

    /// Number of assign/update cycles. Every cycle runs; there is no early stop
    pub max_iters: usize,

    /// Number of worker threads used during the assignment phase
    pub num_threads: usize,

    /// Distance used for assignment and by distance-weighted update rules
    pub metric: Metric,

    /// How centroids are recomputed after each assignment phase
    pub update_rule: UpdateRule,

    /// Random seed for centroid initialization and reseeding.
    /// `None` seeds from system entropy, so runs are not reproducible.
    pub seed: Option<u64>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            k: 3,
            max_iters: 100,
            num_threads: 2,
            metric: Metric::Euclidean,
            update_rule: UpdateRule::Mean,
            seed: None,
        }
    }
}

impl ClusterConfig {
    /// Create a new configuration with the specified number of clusters
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the number of assignment workers
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Set the distance metric
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the centroid-update rule
    pub fn with_update_rule(mut self, update_rule: UpdateRule) -> Self {
        self.update_rule = update_rule;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration against a point set of `n_points` points
    pub fn validate(&self, n_points: usize) -> Result<()> {
        if self.k == 0 {
            return Err(KMeansError::InvalidConfiguration(
                "k must be greater than 0".to_string(),
            ));
        }

        if self.k > n_points {
            return Err(KMeansError::InvalidConfiguration(format!(
                "k ({}) is greater than the number of points ({})",
                self.k, n_points
            )));
        }

        if self.num_threads == 0 {
            return Err(KMeansError::InvalidConfiguration(
                "num_threads must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
