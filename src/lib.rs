//! # kmeans-strategies
//!
//! Fixed-iteration k-means clustering in Rust with interchangeable distance
//! metrics and centroid-update rules.
//!
//! ## Features
//!
//! - **Parallel assignment**: points are split into disjoint contiguous ranges,
//!   one per worker of a dedicated rayon pool; no locking on the assignment array
//! - **Pluggable metrics**: Euclidean and cosine distance behind the [`Distance`] trait
//! - **Pluggable update rules**: Lloyd's mean, distance-weighted reseeding and
//!   coordinate-wise median behind the [`CentroidUpdater`] trait
//! - **Reproducible**: initialization and reseeding draw from a seedable
//!   `ChaCha8Rng`, or from any injected `RngCore`
//! - **Deterministic assignment**: results do not depend on the thread count
//!
//! ## Example
//!
//! ```rust
//! use kmeans_strategies::{ClusterConfig, KMeans, Metric, Point, UpdateRule};
//!
//! let points: Vec<Point> = (0..100)
//!     .map(|i| Point::new(vec![(i % 10) as f64, (i / 10) as f64]))
//!     .collect();
//!
//! let config = ClusterConfig::new(4)
//!     .with_max_iters(20)
//!     .with_num_threads(4)
//!     .with_metric(Metric::Euclidean)
//!     .with_update_rule(UpdateRule::Mean)
//!     .with_seed(42);
//!
//! let result = KMeans::with_config(config).cluster(&points).unwrap();
//! assert_eq!(result.assignments.len(), 100);
//! assert_eq!(result.centroids.len(), 4);
//! ```
//!
//! ## Iteration count
//!
//! Exactly `max_iters` assign/update cycles are run; there is no convergence
//! check. With `max_iters = 0` the centroids are the initial random picks and
//! every assignment is [`UNASSIGNED`].

mod algorithm;
mod config;
mod distance;
mod error;
pub mod io;
mod kmeans;
mod point;
mod update;

pub use algorithm::{ClusterResult, UNASSIGNED};
pub use config::ClusterConfig;
pub use distance::{Cosine, Distance, Euclidean, Metric};
pub use error::{KMeansError, Result};
pub use kmeans::KMeans;
pub use point::Point;
pub use update::{
    CentroidUpdater, MeanUpdater, MedianUpdater, UpdateRule, WeightedReseedUpdater,
};
