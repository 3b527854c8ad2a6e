use thiserror::Error;

/// Error types for the kmeans-strategies library
#[derive(Error, Debug)]
pub enum KMeansError {
    /// The cluster configuration is unusable (k out of range, no worker threads)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The point set is empty or points disagree in coordinate count
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A distance was requested that is undefined for its inputs
    #[error("Degenerate metric: {0}")]
    DegenerateMetric(String),

    /// The assignment worker pool could not be created
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// A field in a delimited input could not be read as a coordinate
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenient alias for results produced by this crate
pub type Result<T> = std::result::Result<T, KMeansError>;
