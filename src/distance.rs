use crate::error::{KMeansError, Result};
use crate::point::Point;
use ndarray::ArrayView1;
use std::fmt;
use std::str::FromStr;

/// A distance between two equal-dimension coordinate vectors.
///
/// Implementations must be symmetric, non-negative and zero for identical
/// inputs (within floating tolerance).
pub trait Distance: Send + Sync {
    fn compute(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64>;
}

/// Straight-line (L2) distance
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl Distance for Euclidean {
    #[inline]
    fn compute(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64> {
        Ok(squared_euclidean(a, b).sqrt())
    }
}

/// `1 - cos(a, b)`. Undefined when either vector has zero norm
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl Distance for Cosine {
    #[inline]
    fn compute(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64> {
        let norm_a = a.dot(&a).sqrt();
        let norm_b = b.dot(&b).sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return Err(KMeansError::DegenerateMetric(
                "cosine distance is undefined for a zero-norm vector".to_string(),
            ));
        }

        let similarity = a.dot(&b) / (norm_a * norm_b);
        Ok((1.0 - similarity).max(0.0))
    }
}

/// Runtime selection of a distance metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    Euclidean,
    Cosine,
}

impl Metric {
    /// Check the preconditions this metric places on the input points.
    ///
    /// Cosine requires every point to have a non-zero norm.
    pub fn check_points(&self, points: &[Point]) -> Result<()> {
        if let Metric::Cosine = self {
            if let Some(idx) = points.iter().position(|p| p.squared_norm() == 0.0) {
                return Err(KMeansError::DegenerateMetric(format!(
                    "point {} is the zero vector; cosine distance is undefined",
                    idx
                )));
            }
        }
        Ok(())
    }
}

impl Distance for Metric {
    #[inline]
    fn compute(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64> {
        match self {
            Metric::Euclidean => Euclidean.compute(a, b),
            Metric::Cosine => Cosine.compute(a, b),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Euclidean => write!(f, "euclidean"),
            Metric::Cosine => write!(f, "cosine"),
        }
    }
}

impl FromStr for Metric {
    type Err = KMeansError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Ok(Metric::Euclidean),
            "cosine" => Ok(Metric::Cosine),
            other => Err(KMeansError::InvalidConfiguration(format!(
                "unknown distance metric '{}'",
                other
            ))),
        }
    }
}

/// Squared L2 distance between two coordinate vectors
#[inline]
pub fn squared_euclidean(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Find the index of the centroid closest to `point`.
///
/// Centroids are scanned in index order with a strict `<` comparison, so the
/// lowest index wins a tie.
#[inline]
pub fn nearest_centroid(
    point: ArrayView1<f64>,
    centroids: &[Point],
    metric: &dyn Distance,
) -> Result<usize> {
    let mut best_label = 0;
    let mut best_dist = f64::INFINITY;

    for (j, centroid) in centroids.iter().enumerate() {
        let dist = metric.compute(point, centroid.view())?;
        if dist < best_dist {
            best_dist = dist;
            best_label = j;
        }
    }

    Ok(best_label)
}

/// Compute centroid shift (sum of L2 norms of centroid movements)
pub fn compute_centroid_shift(old_centroids: &[Point], new_centroids: &[Point]) -> f64 {
    old_centroids
        .iter()
        .zip(new_centroids.iter())
        .map(|(old_c, new_c)| squared_euclidean(old_c.view(), new_c.view()).sqrt())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_euclidean_distance() {
        let a = array![0.0, 0.0];
        let b = array![3.0, 4.0];
        assert_relative_eq!(Euclidean.compute(a.view(), b.view()).unwrap(), 5.0);
        assert_relative_eq!(Euclidean.compute(b.view(), a.view()).unwrap(), 5.0);
        assert_relative_eq!(Euclidean.compute(b.view(), b.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_distance() {
        let a = array![1.0, 0.0];
        let b = array![0.0, 2.0];
        let c = array![-3.0, 0.0];

        assert_relative_eq!(Cosine.compute(a.view(), b.view()).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(Cosine.compute(a.view(), c.view()).unwrap(), 2.0, epsilon = 1e-12);
        // Scale does not matter
        let d = array![5.0, 0.0];
        assert_relative_eq!(Cosine.compute(a.view(), d.view()).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cosine_identical_is_non_negative() {
        let a = array![0.1, 0.7, 0.3];
        let dist = Cosine.compute(a.view(), a.view()).unwrap();
        assert!(dist >= 0.0);
        assert_relative_eq!(dist, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = array![0.0, 0.0];
        let b = array![1.0, 1.0];
        assert!(matches!(
            Cosine.compute(a.view(), b.view()),
            Err(KMeansError::DegenerateMetric(_))
        ));
        assert!(matches!(
            Metric::Cosine.compute(b.view(), a.view()),
            Err(KMeansError::DegenerateMetric(_))
        ));
    }

    #[test]
    fn test_metric_check_points() {
        let points = vec![Point::new(vec![1.0, 0.0]), Point::new(vec![0.0, 0.0])];
        assert!(Metric::Euclidean.check_points(&points).is_ok());
        assert!(matches!(
            Metric::Cosine.check_points(&points),
            Err(KMeansError::DegenerateMetric(_))
        ));
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("Euclidean".parse::<Metric>().unwrap(), Metric::Euclidean);
        assert_eq!("cosine".parse::<Metric>().unwrap(), Metric::Cosine);
        assert!("manhattan".parse::<Metric>().is_err());
        assert_eq!(Metric::Cosine.to_string(), "cosine");
    }

    #[test]
    fn test_nearest_centroid() {
        let centroids = vec![Point::new(vec![0.0, 0.0]), Point::new(vec![10.0, 10.0])];

        let near_first = array![1.0, 1.0];
        let near_second = array![9.0, 9.0];
        assert_eq!(nearest_centroid(near_first.view(), &centroids, &Euclidean).unwrap(), 0);
        assert_eq!(nearest_centroid(near_second.view(), &centroids, &Euclidean).unwrap(), 1);
    }

    #[test]
    fn test_nearest_centroid_tie_prefers_lower_index() {
        let centroids = vec![
            Point::new(vec![-1.0, 0.0]),
            Point::new(vec![0.0, 5.0]),
            Point::new(vec![1.0, 0.0]),
        ];
        let point = array![0.0, 0.0];
        assert_eq!(nearest_centroid(point.view(), &centroids, &Euclidean).unwrap(), 0);
    }

    #[test]
    fn test_centroid_shift() {
        let old = vec![Point::new(vec![0.0, 0.0]), Point::new(vec![1.0, 1.0])];
        let new = vec![Point::new(vec![1.0, 0.0]), Point::new(vec![1.0, 1.0])];

        let shift = compute_centroid_shift(&old, &new);
        assert_relative_eq!(shift, 1.0, epsilon = 1e-12);
    }
}
