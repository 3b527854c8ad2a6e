use crate::distance::{Distance, Metric};
use crate::error::{KMeansError, Result};
use crate::point::Point;
use ndarray::{Array1, Array2, ArrayView1};
use rand::{Rng, RngCore};
use std::fmt;
use std::str::FromStr;

/// Recomputes all `k` centroids from the current assignments.
///
/// `centroids.len()` is `k`. `assignments[i]` names the cluster owning
/// `points[i]`; entries outside `0..k` are ignored. Each cluster is handled
/// independently: a failure on one cluster leaves that centroid untouched and
/// does not stop the others from being updated. The first failure, if any,
/// is returned once every cluster has been visited.
pub trait CentroidUpdater: Send + Sync {
    fn update(
        &self,
        centroids: &mut [Point],
        points: &[Point],
        assignments: ArrayView1<i64>,
        rng: &mut dyn RngCore,
    ) -> Result<()>;
}

/// Lloyd's rule: each centroid moves to the arithmetic mean of its members.
/// A cluster with no members keeps its centroid.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanUpdater;

impl CentroidUpdater for MeanUpdater {
    fn update(
        &self,
        centroids: &mut [Point],
        points: &[Point],
        assignments: ArrayView1<i64>,
        _rng: &mut dyn RngCore,
    ) -> Result<()> {
        let k = centroids.len();
        let Some(n_features) = centroids.first().map(Point::dim) else {
            return Ok(());
        };

        // Accumulators for new centroids
        let mut cluster_sums: Array2<f64> = Array2::zeros((k, n_features));
        let mut cluster_counts: Array1<f64> = Array1::zeros(k);

        for (point, &label) in points.iter().zip(assignments.iter()) {
            let Some(cluster_idx) = cluster_index(label, k) else {
                continue;
            };
            cluster_counts[cluster_idx] += 1.0;
            let mut sum = cluster_sums.row_mut(cluster_idx);
            sum += &point.view();
        }

        for (cluster_idx, centroid) in centroids.iter_mut().enumerate() {
            let count = cluster_counts[cluster_idx];
            if count > 0.0 {
                centroid.set_coordinates(cluster_sums.row(cluster_idx).mapv(|s| s / count));
            } else {
                tracing::debug!(cluster = cluster_idx, "empty cluster keeps its centroid");
            }
        }

        Ok(())
    }
}

/// Replaces each centroid with one of its own members, drawn with probability
/// proportional to the member's squared distance from the current centroid.
///
/// The chosen member is copied verbatim, label included. A cluster whose
/// total weight is zero (no members, or every member sits on the centroid)
/// keeps its centroid.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedReseedUpdater {
    metric: Metric,
}

impl WeightedReseedUpdater {
    pub fn new(metric: Metric) -> Self {
        Self { metric }
    }

    fn reseed_cluster(
        &self,
        centroid: &Point,
        members: &[usize],
        points: &[Point],
        rng: &mut dyn RngCore,
    ) -> Result<Option<usize>> {
        let weights = members
            .iter()
            .map(|&i| -> Result<f64> {
                let dist = self.metric.compute(points[i].view(), centroid.view())?;
                Ok(dist * dist)
            })
            .collect::<Result<Vec<f64>>>()?;

        let total_weight: f64 = weights.iter().sum();
        if total_weight <= 0.0 || !total_weight.is_finite() {
            return Ok(None);
        }

        // Inverse-CDF walk over the members in index order. `r` is uniform on
        // [0, total_weight) and never overflows, even for totals near f64::MAX
        let mut remainder = rng.gen::<f64>() * total_weight;
        for (&member, &weight) in members.iter().zip(weights.iter()) {
            if remainder < weight {
                return Ok(Some(member));
            }
            remainder -= weight;
        }

        // Rounding left a sliver of weight unconsumed
        Ok(members
            .iter()
            .zip(weights.iter())
            .rev()
            .find(|(_, &w)| w > 0.0)
            .map(|(&member, _)| member))
    }
}

impl CentroidUpdater for WeightedReseedUpdater {
    fn update(
        &self,
        centroids: &mut [Point],
        points: &[Point],
        assignments: ArrayView1<i64>,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        let members = group_members(assignments, centroids.len());
        let mut first_error = None;

        for (cluster_idx, (centroid, members)) in centroids.iter_mut().zip(members).enumerate() {
            match self.reseed_cluster(centroid, &members, points, rng) {
                Ok(Some(chosen)) => *centroid = points[chosen].clone(),
                Ok(None) => {
                    tracing::debug!(
                        cluster = cluster_idx,
                        members = members.len(),
                        "zero reseed weight, centroid unchanged"
                    );
                }
                Err(e) => {
                    tracing::warn!(cluster = cluster_idx, error = %e, "reseed failed, centroid unchanged");
                    first_error.get_or_insert(e);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

/// Each centroid coordinate becomes the median of that coordinate over the
/// cluster's members, dimension by dimension. Even counts average the two
/// middle values. A cluster with no members keeps its centroid.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianUpdater;

impl CentroidUpdater for MedianUpdater {
    fn update(
        &self,
        centroids: &mut [Point],
        points: &[Point],
        assignments: ArrayView1<i64>,
        _rng: &mut dyn RngCore,
    ) -> Result<()> {
        let members = group_members(assignments, centroids.len());

        for (cluster_idx, (centroid, members)) in centroids.iter_mut().zip(members).enumerate() {
            if members.is_empty() {
                tracing::debug!(cluster = cluster_idx, "empty cluster keeps its centroid");
                continue;
            }

            let mut column = Vec::with_capacity(members.len());
            let medians: Array1<f64> = (0..centroid.dim())
                .map(|j| {
                    column.clear();
                    column.extend(members.iter().map(|&i| points[i].coordinates()[j]));
                    median(&mut column)
                })
                .collect();

            centroid.set_coordinates(medians);
        }

        Ok(())
    }
}

/// Median of a non-empty slice. The slice is sorted in place
fn median(values: &mut [f64]) -> f64 {
    values.sort_unstable_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[inline]
fn cluster_index(label: i64, k: usize) -> Option<usize> {
    usize::try_from(label).ok().filter(|&c| c < k)
}

/// Group point indices by the cluster they are assigned to, in index order
pub fn group_members(assignments: ArrayView1<i64>, k: usize) -> Vec<Vec<usize>> {
    let mut members = vec![Vec::new(); k];
    for (i, &label) in assignments.iter().enumerate() {
        if let Some(c) = cluster_index(label, k) {
            members[c].push(i);
        }
    }
    members
}

/// Runtime selection of a centroid-update rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateRule {
    #[default]
    Mean,
    WeightedReseed,
    Median,
}

impl UpdateRule {
    /// Build the updater for this rule. Rules that measure distances use `metric`
    pub fn updater(&self, metric: Metric) -> Box<dyn CentroidUpdater> {
        match self {
            UpdateRule::Mean => Box::new(MeanUpdater),
            UpdateRule::WeightedReseed => Box::new(WeightedReseedUpdater::new(metric)),
            UpdateRule::Median => Box::new(MedianUpdater),
        }
    }
}

impl fmt::Display for UpdateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateRule::Mean => write!(f, "mean"),
            UpdateRule::WeightedReseed => write!(f, "weighted-reseed"),
            UpdateRule::Median => write!(f, "median"),
        }
    }
}

impl FromStr for UpdateRule {
    type Err = KMeansError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mean" | "lloyd" | "lloyds" => Ok(UpdateRule::Mean),
            "weighted-reseed" | "weighted_reseed" | "kpp" => Ok(UpdateRule::WeightedReseed),
            "median" => Ok(UpdateRule::Median),
            other => Err(KMeansError::InvalidConfiguration(format!(
                "unknown update rule '{}'",
                other
            ))),
        }
    }
}
