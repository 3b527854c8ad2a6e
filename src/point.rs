use crate::error::{KMeansError, Result};
use ndarray::{Array1, ArrayView1};

/// A fixed-dimension coordinate vector with an optional pass-through label.
///
/// The label never takes part in any computation; it only travels with the
/// coordinates so that results can be reported against the original rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    coordinates: Array1<f64>,
    label: Option<String>,
}

impl Point {
    /// Create an unlabelled point
    pub fn new(coordinates: Vec<f64>) -> Self {
        Self {
            coordinates: Array1::from(coordinates),
            label: None,
        }
    }

    /// Create a point carrying a label
    pub fn with_label(coordinates: Vec<f64>, label: impl Into<String>) -> Self {
        Self {
            coordinates: Array1::from(coordinates),
            label: Some(label.into()),
        }
    }

    /// Wrap an existing coordinate array
    pub fn from_array(coordinates: Array1<f64>, label: Option<String>) -> Self {
        Self { coordinates, label }
    }

    /// Read-only view of the coordinates
    #[inline]
    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.coordinates.view()
    }

    /// Owned coordinate array, e.g. for indexing by dimension
    pub fn coordinates(&self) -> &Array1<f64> {
        &self.coordinates
    }

    /// Replace the coordinates in place, keeping the label
    pub fn set_coordinates(&mut self, coordinates: Array1<f64>) {
        self.coordinates = coordinates;
    }

    /// Pass-through label, if the point carries one
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Number of coordinates
    #[inline]
    pub fn dim(&self) -> usize {
        self.coordinates.len()
    }

    /// Squared L2 norm of the coordinates
    #[inline]
    pub fn squared_norm(&self) -> f64 {
        self.coordinates.dot(&self.coordinates)
    }
}

impl From<Vec<f64>> for Point {
    fn from(coordinates: Vec<f64>) -> Self {
        Point::new(coordinates)
    }
}

/// Check that the point set is non-empty and every point shares one dimension `D > 0`.
///
/// Returns `D` on success.
pub fn check_dimensions(points: &[Point]) -> Result<usize> {
    let first = points.first().ok_or_else(|| {
        KMeansError::DimensionMismatch("point set is empty".to_string())
    })?;

    let dim = first.dim();
    if dim == 0 {
        return Err(KMeansError::DimensionMismatch(
            "points must have at least one coordinate".to_string(),
        ));
    }

    if let Some((idx, point)) = points.iter().enumerate().find(|(_, p)| p.dim() != dim) {
        return Err(KMeansError::DimensionMismatch(format!(
            "point {} has {} coordinates, expected {}",
            idx,
            point.dim(),
            dim
        )));
    }

    Ok(dim)
}
