//! Delimited-text loading of points and writing of cluster assignments.
//!
//! These sit outside the clustering engine: the engine only sees `&[Point]`
//! and hands back a [`ClusterResult`].

use crate::algorithm::ClusterResult;
use crate::error::{KMeansError, Result};
use crate::point::Point;
use crate::update::group_members;
use std::io::{Read, Write};
use std::path::Path;

/// How to interpret the columns of a delimited point file
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Skip the first row
    pub has_header: bool,

    /// Column holding the point label, if any
    pub label_column: Option<usize>,

    /// Columns that are neither coordinates nor the label (e.g. a row id)
    pub ignore_columns: Vec<usize>,

    /// Field delimiter
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: false,
            label_column: None,
            ignore_columns: Vec::new(),
            delimiter: b',',
        }
    }
}

/// Read points from a delimited text file
pub fn read_points<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Vec<Point>> {
    let file = std::fs::File::open(path)?;
    read_points_from(file, options)
}

/// Read points from any delimited text source.
///
/// Every column that is not the label column and not ignored is parsed as an
/// `f64` coordinate. Rows that end up with no coordinates are skipped. Rows
/// of differing width are accepted here; the engine rejects them.
pub fn read_points_from<R: Read>(reader: R, options: &CsvOptions) -> Result<Vec<Point>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(options.has_header)
        .delimiter(options.delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    for (row_idx, record) in rdr.records().enumerate() {
        let record = record?;
        let mut coordinates = Vec::with_capacity(record.len());
        let mut label = None;

        for (col, field) in record.iter().enumerate() {
            if options.label_column == Some(col) {
                label = Some(field.to_string());
            } else if !options.ignore_columns.contains(&col) {
                let value = field.parse::<f64>().map_err(|e| {
                    KMeansError::Parse(format!(
                        "row {}, column {}: '{}' is not a number ({})",
                        row_idx, col, field, e
                    ))
                })?;
                coordinates.push(value);
            }
        }

        if coordinates.is_empty() {
            continue;
        }

        points.push(match label {
            Some(label) => Point::with_label(coordinates, label),
            None => Point::new(coordinates),
        });
    }

    tracing::debug!(n_points = points.len(), "Loaded points");
    Ok(points)
}

/// Write every assigned point, grouped by cluster in index order.
///
/// Each row is `label, x1, ..., xD, cluster` with a 1-based cluster id; the
/// label field is left out for unlabelled points. Unassigned points are not
/// written.
pub fn write_assignments<W: Write>(
    writer: W,
    points: &[Point],
    result: &ClusterResult,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_writer(writer);

    let members = group_members(result.assignments.view(), result.centroids.len());
    for (cluster_idx, members) in members.iter().enumerate() {
        for &i in members {
            let point = &points[i];
            let mut row: Vec<String> = Vec::with_capacity(point.dim() + 2);
            if let Some(label) = point.label().filter(|l| !l.is_empty()) {
                row.push(label.to_string());
            }
            row.extend(point.coordinates().iter().map(f64::to_string));
            row.push((cluster_idx + 1).to_string());
            wtr.write_record(&row)?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::UNASSIGNED;
    use ndarray::Array1;

    #[test]
    fn test_read_points_with_label_and_ignored_column() {
        let input = "id,a,b,species\n0,1.5,2.0,setosa\n1,3.0,4.5,virginica\n";
        let options = CsvOptions {
            has_header: true,
            label_column: Some(3),
            ignore_columns: vec![0],
            ..Default::default()
        };

        let points = read_points_from(input.as_bytes(), &options).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].coordinates().to_vec(), vec![1.5, 2.0]);
        assert_eq!(points[0].label(), Some("setosa"));
        assert_eq!(points[1].label(), Some("virginica"));
    }

    #[test]
    fn test_read_points_skips_rows_without_coordinates() {
        let input = "7\n1,2\n";
        let options = CsvOptions {
            ignore_columns: vec![0],
            ..Default::default()
        };

        let points = read_points_from(input.as_bytes(), &options).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].coordinates().to_vec(), vec![2.0]);
    }

    #[test]
    fn test_read_points_parse_error() {
        let input = "1.0,abc\n";
        let result = read_points_from(input.as_bytes(), &CsvOptions::default());
        match result {
            Err(KMeansError::Parse(msg)) => assert!(msg.contains("column 1")),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_points_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1;2").unwrap();
        writeln!(file, "3;4").unwrap();

        let options = CsvOptions {
            delimiter: b';',
            ..Default::default()
        };
        let points = read_points(file.path(), &options).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].coordinates().to_vec(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_write_assignments_grouped_by_cluster() {
        let points = vec![
            Point::with_label(vec![1.0, 2.0], "a"),
            Point::new(vec![3.0, 4.0]),
            Point::with_label(vec![5.0, 6.0], "c"),
            Point::new(vec![7.0, 8.0]),
        ];
        let result = ClusterResult {
            assignments: Array1::from(vec![1, 0, 1, UNASSIGNED]),
            centroids: vec![Point::new(vec![0.0, 0.0]), Point::new(vec![1.0, 1.0])],
            n_iterations: 1,
        };

        let mut out = Vec::new();
        write_assignments(&mut out, &points, &result).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "3,4,1\na,1,2,2\nc,5,6,2\n");
    }
}
