//! Loading tabular training data.
//!
//! [`load_csv`] reads a headered CSV file into a feature matrix and a label
//! vector, splitting out one named target column. Empty fields become NaN so
//! that a [`SimpleImputer`](crate::preprocessing::SimpleImputer) stage can
//! fill them downstream.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use std::path::Path;
use thiserror::Error;

/// Error type for dataset loading.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// I/O error while reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The requested target column is not in the header.
    #[error("target column '{0}' not found in header")]
    MissingTargetColumn(String),

    /// A non-empty field failed to parse as a number.
    #[error("row {row}, column '{column}': cannot parse '{value}' as a number")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    /// The file contains a header but no data rows, or no feature columns.
    #[error("empty dataset: {0}")]
    EmptyDataset(String),
}

/// Load a headered CSV file into `(features, labels)`.
///
/// The column named `target_column` becomes the label vector; every other
/// column, in file order, becomes a feature column. Empty fields are read as
/// NaN.
///
/// # Errors
/// Fails on I/O or CSV errors, an unknown target column, unparseable
/// numeric fields, or a file with no data rows or no feature columns.
pub fn load_csv<B: Backend>(
    path: impl AsRef<Path>,
    target_column: &str,
) -> Result<(Tensor2D<B>, Tensor1D<B>), DatasetError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let target_idx = headers
        .iter()
        .position(|h| h == target_column)
        .ok_or_else(|| DatasetError::MissingTargetColumn(target_column.to_string()))?;

    if headers.len() < 2 {
        return Err(DatasetError::EmptyDataset(
            "need at least one feature column besides the target".to_string(),
        ));
    }

    let parse_field = |row: usize, col: usize, raw: &str| -> Result<f64, DatasetError> {
        if raw.is_empty() {
            return Ok(f64::NAN);
        }
        raw.trim().parse::<f64>().map_err(|_| DatasetError::Parse {
            row,
            column: headers[col].clone(),
            value: raw.to_string(),
        })
    };

    let mut features = Vec::new();
    let mut labels = Vec::new();
    let mut rows = 0;
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        for (col_idx, raw) in record.iter().enumerate() {
            let value = parse_field(row_idx, col_idx, raw)?;
            if col_idx == target_idx {
                labels.push(value);
            } else {
                features.push(value);
            }
        }
        rows += 1;
    }

    if rows == 0 {
        return Err(DatasetError::EmptyDataset(
            "no data rows after the header".to_string(),
        ));
    }

    let cols = headers.len() - 1;
    Ok((Tensor2D::new(features, rows, cols), Tensor1D::new(labels)))
}
