//! Errors
//!
//! Custom error types used throughout the `cartree` crate.
use thiserror::Error;

/// Errors that can occur while building or querying a CART model.
#[derive(Debug, Error)]
pub enum CartError {
    /// The model was constructed without any predictor columns.
    #[error("The training feature id list is empty, at least one predictor column is required.")]
    NoFeatures,
    /// Training and output feature id lists cannot be paired up.
    #[error("Mismatched feature id lists, {0} training columns but {1} output columns.")]
    FeatureLengthMismatch(usize, usize),
    /// A split criterion references a training column with no output-side counterpart.
    #[error("Training column {0} has no mapped column in the output data source.")]
    MissingColumnMapping(usize),
    /// A row id outside the data source was requested.
    #[error("Row {0} is out of range for a data source with {1} rows.")]
    RowOutOfRange(usize, usize),
    /// A column id outside the data source was requested.
    #[error("Column {0} is out of range for a data source with {1} columns.")]
    ColumnOutOfRange(usize, usize),
}
