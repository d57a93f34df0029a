//! Model
//!
//! The query contract shared by tree-based models. Each algorithm
//! implements this trait independently, so callers can drive any of them
//! through the same two operations without caring how the tree was grown.
use crate::data::DataValue;
use crate::errors::CartError;

/// A fitted model that can predict for rows of an output data source.
pub trait DecisionModel {
    /// Predict a categorical distribution for one output row: each distinct
    /// value of the dependent column observed in the matching training
    /// partition, with its occurrence count.
    fn classify(&self, output_row: usize, dependent_column: usize)
        -> Result<Vec<(DataValue, usize)>, CartError>;

    /// Predict a numeric estimate for one output row: the mean of the
    /// dependent column over the matching training partition, and the
    /// fraction of training rows that partition covers.
    fn regress(&self, output_row: usize, dependent_column: usize) -> Result<(f64, f64), CartError>;
}
