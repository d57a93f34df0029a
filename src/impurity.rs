//! Impurity
//!
//! Gini impurity and information gain, the split quality measures driving
//! the CART split search.
use crate::data::DataSource;
use crate::errors::CartError;
use crate::utils::value_counts;

/// Compute the Gini impurity of `column` over the given rows.
///
/// The impurity is `1 - sum(p_i^2)` over the observed frequency `p_i` of
/// each distinct value, the likelihood of picking the wrong class when
/// drawing from the observed distribution. Zero means the rows are pure.
/// An empty row set has no distribution to be uncertain about and counts
/// as zero.
pub fn gini_impurity(source: &dyn DataSource, rows: &[usize], column: usize) -> Result<f64, CartError> {
    if rows.is_empty() {
        return Ok(0.0);
    }
    let counts = value_counts(source, rows, column)?;
    let total = rows.len() as f64;
    let mut impurity = 1.0;
    for (_, count) in counts {
        let p = count as f64 / total;
        impurity -= p * p;
    }
    Ok(impurity)
}

/// Compute the information gain of a proposed split of a row set.
///
/// The gain is the impurity before the split minus the average impurity of
/// the two sides, weighted by their relative sizes. A positive gain means
/// the split decreases uncertainty, zero or negative means it is useless.
///
/// * `true_rows` - Rows that matched the split criterion.
/// * `false_rows` - Rows that did not match the split criterion.
/// * `column` - The column the split criterion tests.
/// * `impurity_before` - Impurity of the whole row set on `column`.
pub fn information_gain(
    source: &dyn DataSource,
    true_rows: &[usize],
    false_rows: &[usize],
    column: usize,
    impurity_before: f64,
) -> Result<f64, CartError> {
    let total = (true_rows.len() + false_rows.len()) as f64;
    if total == 0.0 {
        return Ok(0.0);
    }
    let weight = true_rows.len() as f64 / total;
    let impurity_after = weight * gini_impurity(source, true_rows, column)?
        + (1.0 - weight) * gini_impurity(source, false_rows, column)?;
    Ok(impurity_before - impurity_after)
}
