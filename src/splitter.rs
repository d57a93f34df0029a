//! Splitter
//!
//! Split criteria, the row partitioning operation, and the search for the
//! criterion with maximum information gain.
use crate::data::{DataSource, DataValue};
use crate::errors::CartError;
use crate::impurity::{gini_impurity, information_gain};
use crate::utils::{decimate, unique_values};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// The test a split criterion applies to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitKind {
    /// Equality against one discrete value, for categorical columns.
    Equality,
    /// A "less than or equal" test against a threshold, for continuous columns.
    Threshold,
}

/// A binary test on one column, the payload of a decision node.
///
/// The test kind is fixed when the criterion is created, from the column's
/// declared kind, and never re-derived afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitCriterion {
    /// The tested column, in training data column space.
    pub column: usize,
    /// The value compared against.
    pub value: DataValue,
    /// Which test applies.
    pub kind: SplitKind,
}

impl SplitCriterion {
    /// Create a criterion for `column`, choosing the test kind from the
    /// column's declared kind in `source`.
    pub fn new(source: &dyn DataSource, column: usize, value: DataValue) -> Self {
        let kind = if source.is_continuous(column) {
            SplitKind::Threshold
        } else {
            SplitKind::Equality
        };
        SplitCriterion { column, value, kind }
    }

    /// Test a single value against the criterion.
    pub fn matches(&self, value: DataValue) -> bool {
        match self.kind {
            SplitKind::Equality => value == self.value,
            SplitKind::Threshold => value <= self.value,
        }
    }
}

impl Display for SplitCriterion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            SplitKind::Equality => write!(f, "[{} == {}]", self.column, self.value),
            SplitKind::Threshold => write!(f, "[{} <= {}]", self.column, self.value),
        }
    }
}

/// Partition rows into the subset matching the criterion and the rest.
///
/// Relative row order is preserved on both sides. Either side may come out
/// empty, callers treat that as a terminal condition rather than an error.
pub fn split(
    source: &dyn DataSource,
    rows: &[usize],
    criterion: &SplitCriterion,
) -> Result<(Vec<usize>, Vec<usize>), CartError> {
    let mut true_rows = Vec::new();
    let mut false_rows = Vec::new();
    for &row in rows {
        if criterion.matches(source.value(row, criterion.column)?) {
            true_rows.push(row);
        } else {
            false_rows.push(row);
        }
    }
    Ok((true_rows, false_rows))
}

/// Searches a row set for the split criterion with maximum information gain.
pub struct SplitFinder {
    /// Cap on the number of candidate thresholds evaluated per continuous
    /// column. Zero disables the cap.
    pub continuous_max_splits: usize,
}

impl SplitFinder {
    /// Create a new SplitFinder.
    ///
    /// * `continuous_max_splits` - Limit on candidate thresholds per
    ///     continuous column. High cardinality columns are decimated down
    ///     to this many candidates, trading threshold resolution for a
    ///     bounded search cost.
    pub fn new(continuous_max_splits: usize) -> Self {
        SplitFinder { continuous_max_splits }
    }

    /// Enumerate the candidate split values for one column: the distinct
    /// values observed in the row set, decimated to the configured cap when
    /// the column is continuous.
    pub fn candidate_values(
        &self,
        source: &dyn DataSource,
        rows: &[usize],
        column: usize,
    ) -> Result<Vec<DataValue>, CartError> {
        let mut values = unique_values(source, rows, column)?;
        if source.is_continuous(column) {
            decimate(&mut values, self.continuous_max_splits);
        }
        Ok(values)
    }

    /// Find the split of `rows` with the maximum information gain among all
    /// candidate criteria over `features`, together with that gain.
    ///
    /// Each candidate is scored against the impurity of the whole row set on
    /// the candidate's own column, so uncertainty is measured per column
    /// being split on rather than against a single designated label. Ties
    /// are broken towards the first candidate encountered, iterating
    /// features in the given order and candidate values ascending, which
    /// keeps the search deterministic.
    ///
    /// Returns `None` only for an empty row set or feature list. The
    /// returned gain may be zero or negative, the caller decides whether
    /// the split is worth taking.
    pub fn best_split(
        &self,
        source: &dyn DataSource,
        rows: &[usize],
        features: &[usize],
    ) -> Result<Option<(SplitCriterion, f64)>, CartError> {
        let mut best: Option<(SplitCriterion, f64)> = None;
        for &column in features {
            let impurity_before = gini_impurity(source, rows, column)?;
            for value in self.candidate_values(source, rows, column)? {
                let criterion = SplitCriterion::new(source, column, value);
                let (true_rows, false_rows) = split(source, rows, &criterion)?;
                let gain = information_gain(source, &true_rows, &false_rows, column, impurity_before)?;
                match best {
                    Some((_, best_gain)) if gain <= best_gain => {}
                    _ => best = Some((criterion, gain)),
                }
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryTable;

    fn mixed_table() -> MemoryTable {
        // (categorical, continuous) rows: (0, 1.0), (0, 2.0), (1, 5.0), (1, 6.0)
        MemoryTable::from_rows(
            &[
                vec![DataValue::Categorical(0), DataValue::Continuous(1.0)],
                vec![DataValue::Categorical(0), DataValue::Continuous(2.0)],
                vec![DataValue::Categorical(1), DataValue::Continuous(5.0)],
                vec![DataValue::Categorical(1), DataValue::Continuous(6.0)],
            ],
            vec![false, true],
        )
    }

    #[test]
    fn test_criterion_kind_follows_column() {
        let table = mixed_table();
        let categorical = SplitCriterion::new(&table, 0, DataValue::Categorical(0));
        assert_eq!(categorical.kind, SplitKind::Equality);
        let continuous = SplitCriterion::new(&table, 1, DataValue::Continuous(2.0));
        assert_eq!(continuous.kind, SplitKind::Threshold);
    }

    #[test]
    fn test_criterion_matches() {
        let table = mixed_table();
        let equality = SplitCriterion::new(&table, 0, DataValue::Categorical(0));
        assert!(equality.matches(DataValue::Categorical(0)));
        assert!(!equality.matches(DataValue::Categorical(1)));

        let threshold = SplitCriterion::new(&table, 1, DataValue::Continuous(2.0));
        assert!(threshold.matches(DataValue::Continuous(1.0)));
        assert!(threshold.matches(DataValue::Continuous(2.0)));
        assert!(!threshold.matches(DataValue::Continuous(5.0)));
    }

    #[test]
    fn test_split_round_trip() {
        let table = mixed_table();
        let rows = vec![0, 1, 2, 3];
        let criterion = SplitCriterion::new(&table, 1, DataValue::Continuous(2.0));
        let (true_rows, false_rows) = split(&table, &rows, &criterion).unwrap();
        assert_eq!(true_rows, vec![0, 1]);
        assert_eq!(false_rows, vec![2, 3]);

        // Re-union reproduces the original row set, nothing duplicated or dropped.
        let mut union: Vec<usize> = true_rows.iter().chain(false_rows.iter()).copied().collect();
        union.sort();
        assert_eq!(union, rows);
    }

    #[test]
    fn test_split_preserves_relative_order() {
        let table = mixed_table();
        // Rows fed in reverse keep their relative order on each side.
        let criterion = SplitCriterion::new(&table, 0, DataValue::Categorical(0));
        let (true_rows, false_rows) = split(&table, &[3, 2, 1, 0], &criterion).unwrap();
        assert_eq!(true_rows, vec![1, 0]);
        assert_eq!(false_rows, vec![3, 2]);
    }

    #[test]
    fn test_split_empty_side() {
        let table = mixed_table();
        let criterion = SplitCriterion::new(&table, 1, DataValue::Continuous(100.0));
        let (true_rows, false_rows) = split(&table, &[0, 1, 2, 3], &criterion).unwrap();
        assert_eq!(true_rows, vec![0, 1, 2, 3]);
        assert!(false_rows.is_empty());
    }

    #[test]
    fn test_candidate_values_decimated() {
        let table = mixed_table();
        let finder = SplitFinder::new(2);
        // Continuous column with 4 distinct values and a cap of 2 yields
        // exactly 2 candidate thresholds.
        let candidates = finder.candidate_values(&table, &[0, 1, 2, 3], 1).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates, vec![DataValue::Continuous(1.0), DataValue::Continuous(5.0)]);

        // Categorical columns are never decimated.
        let candidates = finder.candidate_values(&table, &[0, 1, 2, 3], 0).unwrap();
        assert_eq!(candidates, vec![DataValue::Categorical(0), DataValue::Categorical(1)]);
    }

    #[test]
    fn test_best_split_finds_pure_partition() {
        let table = mixed_table();
        let finder = SplitFinder::new(0);
        let (criterion, gain) = finder
            .best_split(&table, &[0, 1, 2, 3], &[0, 1])
            .unwrap()
            .unwrap();
        // Splitting the categorical column on its first value separates the
        // two classes completely, removing the full 0.5 of impurity.
        assert_eq!(criterion.column, 0);
        assert_eq!(criterion.value, DataValue::Categorical(0));
        assert_eq!(criterion.kind, SplitKind::Equality);
        assert_eq!(gain, 0.5);
    }

    #[test]
    fn test_best_split_first_wins_ties() {
        // Two categorical columns induce the same partition, the earlier
        // feature id must win.
        let table = MemoryTable::from_rows(
            &[
                vec![DataValue::Categorical(0), DataValue::Categorical(5)],
                vec![DataValue::Categorical(0), DataValue::Categorical(5)],
                vec![DataValue::Categorical(1), DataValue::Categorical(6)],
                vec![DataValue::Categorical(1), DataValue::Categorical(6)],
            ],
            vec![false, false],
        );
        let finder = SplitFinder::new(0);
        let (criterion, _) = finder
            .best_split(&table, &[0, 1, 2, 3], &[0, 1])
            .unwrap()
            .unwrap();
        assert_eq!(criterion.column, 0);
        assert_eq!(criterion.value, DataValue::Categorical(0));
    }

    #[test]
    fn test_best_split_empty_inputs() {
        let table = mixed_table();
        let finder = SplitFinder::new(0);
        assert!(finder.best_split(&table, &[], &[0, 1]).unwrap().is_none());
        assert!(finder.best_split(&table, &[0, 1], &[]).unwrap().is_none());
    }
}
