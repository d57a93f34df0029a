//! Tree
//!
//! The CART model: recursive tree construction at creation time, and the
//! classification and regression queries that walk the built tree.
use crate::constants::{MIN_SPLIT_ROWS, PARALLEL_MIN_ROWS};
use crate::data::{DataSource, DataValue};
use crate::errors::CartError;
use crate::model::DecisionModel;
use crate::node::{CartNode, DecisionNode, LeafNode};
use crate::splitter::{split, SplitFinder};
use hashbrown::HashMap;
use log::debug;

/// A classification and regression tree over a pair of data sources.
///
/// The tree is grown once, in [`Cart::new`], from every training row and
/// the given predictor columns, and is immutable afterwards. Queries
/// resolve an output row against the training partition its feature values
/// lead to. Rebuilding means constructing a new model.
pub struct Cart<'a> {
    /// The data queries are answered for. The training data stays reachable
    /// through the leaves, which answer the queries about their rows.
    output: &'a dyn DataSource,
    /// Maps feature column ids in the training data to feature column ids
    /// in the output data. A feature rarely sits at the same column index
    /// in both sources. Built once at construction.
    feature_map: HashMap<usize, usize>,
    /// The root of the tree.
    root: CartNode<'a>,
}

impl<'a> Cart<'a> {
    /// Build a CART tree from the training data.
    ///
    /// * `training` - The data set the tree is built from.
    /// * `output` - The data set to be classified or estimated. Read-only,
    ///     updates from query results are up to the calling code.
    /// * `training_features` - Column ids of the selected predictor
    ///     variables in the training data.
    /// * `output_features` - Column ids of the same predictors in the
    ///     output data, parallel to `training_features`.
    /// * `continuous_max_splits` - Limit on candidate split values per
    ///     continuous column, zero for no limit.
    pub fn new(
        training: &'a dyn DataSource,
        output: &'a dyn DataSource,
        training_features: &[usize],
        output_features: &[usize],
        continuous_max_splits: usize,
    ) -> Result<Self, CartError> {
        if training_features.is_empty() {
            return Err(CartError::NoFeatures);
        }
        if training_features.len() != output_features.len() {
            return Err(CartError::FeatureLengthMismatch(
                training_features.len(),
                output_features.len(),
            ));
        }
        let feature_map: HashMap<usize, usize> = training_features
            .iter()
            .copied()
            .zip(output_features.iter().copied())
            .collect();

        let finder = SplitFinder::new(continuous_max_splits);
        let rows: Vec<usize> = (0..training.row_count()).collect();
        let root = build_node(training, &finder, rows, training_features)?;
        debug!(
            "built CART tree over {} rows: {} leaves, depth {}",
            training.row_count(),
            root.n_leaves(),
            root.depth()
        );

        Ok(Cart {
            output,
            feature_map,
            root,
        })
    }

    /// Number of leaves in the built tree.
    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }

    /// Number of decisions on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Classify one output row against the tree.
    ///
    /// * `output_row` - Row of the output data to classify.
    /// * `dependent_column` - Column id in the training data of the
    ///     variable to predict, expected to be categorical.
    ///
    /// Returns each distinct value of the dependent column found in the
    /// leaf the row descends to, with its count in the training rows of
    /// that leaf.
    pub fn classify(
        &self,
        output_row: usize,
        dependent_column: usize,
    ) -> Result<Vec<(DataValue, usize)>, CartError> {
        self.leaf_for(&self.root, output_row)?.unique_value_counts(dependent_column)
    }

    /// Estimate one output row against the tree.
    ///
    /// * `output_row` - Row of the output data to estimate.
    /// * `dependent_column` - Column id in the training data of the
    ///     variable to predict, expected to be continuous.
    ///
    /// Returns the mean of the dependent column over the leaf's training
    /// rows, and the fraction of all training rows that leaf holds as a
    /// measure of how representative the mean is.
    pub fn regress(&self, output_row: usize, dependent_column: usize) -> Result<(f64, f64), CartError> {
        self.leaf_for(&self.root, output_row)?.mean_with_coverage(dependent_column)
    }

    /// Walk a single root-to-leaf path for an output row. Criterion columns
    /// live in training column space, so each decision maps its column
    /// through the feature map before reading the output row.
    fn leaf_for<'n>(&self, node: &'n CartNode<'a>, output_row: usize) -> Result<&'n LeafNode<'a>, CartError> {
        match node {
            CartNode::Leaf(leaf) => Ok(leaf),
            CartNode::Decision(decision) => {
                let column = *self
                    .feature_map
                    .get(&decision.criterion.column)
                    .ok_or(CartError::MissingColumnMapping(decision.criterion.column))?;
                let value = self.output.value(output_row, column)?;
                if decision.criterion.matches(value) {
                    self.leaf_for(&decision.true_branch, output_row)
                } else {
                    self.leaf_for(&decision.false_branch, output_row)
                }
            }
        }
    }
}

impl DecisionModel for Cart<'_> {
    fn classify(
        &self,
        output_row: usize,
        dependent_column: usize,
    ) -> Result<Vec<(DataValue, usize)>, CartError> {
        Cart::classify(self, output_row, dependent_column)
    }

    fn regress(&self, output_row: usize, dependent_column: usize) -> Result<(f64, f64), CartError> {
        Cart::regress(self, output_row, dependent_column)
    }
}

/// Recursively partition a row set into a subtree.
///
/// A row set becomes a leaf when it is too small to split, when no
/// candidate criterion has strictly positive information gain, or when the
/// winning split leaves one side empty. Otherwise the best criterion forms
/// a decision node and both sides recurse with the same feature list,
/// features stay reusable at deeper levels since continuous thresholds can
/// still usefully re-split a subset.
///
/// The two child builds share no mutable state and fan out to rayon for
/// large row sets.
fn build_node<'a>(
    training: &'a dyn DataSource,
    finder: &SplitFinder,
    rows: Vec<usize>,
    features: &[usize],
) -> Result<CartNode<'a>, CartError> {
    if rows.len() < MIN_SPLIT_ROWS {
        return Ok(CartNode::Leaf(LeafNode::new(training, rows)));
    }
    let Some((criterion, gain)) = finder.best_split(training, &rows, features)? else {
        return Ok(CartNode::Leaf(LeafNode::new(training, rows)));
    };
    if gain <= 0.0 {
        return Ok(CartNode::Leaf(LeafNode::new(training, rows)));
    }
    let (true_rows, false_rows) = split(training, &rows, &criterion)?;
    if true_rows.is_empty() || false_rows.is_empty() {
        return Ok(CartNode::Leaf(LeafNode::new(training, rows)));
    }

    let (true_branch, false_branch) = if rows.len() >= PARALLEL_MIN_ROWS {
        rayon::join(
            || build_node(training, finder, true_rows, features),
            || build_node(training, finder, false_rows, features),
        )
    } else {
        (
            build_node(training, finder, true_rows, features),
            build_node(training, finder, false_rows, features),
        )
    };

    Ok(CartNode::Decision(DecisionNode {
        criterion,
        true_branch: Box::new(true_branch?),
        false_branch: Box::new(false_branch?),
    }))
}
