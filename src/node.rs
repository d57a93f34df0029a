use crate::data::{DataSource, DataValue};
use crate::errors::CartError;
use crate::splitter::SplitCriterion;
use crate::utils::value_counts;

/// A node of a built CART tree, either an internal decision or a leaf.
///
/// The tree is a plain sum type: every traversal is a match on the variant,
/// children are exclusively owned boxes, and teardown is the default
/// recursive drop. Nodes are never aliased and hold no back-pointers.
pub enum CartNode<'a> {
    Decision(DecisionNode<'a>),
    Leaf(LeafNode<'a>),
}

/// An internal node: a split criterion and the two subtrees it routes to.
pub struct DecisionNode<'a> {
    /// The test applied to rows reaching this node.
    pub criterion: SplitCriterion,
    /// Subtree for rows matching the criterion.
    pub true_branch: Box<CartNode<'a>>,
    /// Subtree for rows failing the criterion.
    pub false_branch: Box<CartNode<'a>>,
}

/// A terminal node holding the training rows that reached it.
pub struct LeafNode<'a> {
    /// Ids of the training rows assigned to this leaf.
    rows: Vec<usize>,
    /// The training data needed to answer queries about those rows.
    training: &'a dyn DataSource,
}

impl<'a> LeafNode<'a> {
    pub fn new(training: &'a dyn DataSource, rows: Vec<usize>) -> Self {
        LeafNode { rows, training }
    }

    /// Number of training rows assigned to this leaf.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The distinct values of `column` among this leaf's rows, ascending,
    /// each with its occurrence count. This is the classification answer of
    /// the leaf: how often each value of the dependent column was seen in
    /// the training rows that ended up here.
    pub fn unique_value_counts(&self, column: usize) -> Result<Vec<(DataValue, usize)>, CartError> {
        value_counts(self.training, &self.rows, column)
    }

    /// The arithmetic mean of `column` over this leaf's rows, and the
    /// fraction of all training rows assigned to this leaf. The fraction
    /// measures how representative the mean is of the training set, it is
    /// not a confidence interval.
    ///
    /// The builder never produces an empty leaf, so the mean is always
    /// defined.
    pub fn mean_with_coverage(&self, column: usize) -> Result<(f64, f64), CartError> {
        debug_assert!(!self.rows.is_empty(), "leaves are never empty by construction");
        let mut sum = 0.0;
        for &row in &self.rows {
            sum = sum + self.training.value(row, column)?;
        }
        let mean = sum / self.rows.len() as f64;
        let coverage = self.rows.len() as f64 / self.training.row_count() as f64;
        Ok((mean, coverage))
    }
}

impl CartNode<'_> {
    /// Number of leaves in the subtree rooted here.
    pub fn n_leaves(&self) -> usize {
        match self {
            CartNode::Leaf(_) => 1,
            CartNode::Decision(node) => node.true_branch.n_leaves() + node.false_branch.n_leaves(),
        }
    }

    /// Number of decisions on the longest root-to-leaf path. A tree that is
    /// a single leaf has depth zero.
    pub fn depth(&self) -> usize {
        match self {
            CartNode::Leaf(_) => 0,
            CartNode::Decision(node) => 1 + node.true_branch.depth().max(node.false_branch.depth()),
        }
    }
}
