use crate::errors::CartError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::ops::Add;

/// A single observation in a tabular data source.
///
/// Columns are declared either categorical or continuous, and every value
/// read from a column carries the matching variant. Categorical values are
/// discrete codes, continuous values are real numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum DataValue {
    /// A discrete category code.
    Categorical(i64),
    /// A real-valued observation.
    Continuous(f64),
}

impl DataValue {
    /// Numeric view of the value, used when accumulating sums and means.
    pub fn as_f64(&self) -> f64 {
        match self {
            DataValue::Categorical(v) => *v as f64,
            DataValue::Continuous(v) => *v,
        }
    }
}

impl Ord for DataValue {
    /// Total order so values can be sorted and deduplicated. Continuous
    /// values order by `total_cmp`. Kinds never mix within one column, so
    /// the cross-kind arm (numeric comparison, categorical first on ties)
    /// only keeps the order total.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (DataValue::Categorical(a), DataValue::Categorical(b)) => a.cmp(b),
            (DataValue::Continuous(a), DataValue::Continuous(b)) => a.total_cmp(b),
            (DataValue::Categorical(a), DataValue::Continuous(b)) => {
                (*a as f64).total_cmp(b).then(Ordering::Less)
            }
            (DataValue::Continuous(a), DataValue::Categorical(b)) => {
                a.total_cmp(&(*b as f64)).then(Ordering::Greater)
            }
        }
    }
}

impl PartialOrd for DataValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DataValue {}

impl Add<DataValue> for f64 {
    type Output = f64;

    /// Fold a value into a numeric accumulator.
    fn add(self, rhs: DataValue) -> f64 {
        self + rhs.as_f64()
    }
}

impl Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataValue::Categorical(v) => write!(f, "{}", v),
            DataValue::Continuous(v) => write!(f, "{}", v),
        }
    }
}

/// Read-only access contract to a tabular data source.
///
/// The CART engine reads training and output data exclusively through this
/// trait, it never loads or pages data itself. `Send + Sync` is required
/// because subtree builds fan out across threads and a built model may be
/// queried concurrently.
pub trait DataSource: Send + Sync {
    /// Total number of rows available.
    fn row_count(&self) -> usize;
    /// The value stored at (`row`, `column`).
    ///
    /// Out-of-range access is reported as an error, never silently clamped.
    fn value(&self, row: usize, column: usize) -> Result<DataValue, CartError>;
    /// Whether the column holds continuous values rather than category codes.
    fn is_continuous(&self, column: usize) -> bool;
}

/// Rectangular in-memory data source.
///
/// Reference implementation of [`DataSource`] holding all values in a single
/// row-major block. Used by the crate's tests and benches, and suitable for
/// callers whose tables already fit in memory.
pub struct MemoryTable {
    /// The values in row-major order.
    data: Vec<DataValue>,
    /// Per-column kind flags, `true` for continuous columns.
    continuous: Vec<bool>,
    rows: usize,
    cols: usize,
}

impl MemoryTable {
    /// Create a new MemoryTable.
    ///
    /// * `data` - The values in row-major order, `rows * cols` entries.
    /// * `rows` - Number of rows.
    /// * `cols` - Number of columns.
    /// * `continuous` - One kind flag per column, `true` for continuous.
    pub fn new(data: Vec<DataValue>, rows: usize, cols: usize, continuous: Vec<bool>) -> Self {
        assert_eq!(data.len(), rows * cols, "Data length must match rows * cols");
        assert_eq!(continuous.len(), cols, "Number of kind flags must match number of columns");
        MemoryTable {
            data,
            continuous,
            rows,
            cols,
        }
    }

    /// Create a MemoryTable from per-row value vectors.
    ///
    /// * `rows` - One vector per row, all of equal length.
    /// * `continuous` - One kind flag per column, `true` for continuous.
    pub fn from_rows(rows: &[Vec<DataValue>], continuous: Vec<bool>) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            assert_eq!(row.len(), n_cols, "All rows must have the same number of columns");
            data.extend_from_slice(row);
        }
        Self::new(data, n_rows, n_cols, continuous)
    }
}

impl DataSource for MemoryTable {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn value(&self, row: usize, column: usize) -> Result<DataValue, CartError> {
        if row >= self.rows {
            return Err(CartError::RowOutOfRange(row, self.rows));
        }
        if column >= self.cols {
            return Err(CartError::ColumnOutOfRange(column, self.cols));
        }
        Ok(self.data[row * self.cols + column])
    }

    fn is_continuous(&self, column: usize) -> bool {
        self.continuous[column]
    }
}
