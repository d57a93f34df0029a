use crate::data::{DataSource, DataValue};
use crate::errors::CartError;

/// Collect the distinct values found in `column` among the given rows,
/// sorted ascending.
pub fn unique_values(
    source: &dyn DataSource,
    rows: &[usize],
    column: usize,
) -> Result<Vec<DataValue>, CartError> {
    let mut values = Vec::with_capacity(rows.len());
    for &row in rows {
        values.push(source.value(row, column)?);
    }
    values.sort();
    values.dedup();
    Ok(values)
}

/// Count the occurrences of each distinct value of `column` among the given
/// rows. Results are ordered ascending by value.
pub fn value_counts(
    source: &dyn DataSource,
    rows: &[usize],
    column: usize,
) -> Result<Vec<(DataValue, usize)>, CartError> {
    let mut values = Vec::with_capacity(rows.len());
    for &row in rows {
        values.push(source.value(row, column)?);
    }
    values.sort();

    let mut counts: Vec<(DataValue, usize)> = Vec::new();
    for value in values {
        match counts.last_mut() {
            Some((last, count)) if *last == value => *count += 1,
            _ => counts.push((value, 1)),
        }
    }
    Ok(counts)
}

/// Reduce a sorted candidate value sequence to at most `max_count` entries
/// by keeping every n-th element, starting with the first. Order is
/// preserved. Sequences already within the cap are left untouched, and a
/// cap of zero disables the reduction entirely.
pub fn decimate(values: &mut Vec<DataValue>, max_count: usize) {
    if max_count == 0 || values.len() <= max_count {
        return;
    }
    let stride = values.len().div_ceil(max_count);
    let mut i = 0;
    values.retain(|_| {
        let keep = i % stride == 0;
        i += 1;
        keep
    });
}

/// Round to a set precision, for float comparisons in tests.
pub fn precision_round(n: f64, precision: i32) -> f64 {
    let p = (10.0_f64).powi(precision);
    (n * p).round() / p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryTable;

    fn continuous(values: &[f64]) -> Vec<DataValue> {
        values.iter().map(|v| DataValue::Continuous(*v)).collect()
    }

    #[test]
    fn test_unique_values_sorted() {
        let table = MemoryTable::new(
            continuous(&[5.0, 1.0, 5.0, 3.0, 1.0]),
            5,
            1,
            vec![true],
        );
        let uniques = unique_values(&table, &[0, 1, 2, 3, 4], 0).unwrap();
        assert_eq!(uniques, continuous(&[1.0, 3.0, 5.0]));
    }

    #[test]
    fn test_value_counts() {
        let table = MemoryTable::new(
            continuous(&[5.0, 1.0, 5.0, 3.0, 1.0, 5.0]),
            6,
            1,
            vec![true],
        );
        let counts = value_counts(&table, &[0, 1, 2, 3, 4, 5], 0).unwrap();
        assert_eq!(
            counts,
            vec![
                (DataValue::Continuous(1.0), 2),
                (DataValue::Continuous(3.0), 1),
                (DataValue::Continuous(5.0), 3),
            ]
        );
        let total: usize = counts.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_decimate_reduces_to_cap() {
        let mut values = continuous(&[1.0, 2.0, 3.0, 4.0]);
        decimate(&mut values, 2);
        assert_eq!(values, continuous(&[1.0, 3.0]));

        let mut values = continuous(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        decimate(&mut values, 3);
        assert_eq!(values, continuous(&[1.0, 4.0, 7.0]));
    }

    #[test]
    fn test_decimate_within_cap_is_noop() {
        let mut values = continuous(&[1.0, 2.0, 3.0]);
        decimate(&mut values, 5);
        assert_eq!(values, continuous(&[1.0, 2.0, 3.0]));

        let mut values = continuous(&[1.0, 2.0, 3.0]);
        decimate(&mut values, 0);
        assert_eq!(values, continuous(&[1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_decimate_idempotent() {
        let mut values = continuous(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        decimate(&mut values, 3);
        let once = values.clone();
        decimate(&mut values, 3);
        assert_eq!(values, once);
    }

    #[test]
    fn test_precision_round() {
        assert_eq!(0.3, precision_round(0.3333, 1));
        assert_eq!(0.2343, precision_round(0.2343123123123, 4));
    }
}
