use crate::analysis::stats;

/// IQR-based outlier filter.
///
/// Computes quartile bounds over `value` applied to every row and returns
/// the in-bounds subset in source order. Rows are never mutated. When all
/// values are identical the IQR collapses to zero and only exact matches
/// survive; that is the intended behavior, not an error.
pub fn remove_outliers<T, F>(rows: &[T], value: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> f64,
{
    let values: Vec<f64> = rows.iter().map(&value).collect();

    let (q1, q3) = match stats::quartiles(&values) {
        Some(quartiles) => quartiles,
        None => return Vec::new(),
    };

    let iqr = q3 - q1;
    let lower = q1 - 1.5 * iqr;
    let upper = q3 + 1.5 * iqr;

    rows.iter()
        .zip(values)
        .filter(|(_, v)| lower <= *v && *v <= upper)
        .map(|(row, _)| row.clone())
        .collect()
}
