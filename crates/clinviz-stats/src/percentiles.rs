/// Computes a single percentile value from sorted data.
///
/// This function uses the nearest-rank method (also called "ordinary" percentile).
/// For a dataset with n values, the k-th percentile is the value at zero-based
/// position `floor(n * k / 100)`, clamped to the last element. No interpolation
/// takes place, so the result is always one of the input values.
///
/// # Arguments
///
/// * `sorted_values` - Values sorted in ascending order
/// * `percentile` - The percentile to compute (0.0 to 100.0)
///
/// # Returns
///
/// The value at the specified percentile. Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use clinviz_stats::percentiles::compute_percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0];
///
/// assert_eq!(compute_percentile(&values, 50.0), 3.0);
/// assert_eq!(compute_percentile(&values, 25.0), 2.0);
/// assert_eq!(compute_percentile(&values, 75.0), 4.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let idx = ((sorted_values.len() as f64 * percentile) / 100.0).floor() as usize;
    let idx = idx.min(sorted_values.len() - 1);
    sorted_values[idx]
}

/// Sorts values in place with a total order suitable for percentile lookup.
///
/// `f64::total_cmp` is used so that the sort never panics; callers are expected
/// to have filtered out non-finite values beforehand.
pub fn sort_values(values: &mut [f64]) {
    values.sort_by(f64::total_cmp);
}
