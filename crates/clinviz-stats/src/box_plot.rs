use crate::percentiles::compute_percentile;

/// Multiplier applied to the interquartile range when placing the fences.
pub const FENCE_IQR_FACTOR: f64 = 1.5;

/// Five-number summary used to draw a single box.
///
/// Quartiles use the nearest-rank method from
/// [`compute_percentile`](crate::percentiles::compute_percentile), and the
/// fences are clamped to the observed range so that whiskers never extend
/// beyond the actual minimum or maximum.
///
/// The fields always satisfy
/// `lower_fence <= q1 <= median <= q3 <= upper_fence`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    /// `max(q1 - 1.5 * iqr, min)`.
    pub lower_fence: f64,
    /// Value at the 25th percentile.
    pub q1: f64,
    /// Value at the 50th percentile.
    pub median: f64,
    /// Value at the 75th percentile.
    pub q3: f64,
    /// `min(q3 + 1.5 * iqr, max)`.
    pub upper_fence: f64,
}

impl BoxStats {
    /// Computes box statistics from pre-sorted values.
    ///
    /// # Returns
    ///
    /// * `Some(BoxStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use clinviz_stats::box_plot::BoxStats;
    /// let values = [1.0, 2.0, 3.0, 4.0, 100.0];
    /// let stats = BoxStats::from_sorted(&values).unwrap();
    /// assert_eq!(stats.q1, 2.0);
    /// assert_eq!(stats.q3, 4.0);
    /// assert_eq!(stats.lower_fence, 1.0); // clamped to the minimum
    /// assert_eq!(stats.upper_fence, 7.0); // q3 + 1.5 * iqr
    /// ```
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;

        let q1 = compute_percentile(sorted_values, 25.0);
        let median = compute_percentile(sorted_values, 50.0);
        let q3 = compute_percentile(sorted_values, 75.0);
        let iqr = q3 - q1;

        Some(Self {
            lower_fence: f64::max(q1 - FENCE_IQR_FACTOR * iqr, min),
            q1,
            median,
            q3,
            upper_fence: f64::min(q3 + FENCE_IQR_FACTOR * iqr, max),
        })
    }

    /// Returns `true` if `value` lies strictly outside the fences.
    #[must_use]
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower_fence || value > self.upper_fence
    }

    /// Returns the values that lie strictly outside the fences, in input order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use clinviz_stats::box_plot::BoxStats;
    /// let values = [-50.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 90.0];
    /// let stats = BoxStats::from_sorted(&values).unwrap();
    /// let outliers = stats.outliers(&values).collect::<Vec<_>>();
    /// assert_eq!(outliers, vec![-50.0, 90.0]);
    /// ```
    pub fn outliers<'a>(&'a self, values: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
        values.iter().copied().filter(|v| self.is_outlier(*v))
    }

    /// Returns the summary in the `[lower, q1, median, q3, upper]` order used by box-plot series.
    #[must_use]
    pub fn to_array(&self) -> [f64; 5] {
        [
            self.lower_fence,
            self.q1,
            self.median,
            self.q3,
            self.upper_fence,
        ]
    }
}
