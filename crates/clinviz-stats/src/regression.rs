/// Error returned when a least-squares line cannot be fitted.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum LinearFitError {
    #[display("at least 2 points are required to fit a line, got {found}")]
    TooFewPoints { found: usize },
    #[display("degenerate regression: no x-variance")]
    NoXVariance,
    #[display("degenerate regression: slope or intercept is not finite")]
    NonFiniteFit,
}

/// Ordinary least squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fits a line through `(x, y)` points with the closed-form OLS estimator.
    ///
    /// ```text
    /// slope     = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
    /// intercept = (Σy − slope·Σx) / n
    /// ```
    ///
    /// Sums are accumulated in input order, so the same points always yield
    /// bit-identical coefficients.
    ///
    /// # Errors
    ///
    /// * [`LinearFitError::TooFewPoints`] - fewer than two points
    /// * [`LinearFitError::NoXVariance`] - every x is identical, or the
    ///   divisor is zero or not finite
    /// * [`LinearFitError::NonFiniteFit`] - the sums overflowed and the slope
    ///   or intercept came out as NaN or infinite
    ///
    /// # Examples
    ///
    /// ```
    /// use clinviz_stats::regression::{LinearFit, LinearFitError};
    ///
    /// let fit = LinearFit::from_points(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).unwrap();
    /// assert_eq!(fit.predict(3.0), 6.0);
    ///
    /// let err = LinearFit::from_points(&[(5.0, 1.0), (5.0, 9.0)]).unwrap_err();
    /// assert_eq!(err, LinearFitError::NoXVariance);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[allow(clippy::float_cmp)]
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self, LinearFitError> {
        if points.len() < 2 {
            return Err(LinearFitError::TooFewPoints {
                found: points.len(),
            });
        }

        let first_x = points[0].0;
        if points.iter().all(|(x, _)| *x == first_x) {
            return Err(LinearFitError::NoXVariance);
        }

        let n = points.len() as f64;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_x2 = 0.0;
        for &(x, y) in points {
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_x2 += x * x;
        }

        let divisor = n * sum_x2 - sum_x * sum_x;
        if divisor == 0.0 || !divisor.is_finite() {
            return Err(LinearFitError::NoXVariance);
        }

        let slope = (n * sum_xy - sum_x * sum_y) / divisor;
        let intercept = (sum_y - slope * sum_x) / n;
        if !slope.is_finite() || !intercept.is_finite() {
            return Err(LinearFitError::NonFiniteFit);
        }

        Ok(Self { slope, intercept })
    }

    /// Evaluates the fitted line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}
