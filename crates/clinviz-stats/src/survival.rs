/// Error returned when a Kaplan-Meier curve cannot be estimated.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum KaplanMeierError {
    #[display("no observations to estimate a survival curve from")]
    NoObservations,
    #[display("risk set depleted with {remaining} observation(s) left")]
    RiskSetDepleted { remaining: usize },
}

/// Kaplan-Meier survival curve for survival analysis.
///
/// The Kaplan-Meier estimator is a non-parametric statistic used to estimate the survival
/// function from lifetime data. It accounts for censored data (observations where the event
/// of interest has not occurred by the end of the study period).
///
/// # Fields
///
/// The curve stores parallel vectors. Index 0 is always the origin `(0, 1.0)`;
/// every following entry is one observed event, in processing order.
#[derive(Debug, Clone, PartialEq)]
pub struct KaplanMeierCurve {
    /// Time of each curve point, non-decreasing.
    pub times: Vec<f64>,
    /// Survival probability at each corresponding time point.
    /// Values range from 0.0 (no survival) to 1.0 (complete survival) and never increase.
    pub survival_prob: Vec<f64>,
    /// Number of subjects at risk immediately before each point.
    pub at_risk: Vec<usize>,
    /// Total number of observations the curve was estimated from.
    pub subjects: usize,
    /// Number of observations with an observed event.
    pub events: usize,
}

impl KaplanMeierCurve {
    /// Computes the Kaplan-Meier survival curve one observation at a time.
    ///
    /// Observations are stably sorted by time, so ties keep their input order.
    /// Walking them in that order, each observed event multiplies the survival
    /// probability by `(at_risk - 1) / at_risk` and appends a point; censored
    /// observations add no point. Every observation, event or censored, then
    /// leaves the risk set.
    ///
    /// Tied event times are therefore not pooled: each produces its own point.
    ///
    /// # Arguments
    ///
    /// * `data` - A vector of tuples where each tuple contains:
    ///   - `time`: The time at which the observation occurred
    ///   - `event`: `true` if the event occurred, `false` if the observation was censored
    ///
    /// # Errors
    ///
    /// * [`KaplanMeierError::NoObservations`] - `data` is empty
    /// * [`KaplanMeierError::RiskSetDepleted`] - the risk set ran out before
    ///   every observation was processed
    ///
    /// # Examples
    ///
    /// ```
    /// # use clinviz_stats::survival::KaplanMeierCurve;
    /// // Data: (time, event_observed)
    /// let data = vec![(1.0, true), (2.0, false), (3.0, true), (4.0, true)];
    /// let curve = KaplanMeierCurve::from_observations(data).unwrap();
    ///
    /// assert_eq!(curve.times, vec![0.0, 1.0, 3.0, 4.0]);
    /// assert_eq!(curve.survival_prob, vec![1.0, 0.75, 0.375, 0.0]);
    /// assert_eq!(curve.censored(), 1);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn from_observations(mut data: Vec<(f64, bool)>) -> Result<Self, KaplanMeierError> {
        if data.is_empty() {
            return Err(KaplanMeierError::NoObservations);
        }

        // Stable: ties keep input order
        data.sort_by(|(a, _), (b, _)| a.total_cmp(b));

        let subjects = data.len();
        let mut times = vec![0.0];
        let mut survival_prob = vec![1.0];
        let mut at_risk_vec = vec![subjects];
        let mut events = 0;

        let mut current_survival = 1.0;
        let mut at_risk = subjects;

        for (i, &(time, event)) in data.iter().enumerate() {
            if at_risk == 0 {
                return Err(KaplanMeierError::RiskSetDepleted {
                    remaining: subjects - i,
                });
            }

            if event {
                current_survival *= (at_risk - 1) as f64 / at_risk as f64;
                times.push(time);
                survival_prob.push(current_survival);
                at_risk_vec.push(at_risk);
                events += 1;
            }

            at_risk -= 1;
        }

        Ok(Self {
            times,
            survival_prob,
            at_risk: at_risk_vec,
            subjects,
            events,
        })
    }

    /// Number of censored observations.
    #[must_use]
    pub fn censored(&self) -> usize {
        self.subjects - self.events
    }

    /// Iterates over `(time, survival_prob)` pairs, origin first.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times
            .iter()
            .copied()
            .zip(self.survival_prob.iter().copied())
    }

    /// Returns the median survival time.
    ///
    /// The median survival time is the time at which the survival probability
    /// drops to or below 50%. If the survival probability never reaches 50%,
    /// this method returns `None`.
    ///
    /// Linear interpolation is used between time points for more accurate estimates.
    ///
    /// # Examples
    ///
    /// ```
    /// # use clinviz_stats::survival::KaplanMeierCurve;
    /// let data = vec![(10.0, true), (20.0, true)];
    /// let curve = KaplanMeierCurve::from_observations(data).unwrap();
    /// // 1.0 at t=0 -> 0.5 at t=10
    /// assert_eq!(curve.median_survival(), Some(10.0));
    /// ```
    #[must_use]
    pub fn median_survival(&self) -> Option<f64> {
        let i = self.survival_prob.iter().position(|&s| s <= 0.5)?;
        if i == 0 {
            return Some(self.times[0]);
        }

        let t0 = self.times[i - 1];
        let t1 = self.times[i];
        let s0 = self.survival_prob[i - 1];
        let s1 = self.survival_prob[i];
        Some(t0 + (0.5 - s0) / (s1 - s0) * (t1 - t0))
    }

    /// Returns the survival probability at a specific time.
    ///
    /// This method uses a step function: the survival probability remains constant
    /// between event times and decreases only when an event occurs. When several
    /// points share the same time, the last one wins.
    ///
    /// # Examples
    ///
    /// ```
    /// # use clinviz_stats::survival::KaplanMeierCurve;
    /// let data = vec![(10.0, true), (20.0, true)];
    /// let curve = KaplanMeierCurve::from_observations(data).unwrap();
    ///
    /// assert_eq!(curve.survival_at(5.0), 1.0);  // Before first event
    /// assert_eq!(curve.survival_at(15.0), 0.5); // After first event
    /// assert_eq!(curve.survival_at(25.0), 0.0); // After last event
    /// ```
    #[must_use]
    pub fn survival_at(&self, time: f64) -> f64 {
        self.points()
            .take_while(|(t, _)| *t <= time)
            .last()
            .map_or(1.0, |(_, s)| s)
    }
}
