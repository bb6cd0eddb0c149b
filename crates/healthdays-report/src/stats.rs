//! Descriptive statistics of healthy days per group.

use serde::{Deserialize, Serialize};

/// Summary of the healthy-day counts in one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    /// Category label, or `"All"` for the whole table.
    pub level: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation. `None` for a single observation.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl GroupStats {
    /// Computes the summary of `values`.
    ///
    /// Returns `None` if `values` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use healthdays_report::GroupStats;
    /// let stats = GroupStats::new("Heavy", &[30.0, 20.0, 25.0]).unwrap();
    /// assert_eq!(stats.count, 3);
    /// assert_eq!(stats.mean, 25.0);
    /// assert_eq!(stats.std_dev, Some(5.0));
    /// ```
    #[must_use]
    pub fn new(level: impl Into<String>, values: &[f64]) -> Option<Self> {
        let first = *values.first()?;
        let count = values.len();
        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let (min, max) = values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let std_dev = (count > 1).then(|| {
            let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (ss / (n - 1.0)).sqrt()
        });

        Some(Self {
            level: level.into(),
            count,
            mean,
            std_dev,
            min,
            max,
        })
    }
}
