//! Indicator trait and precomputed indicator values container.
//!
//! Indicators are pure functions: series in, numeric series out. They are
//! computed once per analysis and then read by name and index.

use crate::domain::TimeSeries;
use std::collections::BTreeMap;

/// Trait for indicators.
///
/// Indicators take a full series and produce a numeric output series of the
/// same length. The first `lookback()` values are `f64::NAN` (warmup).
///
/// # Look-ahead guard
/// No output value at index t may depend on data from index t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Period the value was computed over, when the indicator has one.
    fn period(&self) -> Option<usize>;

    /// Number of leading entries that are undefined.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    fn compute(&self, series: &TimeSeries) -> Vec<f64>;
}

/// Container for precomputed indicator series, keyed by indicator name.
///
/// Exposes the full historical arrays for callers that backtest, not only the
/// latest bar.
#[derive(Debug, Clone, Default)]
pub struct IndicatorValues {
    series: BTreeMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute every indicator over `series`.
    pub fn compute_all(series: &TimeSeries, indicators: &[Box<dyn Indicator>]) -> Self {
        let mut values = Self::new();
        for indicator in indicators {
            values.insert(indicator.name(), indicator.compute(series));
        }
        values
    }

    /// Insert a named indicator series.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Value at a specific index. NaN entries are returned as-is.
    pub fn get(&self, name: &str, index: usize) -> Option<f64> {
        self.series.get(name).and_then(|v| v.get(index).copied())
    }

    /// Latest defined-or-not value of a named series.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.series.get(name).and_then(|v| v.last().copied())
    }

    /// Full series for a named indicator.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
