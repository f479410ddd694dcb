//! Volume-Weighted Moving Average (VWMA).
//!
//! VWMA[i] = Σ(price·volume) / Σ(volume) over the window ending at i.
//! Lookback: period - 1. A window with zero total volume is undefined.

use super::indicator::Indicator;
use crate::domain::TimeSeries;

#[derive(Debug, Clone)]
pub struct Vwma {
    period: usize,
    name: String,
}

impl Vwma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "VWMA period must be >= 1");
        Self {
            period,
            name: format!("vwma_{period}"),
        }
    }
}

impl Indicator for Vwma {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> Option<usize> {
        Some(self.period)
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, series: &TimeSeries) -> Vec<f64> {
        vwma(series.prices(), series.volumes(), self.period)
    }
}

/// VWMA over aligned price and volume slices.
///
/// Slices of different lengths are truncated to the shorter one for the
/// computation; the output always has `prices.len()` entries.
pub fn vwma(prices: &[f64], volumes: &[f64], period: usize) -> Vec<f64> {
    let n = prices.len();
    let mut result = vec![f64::NAN; n];
    let usable = n.min(volumes.len());

    if period == 0 || usable < period {
        return result;
    }

    for i in (period - 1)..usable {
        let start = i + 1 - period;
        let mut weighted = 0.0;
        let mut total_volume = 0.0;
        for (p, v) in prices[start..=i].iter().zip(&volumes[start..=i]) {
            weighted += p * v;
            total_volume += v;
        }
        if total_volume > 0.0 && weighted.is_finite() {
            result[i] = weighted / total_volume;
        }
    }

    result
}
