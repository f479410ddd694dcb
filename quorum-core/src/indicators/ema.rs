//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = price[t] * k + EMA[t-1] * (1 - k), k = 2 / (period + 1)
//! Seed: EMA[period-1] = SMA of the first `period` values.
//! Lookback: period - 1.

use super::indicator::Indicator;
use crate::domain::TimeSeries;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
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
        ema(series.prices(), self.period)
    }
}

/// EMA over a raw slice, seeded at index `period - 1`.
///
/// NaN inside the seed window leaves the whole output undefined; NaN after the
/// seed taints every later value.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let k = 2.0 / (period as f64 + 1.0);

    let mut sum = 0.0;
    for &v in values.iter().take(period) {
        if v.is_nan() {
            return result;
        }
        sum += v;
    }
    let seed = sum / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        if values[i].is_nan() {
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let next = values[i] * k + prev * (1.0 - k);
        result[i] = next;
        prev = next;
    }

    result
}

/// EMA over a series that itself starts with an undefined prefix.
///
/// The seed is taken from the first `period` defined values, so the output is
/// defined from `prefix + period - 1` onwards. Used for MACD's signal line.
pub fn ema_after_warmup(values: &[f64], period: usize) -> Vec<f64> {
    let start = super::warmup_len(values);
    let mut result = vec![f64::NAN; values.len()];
    let tail = ema(&values[start..], period);
    result[start..].copy_from_slice(&tail);
    result
}
