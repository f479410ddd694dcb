//! Relative Strength Index (RSI), simple-average form.
//!
//! gain = max(Δprice, 0), loss = max(-Δprice, 0)
//! avg_gain / avg_loss = plain mean of the last `period` gains / losses
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period.
//! Edge case: avg_loss == 0 → RSI = 100 (this includes a flat window).

use super::indicator::Indicator;
use crate::domain::TimeSeries;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> Option<usize> {
        Some(self.period)
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, series: &TimeSeries) -> Vec<f64> {
        rsi(series.prices(), self.period)
    }
}

/// RSI over a raw slice. Index `i >= period` uses the changes ending at `i`.
pub fn rsi(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period + 1 {
        return result;
    }

    // changes[i] = values[i] - values[i-1]; changes[0] is unused
    let mut changes = vec![f64::NAN; n];
    for i in 1..n {
        changes[i] = values[i] - values[i - 1];
    }

    for i in period..n {
        let window = &changes[(i + 1 - period)..=i];
        if window.iter().any(|c| c.is_nan()) {
            continue;
        }

        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        for &ch in window {
            if ch > 0.0 {
                gain_sum += ch;
            } else {
                loss_sum -= ch;
            }
        }
        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;

        result[i] = compute_rsi(avg_gain, avg_loss);
    }

    result
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
