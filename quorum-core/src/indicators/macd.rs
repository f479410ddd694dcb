//! Moving Average Convergence Divergence (MACD).
//!
//! Three components (separate Indicator instances):
//! - Line: EMA(price, fast) - EMA(price, slow), undefined where either EMA is
//! - Signal: EMA(line, signal), seeded on the first `signal` defined line values
//! - Histogram: line - signal
//!
//! Standard parameters are 12 / 26 / 9, giving a line lookback of 25 and a
//! signal/histogram lookback of 33.

use super::ema::{ema, ema_after_warmup};
use super::indicator::Indicator;
use crate::domain::TimeSeries;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// Which component of MACD to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdComponent {
    Line,
    Signal,
    Histogram,
}

/// All three MACD series, each the same length as the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD with the standard 12 / 26 / 9 parameters.
pub fn macd(values: &[f64]) -> MacdSeries {
    macd_with(values, MACD_FAST, MACD_SLOW, MACD_SIGNAL)
}

/// MACD with explicit parameters.
pub fn macd_with(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);

    // NaN - x is NaN, so undefined operands carry through
    let line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = ema_after_warmup(&line, signal);

    let histogram = line
        .iter()
        .zip(&signal_line)
        .map(|(l, s)| l - s)
        .collect();

    MacdSeries {
        line,
        signal: signal_line,
        histogram,
    }
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    component: MacdComponent,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, component: MacdComponent) -> Self {
        assert!(fast >= 1 && slow >= 1 && signal >= 1, "MACD periods must be >= 1");
        let name = match component {
            MacdComponent::Line => "macd_line",
            MacdComponent::Signal => "macd_signal",
            MacdComponent::Histogram => "macd_histogram",
        };
        Self {
            fast,
            slow,
            signal,
            component,
            name: name.to_string(),
        }
    }

    /// Standard 12 / 26 / 9 instance for a component.
    pub fn standard(component: MacdComponent) -> Self {
        Self::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL, component)
    }

    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::new(fast, slow, signal, MacdComponent::Line)
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::new(fast, slow, signal, MacdComponent::Signal)
    }

    pub fn histogram(fast: usize, slow: usize, signal: usize) -> Self {
        Self::new(fast, slow, signal, MacdComponent::Histogram)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn period(&self) -> Option<usize> {
        None
    }

    fn lookback(&self) -> usize {
        let line = self.fast.max(self.slow) - 1;
        match self.component {
            MacdComponent::Line => line,
            MacdComponent::Signal | MacdComponent::Histogram => line + self.signal - 1,
        }
    }

    fn compute(&self, series: &TimeSeries) -> Vec<f64> {
        let all = macd_with(series.prices(), self.fast, self.slow, self.signal);
        match self.component {
            MacdComponent::Line => all.line,
            MacdComponent::Signal => all.signal,
            MacdComponent::Histogram => all.histogram,
        }
    }
}
