//! Indicator library.
//!
//! Every indicator is a pure function from an aligned series to an output
//! series of the same length. Warmup entries (and any window touching a NaN
//! input) are `f64::NAN`, which is how "undefined" is represented throughout
//! the crate. A period longer than the series, or a zero period, yields an
//! all-NaN output instead of an error.
//!
//! Each indicator is available both as a free function over `&[f64]` and as a
//! named `Indicator` instance over a `TimeSeries`. Multi-series indicators
//! (MACD, Bollinger) are exposed as separate named instances per component,
//! keeping the single-series trait unchanged.

pub mod bollinger;
pub mod ema;
pub mod indicator;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod snapshot;
pub mod vwma;

pub use bollinger::{bollinger, Bollinger, BollingerBand, BollingerSeries};
pub use ema::{ema, Ema};
pub use indicator::{Indicator, IndicatorValues};
pub use macd::{macd, macd_with, Macd, MacdComponent, MacdSeries};
pub use rsi::{rsi, Rsi};
pub use sma::{sma, Sma};
pub use snapshot::{build_indicators, latest_results};
pub use vwma::{vwma, Vwma};

/// Count of leading NaN entries in a computed series.
pub fn warmup_len(values: &[f64]) -> usize {
    values.iter().take_while(|v| v.is_nan()).count()
}

/// Build a daily series from prices for testing. Volume is a constant 1000.
#[cfg(test)]
pub fn make_series(prices: &[f64]) -> crate::domain::TimeSeries {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let dates = (0..prices.len())
        .map(|i| base_date + chrono::Duration::days(i as i64))
        .collect();
    crate::domain::TimeSeries::new(dates, prices.to_vec(), vec![1000.0; prices.len()]).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
