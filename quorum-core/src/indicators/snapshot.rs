//! Latest-bar indicator snapshot.
//!
//! Builds the configured indicator set, computes it once over the series, and
//! classifies the last value of each one. Indicators still in warmup at the
//! last bar are left out of the snapshot.

use super::bollinger::Bollinger;
use super::ema::Ema;
use super::indicator::{Indicator, IndicatorValues};
use super::macd::Macd;
use super::rsi::Rsi;
use super::sma::Sma;
use super::vwma::Vwma;
use crate::classifier::{ClassificationContext, Classifier};
use crate::config::IndicatorConfig;
use crate::domain::{IndicatorResult, TimeSeries};

/// Instantiate every indicator named by `config`. Zero periods are skipped.
pub fn build_indicators(config: &IndicatorConfig) -> Vec<Box<dyn Indicator>> {
    let mut out: Vec<Box<dyn Indicator>> = Vec::new();
    let usable = |p: &&usize| **p >= 1;

    for &period in config.sma_periods.iter().filter(usable) {
        out.push(Box::new(Sma::new(period)));
    }
    for &period in config.ema_periods.iter().filter(usable) {
        out.push(Box::new(Ema::new(period)));
    }
    for &period in config.vwma_periods.iter().filter(usable) {
        out.push(Box::new(Vwma::new(period)));
    }
    if config.rsi_period >= 1 {
        out.push(Box::new(Rsi::new(config.rsi_period)));
    }

    let m = config.macd;
    if m.fast >= 1 && m.slow >= 1 && m.signal >= 1 {
        out.push(Box::new(Macd::line(m.fast, m.slow, m.signal)));
        out.push(Box::new(Macd::signal(m.fast, m.slow, m.signal)));
        out.push(Box::new(Macd::histogram(m.fast, m.slow, m.signal)));
    }

    let b = config.bollinger;
    if b.period >= 1 {
        out.push(Box::new(Bollinger::upper(b.period, b.multiplier)));
        out.push(Box::new(Bollinger::middle(b.period, b.multiplier)));
        out.push(Box::new(Bollinger::lower(b.period, b.multiplier)));
    }

    out
}

/// Classified latest value of every configured indicator, in build order.
pub fn latest_results(
    series: &TimeSeries,
    config: &IndicatorConfig,
    classifier: &Classifier,
) -> Vec<IndicatorResult> {
    let indicators = build_indicators(config);
    let values = IndicatorValues::compute_all(series, &indicators);

    let prices = series.prices();
    let Some(&price) = prices.last() else {
        return Vec::new();
    };
    let last = prices.len() - 1;
    let previous_price = last.checked_sub(1).map(|i| prices[i]);

    let mut results = Vec::with_capacity(indicators.len());
    for indicator in &indicators {
        let name = indicator.name();
        let value = values.get(name, last).unwrap_or(f64::NAN);
        if value.is_nan() {
            tracing::debug!(indicator = name, bars = prices.len(), "undefined at last bar, skipped");
            continue;
        }

        let ctx = ClassificationContext {
            price,
            previous_price,
            previous_value: last.checked_sub(1).and_then(|i| values.get(name, i)),
            period: indicator.period(),
        };
        results.push(IndicatorResult {
            name: name.to_string(),
            value,
            action: classifier.classify(name, value, &ctx),
        });
    }
    results
}
