//! Indicator classifier — maps a latest indicator reading to Buy / Sell / Neutral.
//!
//! One explicit rule per indicator family, applied uniformly to every
//! indicator of that family:
//!
//! | Family            | Rule                                                      |
//! |-------------------|-----------------------------------------------------------|
//! | Moving average    | `MovingAverageRule` (price above ⇒ Buy, below ⇒ Sell)      |
//! | RSI               | `RsiRule` (default: always Neutral)                       |
//! | MACD components   | value > 0 ⇒ Buy, < 0 ⇒ Sell                               |
//! | Bollinger upper   | price above band ⇒ Sell                                   |
//! | Bollinger lower   | price below band ⇒ Buy                                    |
//! | anything else     | Neutral                                                   |
//!
//! The Bollinger middle band is an SMA and is classified as a moving average.

use serde::{Deserialize, Serialize};

use crate::domain::Action;

/// Indicator family, derived from the indicator's name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorFamily {
    MovingAverage,
    Rsi,
    Macd,
    BollingerUpper,
    BollingerLower,
    Unknown,
}

impl IndicatorFamily {
    pub fn from_name(name: &str) -> Self {
        if name.starts_with("sma_")
            || name.starts_with("ema_")
            || name.starts_with("vwma_")
            || name.starts_with("bollinger_middle")
        {
            Self::MovingAverage
        } else if name.starts_with("rsi_") {
            Self::Rsi
        } else if name.starts_with("macd_") {
            Self::Macd
        } else if name.starts_with("bollinger_upper") {
            Self::BollingerUpper
        } else if name.starts_with("bollinger_lower") {
            Self::BollingerLower
        } else {
            Self::Unknown
        }
    }
}

/// What the classifier may look at besides the indicator value itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationContext {
    /// Price at the bar being classified.
    pub price: f64,
    /// Price one bar earlier.
    pub previous_price: Option<f64>,
    /// Indicator value one bar earlier.
    pub previous_value: Option<f64>,
    /// Indicator period, when it has one.
    pub period: Option<usize>,
}

impl ClassificationContext {
    pub fn at_price(price: f64) -> Self {
        Self {
            price,
            previous_price: None,
            previous_value: None,
            period: None,
        }
    }
}

/// Rule for moving averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MovingAverageRule {
    /// Price above MA ⇒ Buy, below ⇒ Sell, equal ⇒ Neutral.
    PriceRelative,
    /// As `PriceRelative`, except an MA with period ≥ `slow_period` that sits
    /// above price but rose more than price over the last bar is tagged Buy.
    SlowMaMomentum { slow_period: usize },
}

/// Rule for RSI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RsiRule {
    /// RSI is informational only: every reading is Neutral.
    AlwaysNeutral,
    /// RSI above `overbought` ⇒ Sell, below `oversold` ⇒ Buy.
    Thresholds { overbought: f64, oversold: f64 },
}

/// Per-family classification policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierPolicy {
    pub moving_average: MovingAverageRule,
    pub rsi: RsiRule,
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self {
            moving_average: MovingAverageRule::PriceRelative,
            rsi: RsiRule::AlwaysNeutral,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    policy: ClassifierPolicy,
}

impl Classifier {
    pub fn new(policy: ClassifierPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ClassifierPolicy {
        &self.policy
    }

    /// Classify an indicator reading. NaN readings are Neutral.
    pub fn classify(&self, name: &str, value: f64, ctx: &ClassificationContext) -> Action {
        if value.is_nan() || ctx.price.is_nan() {
            return Action::Neutral;
        }

        match IndicatorFamily::from_name(name) {
            IndicatorFamily::MovingAverage => self.classify_moving_average(value, ctx),
            IndicatorFamily::Rsi => self.classify_rsi(value),
            IndicatorFamily::Macd => by_sign(value),
            IndicatorFamily::BollingerUpper => {
                if ctx.price > value {
                    Action::Sell
                } else {
                    Action::Neutral
                }
            }
            IndicatorFamily::BollingerLower => {
                if ctx.price < value {
                    Action::Buy
                } else {
                    Action::Neutral
                }
            }
            IndicatorFamily::Unknown => Action::Neutral,
        }
    }

    fn classify_moving_average(&self, ma: f64, ctx: &ClassificationContext) -> Action {
        let price = ctx.price;
        if price > ma {
            return Action::Buy;
        }
        if price == ma {
            return Action::Neutral;
        }

        // Price below the average.
        match self.policy.moving_average {
            MovingAverageRule::PriceRelative => Action::Sell,
            MovingAverageRule::SlowMaMomentum { slow_period } => {
                let is_slow = ctx.period.is_some_and(|p| p >= slow_period);
                let outpacing = match (ctx.previous_value, ctx.previous_price) {
                    (Some(prev_ma), Some(prev_price))
                        if !prev_ma.is_nan() && !prev_price.is_nan() =>
                    {
                        let ma_delta = ma - prev_ma;
                        ma_delta > 0.0 && ma_delta > price - prev_price
                    }
                    _ => false,
                };
                if is_slow && outpacing {
                    Action::Buy
                } else {
                    Action::Sell
                }
            }
        }
    }

    fn classify_rsi(&self, value: f64) -> Action {
        match self.policy.rsi {
            RsiRule::AlwaysNeutral => Action::Neutral,
            RsiRule::Thresholds {
                overbought,
                oversold,
            } => {
                if value > overbought {
                    Action::Sell
                } else if value < oversold {
                    Action::Buy
                } else {
                    Action::Neutral
                }
            }
        }
    }
}

fn by_sign(value: f64) -> Action {
    if value > 0.0 {
        Action::Buy
    } else if value < 0.0 {
        Action::Sell
    } else {
        Action::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(price: f64) -> ClassificationContext {
        ClassificationContext::at_price(price)
    }

    #[test]
    fn family_from_name() {
        assert_eq!(IndicatorFamily::from_name("sma_20"), IndicatorFamily::MovingAverage);
        assert_eq!(IndicatorFamily::from_name("vwma_20"), IndicatorFamily::MovingAverage);
        assert_eq!(
            IndicatorFamily::from_name("bollinger_middle_20_2"),
            IndicatorFamily::MovingAverage
        );
        assert_eq!(IndicatorFamily::from_name("rsi_14"), IndicatorFamily::Rsi);
        assert_eq!(IndicatorFamily::from_name("macd_histogram"), IndicatorFamily::Macd);
        assert_eq!(
            IndicatorFamily::from_name("bollinger_lower_20_2"),
            IndicatorFamily::BollingerLower
        );
        assert_eq!(IndicatorFamily::from_name("obv"), IndicatorFamily::Unknown);
    }

    #[test]
    fn price_relative_moving_average() {
        let c = Classifier::default();
        assert_eq!(c.classify("sma_20", 100.0, &ctx(105.0)), Action::Buy);
        assert_eq!(c.classify("ema_50", 100.0, &ctx(95.0)), Action::Sell);
        assert_eq!(c.classify("sma_20", 100.0, &ctx(100.0)), Action::Neutral);
    }

    #[test]
    fn slow_ma_momentum_tags_rising_slow_average_buy() {
        let c = Classifier::new(ClassifierPolicy {
            moving_average: MovingAverageRule::SlowMaMomentum { slow_period: 50 },
            ..ClassifierPolicy::default()
        });
        let rising = ClassificationContext {
            price: 95.0,
            previous_price: Some(95.5),
            previous_value: Some(99.0),
            period: Some(200),
        };
        assert_eq!(c.classify("sma_200", 100.0, &rising), Action::Buy);

        // Same shape on a fast average stays Sell
        let fast = ClassificationContext {
            period: Some(20),
            ..rising
        };
        assert_eq!(c.classify("sma_20", 100.0, &fast), Action::Sell);

        // Slow average that is falling stays Sell
        let falling = ClassificationContext {
            previous_value: Some(101.0),
            ..rising
        };
        assert_eq!(c.classify("sma_200", 100.0, &falling), Action::Sell);

        // Missing history cannot establish momentum
        let bare = ClassificationContext {
            period: Some(200),
            ..ctx(95.0)
        };
        assert_eq!(c.classify("sma_200", 100.0, &bare), Action::Sell);
    }

    #[test]
    fn rsi_is_neutral_by_default_even_in_extreme_zones() {
        let c = Classifier::default();
        for value in [5.0, 29.9, 50.0, 70.1, 95.0] {
            assert_eq!(c.classify("rsi_14", value, &ctx(100.0)), Action::Neutral);
        }
    }

    #[test]
    fn rsi_thresholds_are_opt_in() {
        let c = Classifier::new(ClassifierPolicy {
            rsi: RsiRule::Thresholds {
                overbought: 70.0,
                oversold: 30.0,
            },
            ..ClassifierPolicy::default()
        });
        assert_eq!(c.classify("rsi_14", 75.0, &ctx(100.0)), Action::Sell);
        assert_eq!(c.classify("rsi_14", 25.0, &ctx(100.0)), Action::Buy);
        assert_eq!(c.classify("rsi_14", 70.0, &ctx(100.0)), Action::Neutral);
    }

    #[test]
    fn macd_by_sign() {
        let c = Classifier::default();
        assert_eq!(c.classify("macd_histogram", 0.4, &ctx(100.0)), Action::Buy);
        assert_eq!(c.classify("macd_line", -0.4, &ctx(100.0)), Action::Sell);
        assert_eq!(c.classify("macd_signal", 0.0, &ctx(100.0)), Action::Neutral);
    }

    #[test]
    fn bollinger_bands_are_mean_reverting() {
        let c = Classifier::default();
        assert_eq!(c.classify("bollinger_upper_20_2", 110.0, &ctx(111.0)), Action::Sell);
        assert_eq!(c.classify("bollinger_upper_20_2", 110.0, &ctx(105.0)), Action::Neutral);
        assert_eq!(c.classify("bollinger_lower_20_2", 90.0, &ctx(89.0)), Action::Buy);
        assert_eq!(c.classify("bollinger_lower_20_2", 90.0, &ctx(95.0)), Action::Neutral);
    }

    #[test]
    fn nan_and_unknown_are_neutral() {
        let c = Classifier::default();
        assert_eq!(c.classify("sma_20", f64::NAN, &ctx(100.0)), Action::Neutral);
        assert_eq!(c.classify("mystery", 1.0, &ctx(100.0)), Action::Neutral);
    }

    #[test]
    fn policy_toml_roundtrip() {
        let toml_str = r#"
            [moving_average]
            rule = "slow_ma_momentum"
            slow_period = 50

            [rsi]
            rule = "thresholds"
            overbought = 80.0
            oversold = 20.0
        "#;
        let policy: ClassifierPolicy = toml::from_str(toml_str).unwrap();
        assert_eq!(
            policy.moving_average,
            MovingAverageRule::SlowMaMomentum { slow_period: 50 }
        );
        assert_eq!(
            policy.rsi,
            RsiRule::Thresholds {
                overbought: 80.0,
                oversold: 20.0
            }
        );
    }
}
