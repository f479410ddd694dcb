//! Directional bias functions.
//!
//! A bias reduces the price history to a score in [-1, 1]: positive leans up,
//! negative leans down. Scores are normalized by return volatility so the same
//! bias behaves alike on a $5 and a $500 instrument.

use serde::{Deserialize, Serialize};

use crate::indicators::{bollinger, ema};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectionalBias {
    /// Rate of change over `window` bars, in units of expected volatility.
    Momentum { window: usize },
    /// Gap between a fast and a slow EMA, in units of volatility.
    TrendFollowing { fast: usize, slow: usize },
    /// Negative Bollinger z-score: stretched above the band leans down.
    MeanReversion { period: usize, multiplier: f64 },
}

impl DirectionalBias {
    /// Bars needed before `score` is defined.
    pub fn min_lookback(&self) -> usize {
        match *self {
            Self::Momentum { window } => window + 1,
            Self::TrendFollowing { fast, slow } => fast.max(slow),
            Self::MeanReversion { period, .. } => period,
        }
    }

    pub fn feature_name(&self) -> &'static str {
        match self {
            Self::Momentum { .. } => "momentum",
            Self::TrendFollowing { .. } => "ema_gap",
            Self::MeanReversion { .. } => "bollinger_z",
        }
    }

    /// Score the latest bar of `prices`. `volatility` is the per-bar return
    /// standard deviation. Returns NaN when the inputs are undefined.
    pub fn score(&self, prices: &[f64], volatility: f64) -> f64 {
        let n = prices.len();
        if n < self.min_lookback() || n == 0 {
            return f64::NAN;
        }
        let last = prices[n - 1];

        match *self {
            Self::Momentum { window } => {
                let base = prices[n - 1 - window];
                let roc = last / base - 1.0;
                normalize(roc, volatility * (window as f64).sqrt())
            }
            Self::TrendFollowing { fast, slow } => {
                let fast_ema = ema(prices, fast)[n - 1];
                let slow_ema = ema(prices, slow)[n - 1];
                normalize(fast_ema / slow_ema - 1.0, volatility)
            }
            Self::MeanReversion { period, multiplier } => {
                let bands = bollinger(prices, period, multiplier);
                let sd = bands.std_dev[n - 1];
                if sd == 0.0 || multiplier == 0.0 {
                    return if sd.is_nan() { f64::NAN } else { 0.0 };
                }
                let z = (last - bands.middle[n - 1]) / sd;
                (-z / multiplier).clamp(-1.0, 1.0)
            }
        }
    }
}

/// Scale `raw` by `scale` and clamp into [-1, 1]. A zero scale keeps only the sign.
fn normalize(raw: f64, scale: f64) -> f64 {
    if raw.is_nan() || scale.is_nan() {
        return f64::NAN;
    }
    if scale > 0.0 {
        (raw / scale).clamp(-1.0, 1.0)
    } else if raw > 0.0 {
        1.0
    } else if raw < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn momentum_sign_follows_rate_of_change() {
        let bias = DirectionalBias::Momentum { window: 3 };
        assert!(bias.score(&[100.0, 101.0, 102.0, 103.0], 0.01) > 0.0);
        assert!(bias.score(&[103.0, 102.0, 101.0, 100.0], 0.01) < 0.0);
    }

    #[test]
    fn momentum_normalizes_by_volatility() {
        // roc = 0.03, scale = 0.01 * sqrt(4) = 0.02 → clamped to 1
        let bias = DirectionalBias::Momentum { window: 4 };
        assert_eq!(bias.score(&[100.0, 100.0, 100.0, 100.0, 103.0], 0.01), 1.0);
        // roc = 0.01, scale = 0.02 → 0.5
        assert_approx(bias.score(&[100.0, 100.0, 100.0, 100.0, 101.0], 0.01), 0.5, 1e-9);
    }

    #[test]
    fn zero_volatility_keeps_sign() {
        let bias = DirectionalBias::Momentum { window: 1 };
        assert_eq!(bias.score(&[100.0, 100.0], 0.0), 0.0);
        assert_eq!(bias.score(&[100.0, 101.0], 0.0), 1.0);
    }

    #[test]
    fn trend_following_leans_with_fast_over_slow() {
        let bias = DirectionalBias::TrendFollowing { fast: 3, slow: 6 };
        let rising: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let falling: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        assert!(bias.score(&rising, 0.01) > 0.0);
        assert!(bias.score(&falling, 0.01) < 0.0);
    }

    #[test]
    fn mean_reversion_leans_against_stretch() {
        let bias = DirectionalBias::MeanReversion {
            period: 5,
            multiplier: 2.0,
        };
        assert!(bias.score(&[100.0, 100.0, 100.0, 100.0, 110.0], 0.01) < 0.0);
        assert!(bias.score(&[100.0, 100.0, 100.0, 100.0, 90.0], 0.01) > 0.0);
        assert_eq!(bias.score(&[100.0; 5], 0.0), 0.0);
    }

    #[test]
    fn short_history_is_nan() {
        let bias = DirectionalBias::TrendFollowing { fast: 3, slow: 6 };
        assert!(bias.score(&[1.0, 2.0, 3.0], 0.01).is_nan());
    }

    #[test]
    fn min_lookbacks() {
        assert_eq!(DirectionalBias::Momentum { window: 5 }.min_lookback(), 6);
        assert_eq!(DirectionalBias::TrendFollowing { fast: 12, slow: 26 }.min_lookback(), 26);
        assert_eq!(
            DirectionalBias::MeanReversion {
                period: 20,
                multiplier: 2.0
            }
            .min_lookback(),
            20
        );
    }
}
