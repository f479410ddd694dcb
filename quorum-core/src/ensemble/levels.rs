//! Support/resistance bands and risk/reward buckets.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Signal;

/// Support multipliers, nearer first.
pub const SUPPORT_BANDS: [f64; 2] = [0.95, 0.90];
/// Resistance multipliers, nearer first.
pub const RESISTANCE_BANDS: [f64; 2] = [1.05, 1.10];

/// Bucket comparisons tolerate float noise from the percentage arithmetic, so a
/// symmetric 5% / 5% trade lands on exactly "Moderate".
const RATIO_TOLERANCE: f64 = 1e-9;

/// Fixed-percentage support and resistance levels around a reference price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLevels {
    pub support_near: f64,
    pub support_far: f64,
    pub resistance_near: f64,
    pub resistance_far: f64,
}

impl PriceLevels {
    pub fn around(price: f64) -> Self {
        Self {
            support_near: price * SUPPORT_BANDS[0],
            support_far: price * SUPPORT_BANDS[1],
            resistance_near: price * RESISTANCE_BANDS[0],
            resistance_far: price * RESISTANCE_BANDS[1],
        }
    }

    /// `(target, stop)` for a signal entered at `entry`.
    ///
    /// Buy targets the nearer resistance and stops at the nearer support; Sell
    /// is the mirror image. Hold targets the entry itself with the nearer
    /// support as the protective level.
    pub fn target_and_stop(&self, signal: Signal, entry: f64) -> (f64, f64) {
        match signal {
            Signal::Buy => (self.resistance_near, self.support_near),
            Signal::Sell => (self.support_near, self.resistance_near),
            Signal::Hold => (entry, self.support_near),
        }
    }
}

/// Qualitative risk/reward bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskRewardAssessment {
    /// ratio ≥ 2
    Favorable,
    /// 1 ≤ ratio < 2
    Moderate,
    /// ratio < 1
    Unfavorable,
}

impl RiskRewardAssessment {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio + RATIO_TOLERANCE >= 2.0 {
            Self::Favorable
        } else if ratio + RATIO_TOLERANCE >= 1.0 {
            Self::Moderate
        } else {
            Self::Unfavorable
        }
    }
}

impl fmt::Display for RiskRewardAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Favorable => "Favorable",
            Self::Moderate => "Moderate",
            Self::Unfavorable => "Unfavorable",
        };
        f.pad(s)
    }
}

/// Percent change from `entry` to `level`. Zero entry yields 0.
pub fn percent_change(entry: f64, level: f64) -> f64 {
    if entry == 0.0 {
        0.0
    } else {
        (level - entry) / entry * 100.0
    }
}

/// |gain / loss|, or 0 when there is no downside to measure against.
pub fn risk_reward_ratio(gain_percent: f64, loss_percent: f64) -> f64 {
    if loss_percent == 0.0 {
        0.0
    } else {
        (gain_percent / loss_percent).abs()
    }
}
