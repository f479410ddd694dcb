//! CombinedResult — the single record an ensemble call hands back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::action::Signal;
use super::prediction::ModelPrediction;

/// Ensemble decision with trade levels.
///
/// Created once per combination call and never mutated. Percentages are in
/// percent units (5.0 means 5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedResult {
    pub ticker: String,
    pub predictions: Vec<ModelPrediction>,
    pub signal: Signal,
    pub confidence: f64,
    pub combined_price: f64,
    pub entry_price: f64,
    pub target_price: f64,
    pub stop_loss_price: f64,
    pub potential_gain_percent: f64,
    pub potential_loss_percent: f64,
    pub risk_reward_ratio: f64,
    pub reasoning: String,
    pub timestamp: DateTime<Utc>,
}
