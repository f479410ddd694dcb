//! Confidence-weighted voting over model predictions.
//!
//! Each prediction votes for its direction with weight equal to its own
//! confidence. The strict winner among Up / Down / Neutral decides Buy / Sell /
//! Hold; any tie is Hold. Combined confidence is the mean confidence scaled by
//! the winning share of the vote, so a split vote is discounted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;

use super::levels::{percent_change, risk_reward_ratio, PriceLevels, RiskRewardAssessment};
use crate::domain::{CombinedResult, Direction, ModelPrediction, Signal};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CombineError {
    #[error("no predictions available for {ticker} ({attempted} profiles attempted)")]
    NoPredictionsAvailable { ticker: String, attempted: usize },

    #[error("all {attempted} predictions for {ticker} have zero confidence")]
    DegenerateWeights { ticker: String, attempted: usize },

    #[error("prediction from {model_type} for {ticker} has non-finite price {price}")]
    InvalidPrediction {
        ticker: String,
        model_type: String,
        price: f64,
    },

    #[error("prediction from {model_type} for {ticker} has confidence {confidence} outside [0, 1]")]
    InvalidConfidence {
        ticker: String,
        model_type: String,
        confidence: f64,
    },
}

/// What to do when every prediction has zero confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Average prices with equal weights, emit Hold at zero confidence.
    #[default]
    EqualVote,
    /// Surface `CombineError::DegenerateWeights` to the caller.
    Reject,
}

/// Weighted vote totals per direction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoteTally {
    pub up: f64,
    pub down: f64,
    pub neutral: f64,
}

impl VoteTally {
    pub fn from_weights(votes: impl IntoIterator<Item = (Direction, f64)>) -> Self {
        let mut tally = Self::default();
        for (direction, weight) in votes {
            match direction {
                Direction::Up => tally.up += weight,
                Direction::Down => tally.down += weight,
                Direction::Neutral => tally.neutral += weight,
            }
        }
        tally
    }

    pub fn total(&self) -> f64 {
        self.up + self.down + self.neutral
    }

    /// Buy / Sell only on a strict maximum; everything else is Hold.
    pub fn signal(&self) -> Signal {
        if self.up > self.down && self.up > self.neutral {
            Signal::Buy
        } else if self.down > self.up && self.down > self.neutral {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }

    /// Weight behind the winning side. For Hold this is the largest tally.
    pub fn winning_votes(&self, signal: Signal) -> f64 {
        match signal {
            Signal::Buy => self.up,
            Signal::Sell => self.down,
            Signal::Hold => self.up.max(self.down).max(self.neutral),
        }
    }

    /// Winning share of the total vote, 0 when nothing was cast.
    pub fn strength(&self, signal: Signal) -> f64 {
        let total = self.total();
        if total > 0.0 {
            self.winning_votes(signal) / total
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Combiner {
    degenerate_policy: DegeneratePolicy,
}

impl Combiner {
    pub fn new(degenerate_policy: DegeneratePolicy) -> Self {
        Self { degenerate_policy }
    }

    /// Combine predictions, stamping the result with the current time.
    pub fn combine(
        &self,
        ticker: &str,
        predictions: &[ModelPrediction],
    ) -> Result<CombinedResult, CombineError> {
        self.combine_at(ticker, predictions, Utc::now())
    }

    /// Combine predictions with an explicit timestamp.
    pub fn combine_at(
        &self,
        ticker: &str,
        predictions: &[ModelPrediction],
        timestamp: DateTime<Utc>,
    ) -> Result<CombinedResult, CombineError> {
        if predictions.is_empty() {
            return Err(CombineError::NoPredictionsAvailable {
                ticker: ticker.to_string(),
                attempted: 0,
            });
        }
        if let Some(bad) = predictions.iter().find(|p| !p.predicted_price.is_finite()) {
            return Err(CombineError::InvalidPrediction {
                ticker: ticker.to_string(),
                model_type: bad.model_type.clone(),
                price: bad.predicted_price,
            });
        }
        // NaN fails the range check too
        if let Some(bad) = predictions
            .iter()
            .find(|p| !(0.0..=1.0).contains(&p.confidence))
        {
            return Err(CombineError::InvalidConfidence {
                ticker: ticker.to_string(),
                model_type: bad.model_type.clone(),
                confidence: bad.confidence,
            });
        }

        let count = predictions.len() as f64;
        let confidence_sum: f64 = predictions.iter().map(|p| p.confidence).sum();
        let degenerate = confidence_sum <= 0.0;

        if degenerate {
            match self.degenerate_policy {
                DegeneratePolicy::Reject => {
                    return Err(CombineError::DegenerateWeights {
                        ticker: ticker.to_string(),
                        attempted: predictions.len(),
                    });
                }
                DegeneratePolicy::EqualVote => {
                    tracing::warn!(
                        ticker,
                        predictions = predictions.len(),
                        "all prediction confidences are zero; falling back to equal-vote"
                    );
                }
            }
        }

        let weight_of = |p: &ModelPrediction| if degenerate { 1.0 } else { p.confidence };

        let tally =
            VoteTally::from_weights(predictions.iter().map(|p| (p.direction, weight_of(p))));
        let total_weight = tally.total();

        // Zero conviction everywhere cannot justify a trade.
        let signal = if degenerate { Signal::Hold } else { tally.signal() };
        let strength = tally.strength(signal);
        let mean_confidence = confidence_sum / count;
        let confidence = (mean_confidence * strength).clamp(0.0, 1.0);

        let combined_price = predictions
            .iter()
            .map(|p| p.predicted_price * weight_of(p))
            .sum::<f64>()
            / total_weight;

        let levels = PriceLevels::around(combined_price);
        let entry_price = combined_price;
        let (target_price, stop_loss_price) = levels.target_and_stop(signal, entry_price);

        let potential_gain_percent = percent_change(entry_price, target_price);
        let potential_loss_percent = percent_change(entry_price, stop_loss_price);
        let risk_reward = risk_reward_ratio(potential_gain_percent, potential_loss_percent);

        tracing::debug!(
            ticker,
            up = tally.up,
            down = tally.down,
            neutral = tally.neutral,
            %signal,
            strength,
            confidence,
            combined_price,
            "ensemble vote"
        );

        let reasoning = build_reasoning(&ReasoningInput {
            ticker,
            predictions,
            signal,
            strength,
            confidence,
            target_price,
            stop_loss_price,
            risk_reward,
            degenerate,
        });

        Ok(CombinedResult {
            ticker: ticker.to_string(),
            predictions: predictions.to_vec(),
            signal,
            confidence,
            combined_price,
            entry_price,
            target_price,
            stop_loss_price,
            potential_gain_percent,
            potential_loss_percent,
            risk_reward_ratio: risk_reward,
            reasoning,
            timestamp,
        })
    }
}

struct ReasoningInput<'a> {
    ticker: &'a str,
    predictions: &'a [ModelPrediction],
    signal: Signal,
    strength: f64,
    confidence: f64,
    target_price: f64,
    stop_loss_price: f64,
    risk_reward: f64,
    degenerate: bool,
}

/// Deterministic summary: votes per direction, confidence, levels, R/R bucket.
fn build_reasoning(input: &ReasoningInput<'_>) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "{}: {} from {} model{}.",
        input.ticker,
        input.signal,
        input.predictions.len(),
        if input.predictions.len() == 1 { "" } else { "s" }
    );

    for direction in Direction::ALL {
        let voters: Vec<String> = input
            .predictions
            .iter()
            .filter(|p| p.direction == direction)
            .map(|p| format!("{} ({:.0}%)", p.model_type, p.confidence * 100.0))
            .collect();
        let list = if voters.is_empty() {
            "none".to_string()
        } else {
            voters.join(", ")
        };
        let _ = write!(out, " {direction}: {list}.");
    }

    let _ = write!(
        out,
        " Vote strength {:.1}%, confidence {:.1}%.",
        input.strength * 100.0,
        input.confidence * 100.0
    );
    let _ = write!(
        out,
        " Target {:.2}, stop {:.2}, risk/reward {:.2} ({}).",
        input.target_price,
        input.stop_loss_price,
        input.risk_reward,
        RiskRewardAssessment::from_ratio(input.risk_reward)
    );
    if input.degenerate {
        out.push_str(" All confidences were zero; equal-vote fallback applied.");
    }
    out
}
