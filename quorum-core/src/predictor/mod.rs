//! Per-model predictors.
//!
//! A predictor turns a `TimeSeries` into one `ModelPrediction`. Every profile
//! sits behind the same `Predictor` trait, so the ensemble never needs to know
//! how many profiles exist or what kind they are.
//!
//! Profiles stand in for unavailable model inference: the only randomness they
//! use is the generator passed to `predict`, so a seeded generator makes every
//! prediction reproducible. A real model can be wired behind the same trait
//! without touching the combiner.

pub mod bias;
pub mod profile;

pub use bias::DirectionalBias;
pub use profile::{ConfidenceRange, Profile, ProfilePredictor, ProfileSpec};

use rand::RngCore;
use thiserror::Error;

use crate::domain::{ModelPrediction, TimeSeries};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("{model_type}: insufficient history (need {required} bars, have {available})")]
    InsufficientHistory {
        model_type: String,
        required: usize,
        available: usize,
    },

    #[error("{model_type}: latest price {price} is not a positive finite number")]
    InvalidPrice { model_type: String, price: f64 },

    #[error("{model_type}: {feature} is undefined over the lookback window")]
    UndefinedFeature { model_type: String, feature: String },

    #[error("{model_type}: invalid profile: {}", .problems.join("; "))]
    InvalidSpec {
        model_type: String,
        problems: Vec<String>,
    },
}

/// One interchangeable prediction strategy.
pub trait Predictor: Send + Sync {
    /// Model type reported on every prediction (e.g., "lstm").
    fn model_type(&self) -> &str;

    /// Minimum number of bars `predict` needs.
    fn min_lookback(&self) -> usize;

    /// Predict from the full series, drawing any randomness from `rng`.
    fn predict(
        &self,
        series: &TimeSeries,
        rng: &mut dyn RngCore,
    ) -> Result<ModelPrediction, PredictError>;
}
