//! Ensemble combination of model predictions into one trading signal.

pub mod combiner;
pub mod levels;

pub use combiner::{CombineError, Combiner, DegeneratePolicy, VoteTally};
pub use levels::{
    percent_change, risk_reward_ratio, PriceLevels, RiskRewardAssessment, RESISTANCE_BANDS,
    SUPPORT_BANDS,
};
