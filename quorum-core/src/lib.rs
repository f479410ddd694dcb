//! Quorum Core — indicators, classifier, predictor profiles, ensemble combiner.
//!
//! This crate turns a price/volume history into a single trading signal:
//! - Domain types (time series, predictions, combined results)
//! - Indicator library (SMA, EMA, VWMA, RSI, MACD, Bollinger) with NaN warmup
//! - Rule-based classification of the latest indicator readings
//! - Predictor profiles behind one trait, driven by seeded random streams
//! - Confidence-weighted ensemble voting with support/resistance levels
//! - TOML engine configuration and an `Analyzer` that runs the whole pipeline

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod ensemble;
pub mod indicators;
pub mod predictor;
pub mod rng;

pub use analysis::{Analysis, AnalysisError, Analyzer};
pub use config::{ConfigError, EngineConfig};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types that cross the rayon pool are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::TimeSeries>();
        require_sync::<domain::TimeSeries>();
        require_send::<domain::ModelPrediction>();
        require_sync::<domain::ModelPrediction>();
        require_send::<domain::CombinedResult>();
        require_sync::<domain::CombinedResult>();

        // Pipeline stages
        require_send::<predictor::ProfilePredictor>();
        require_sync::<predictor::ProfilePredictor>();
        require_send::<Box<dyn predictor::Predictor>>();
        require_sync::<Box<dyn predictor::Predictor>>();
        require_send::<Box<dyn indicators::Indicator>>();
        require_sync::<Box<dyn indicators::Indicator>>();
        require_send::<ensemble::Combiner>();
        require_sync::<ensemble::Combiner>();
        require_send::<Analyzer>();
        require_sync::<Analyzer>();
    }
}
