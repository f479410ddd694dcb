//! End-to-end analysis of one ticker.
//!
//! Computes the indicator snapshot, runs every configured predictor with its
//! own seeded random stream, and combines the surviving predictions. A
//! predictor that fails (short history, undefined feature) is logged and left
//! out; only when all of them fail does the analysis fail.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::classifier::Classifier;
use crate::config::{ConfigError, EngineConfig};
use crate::domain::{CombinedResult, IndicatorResult, ModelPrediction, TimeSeries};
use crate::ensemble::{CombineError, Combiner};
use crate::indicators::latest_results;
use crate::predictor::{Predictor, ProfilePredictor};
use crate::rng::RngHierarchy;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Combine(#[from] CombineError),
}

/// Indicator snapshot plus combined signal for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub ticker: String,
    pub indicators: Vec<IndicatorResult>,
    pub result: CombinedResult,
}

pub struct Analyzer {
    config: EngineConfig,
    predictors: Vec<Box<dyn Predictor>>,
    classifier: Classifier,
    combiner: Combiner,
    rng: RngHierarchy,
}

impl Analyzer {
    /// Build an analyzer whose predictors are the config's profiles.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let predictors = config
            .profiles
            .iter()
            .cloned()
            .map(|spec| Box::new(ProfilePredictor::new(spec)) as Box<dyn Predictor>)
            .collect();
        Ok(Self::build(config, predictors))
    }

    /// Build an analyzer around arbitrary predictors. The config's profile
    /// list is ignored.
    ///
    /// Model types must be unique: each one keys its own random stream.
    pub fn with_predictors(
        config: EngineConfig,
        predictors: Vec<Box<dyn Predictor>>,
    ) -> Result<Self, ConfigError> {
        let mut seen = BTreeSet::new();
        let problems: Vec<String> = predictors
            .iter()
            .filter(|p| !seen.insert(p.model_type().to_string()))
            .map(|p| format!("duplicate predictor model_type '{}'", p.model_type()))
            .collect();
        if !problems.is_empty() {
            return Err(ConfigError::Invalid(problems));
        }
        Ok(Self::build(config, predictors))
    }

    fn build(config: EngineConfig, predictors: Vec<Box<dyn Predictor>>) -> Self {
        Self {
            classifier: Classifier::new(config.classifier),
            combiner: Combiner::new(config.ensemble.degenerate_weights),
            rng: RngHierarchy::new(config.master_seed),
            predictors,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn predictors(&self) -> impl Iterator<Item = &dyn Predictor> {
        self.predictors.iter().map(|p| p.as_ref())
    }

    pub fn analyze(&self, ticker: &str, series: &TimeSeries) -> Result<Analysis, AnalysisError> {
        self.analyze_at(ticker, series, Utc::now())
    }

    /// Analyze with an explicit result timestamp.
    pub fn analyze_at(
        &self,
        ticker: &str,
        series: &TimeSeries,
        timestamp: DateTime<Utc>,
    ) -> Result<Analysis, AnalysisError> {
        let indicators = latest_results(series, &self.config.indicators, &self.classifier);
        let predictions = self.predict_all(ticker, series);

        if predictions.is_empty() {
            return Err(CombineError::NoPredictionsAvailable {
                ticker: ticker.to_string(),
                attempted: self.predictors.len(),
            }
            .into());
        }

        let result = self.combiner.combine_at(ticker, &predictions, timestamp)?;
        tracing::info!(
            ticker,
            signal = %result.signal,
            confidence = result.confidence,
            predictions = predictions.len(),
            attempted = self.predictors.len(),
            "analysis complete"
        );

        Ok(Analysis {
            ticker: ticker.to_string(),
            indicators,
            result,
        })
    }

    /// Run every predictor, keeping successes in predictor order.
    ///
    /// Each predictor draws from the stream keyed by `(ticker, model_type)`,
    /// so the output does not depend on `parallel`.
    pub fn predict_all(&self, ticker: &str, series: &TimeSeries) -> Vec<ModelPrediction> {
        let run = |predictor: &Box<dyn Predictor>| {
            let mut rng = self.rng.rng_for(ticker, predictor.model_type());
            match predictor.predict(series, &mut rng) {
                Ok(prediction) => Some(prediction),
                Err(e) => {
                    tracing::warn!(ticker, model_type = predictor.model_type(), error = %e, "predictor failed");
                    None
                }
            }
        };

        let outcomes: Vec<Option<ModelPrediction>> = if self.config.parallel {
            self.predictors.par_iter().map(run).collect()
        } else {
            self.predictors.iter().map(run).collect()
        };
        outcomes.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, Signal};
    use crate::indicators::make_series;
    use crate::predictor::{PredictError, Profile};
    use chrono::TimeZone;
    use rand::RngCore;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 20, 0, 0).unwrap()
    }

    fn wavy(n: usize) -> TimeSeries {
        let prices: Vec<f64> = (0..n)
            .map(|i| 100.0 + i as f64 * 0.3 + (i as f64 * 0.7).sin() * 2.0)
            .collect();
        make_series(&prices)
    }

    struct Fixed(&'static str, f64, Direction, f64);

    impl Predictor for Fixed {
        fn model_type(&self) -> &str {
            self.0
        }
        fn min_lookback(&self) -> usize {
            1
        }
        fn predict(
            &self,
            _series: &TimeSeries,
            _rng: &mut dyn RngCore,
        ) -> Result<ModelPrediction, PredictError> {
            Ok(ModelPrediction::new(self.0, self.1, self.2, self.3))
        }
    }

    struct Failing;

    impl Predictor for Failing {
        fn model_type(&self) -> &str {
            "broken"
        }
        fn min_lookback(&self) -> usize {
            usize::MAX
        }
        fn predict(
            &self,
            series: &TimeSeries,
            _rng: &mut dyn RngCore,
        ) -> Result<ModelPrediction, PredictError> {
            Err(PredictError::InsufficientHistory {
                model_type: "broken".into(),
                required: usize::MAX,
                available: series.len(),
            })
        }
    }

    #[test]
    fn default_profiles_produce_a_full_analysis() {
        let analyzer = Analyzer::new(EngineConfig::default()).unwrap();
        let analysis = analyzer.analyze_at("AAPL", &wavy(120), at()).unwrap();
        assert_eq!(analysis.ticker, "AAPL");
        assert_eq!(analysis.result.predictions.len(), 3);
        assert!(!analysis.indicators.is_empty());
        let r = &analysis.result;
        assert!((0.0..=1.0).contains(&r.confidence));
        assert!(r.combined_price.is_finite());
        assert_eq!(r.timestamp, at());
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let series = wavy(120);
        let parallel = Analyzer::new(EngineConfig::default()).unwrap();
        let sequential = Analyzer::new(EngineConfig {
            parallel: false,
            ..EngineConfig::default()
        })
        .unwrap();
        assert_eq!(
            parallel.analyze_at("MSFT", &series, at()).unwrap(),
            sequential.analyze_at("MSFT", &series, at()).unwrap()
        );
    }

    #[test]
    fn seed_changes_draws() {
        let series = wavy(120);
        let a = Analyzer::new(EngineConfig::default()).unwrap();
        let b = Analyzer::new(EngineConfig {
            master_seed: 7,
            ..EngineConfig::default()
        })
        .unwrap();
        let pa = a.predict_all("SPY", &series);
        let pb = b.predict_all("SPY", &series);
        assert_ne!(pa, pb);
        assert_eq!(pa, a.predict_all("SPY", &series));
    }

    #[test]
    fn short_history_drops_slow_profiles() {
        // 40 bars: enough for fast_reacting (21) and statistical (31), not slow_robust (51)
        let analyzer = Analyzer::new(EngineConfig::default()).unwrap();
        let predictions = analyzer.predict_all("SPY", &wavy(40));
        let models: Vec<&str> = predictions.iter().map(|p| p.model_type.as_str()).collect();
        assert_eq!(models, vec!["lstm", "arima"]);
    }

    #[test]
    fn all_failures_report_attempted_count() {
        let analyzer = Analyzer::new(EngineConfig::default()).unwrap();
        let err = analyzer.analyze_at("SPY", &wavy(10), at()).unwrap_err();
        match err {
            AnalysisError::Combine(CombineError::NoPredictionsAvailable { ticker, attempted }) => {
                assert_eq!(ticker, "SPY");
                assert_eq!(attempted, Profile::ALL.len());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn injected_predictors_are_combined() {
        let predictors: Vec<Box<dyn Predictor>> = vec![
            Box::new(Fixed("lstm", 110.0, Direction::Up, 0.8)),
            Box::new(Failing),
            Box::new(Fixed("xgboost", 108.0, Direction::Up, 0.6)),
            Box::new(Fixed("arima", 95.0, Direction::Down, 0.3)),
        ];
        let analyzer = Analyzer::with_predictors(EngineConfig::default(), predictors).unwrap();
        let analysis = analyzer.analyze_at("AAPL", &wavy(5), at()).unwrap();
        assert_eq!(analysis.result.signal, Signal::Buy);
        assert_eq!(analysis.result.predictions.len(), 3);
        assert!((analysis.result.confidence - 1.4 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn injected_predictors_must_not_share_a_stream() {
        let predictors: Vec<Box<dyn Predictor>> = vec![
            Box::new(Fixed("lstm", 110.0, Direction::Up, 0.8)),
            Box::new(Fixed("lstm", 95.0, Direction::Down, 0.3)),
        ];
        match Analyzer::with_predictors(EngineConfig::default(), predictors) {
            Err(ConfigError::Invalid(problems)) => {
                assert_eq!(problems, vec!["duplicate predictor model_type 'lstm'".to_string()]);
            }
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("duplicate model types were accepted"),
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig {
            profiles: Vec::new(),
            ..EngineConfig::default()
        };
        assert!(matches!(Analyzer::new(config), Err(ConfigError::Invalid(_))));
    }
}
