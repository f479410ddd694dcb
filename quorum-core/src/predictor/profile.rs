//! Predictor profiles — one parameterized heuristic, several tunings.
//!
//! Profiles differ only in:
//! - the volatility multiplier that projects `predicted_price` from the latest price,
//! - the confidence range sampled,
//! - the directional bias function.
//!
//! Projection:
//! ```text
//! σ     = population std-dev of one-bar returns over `volatility_window`
//! s     = bias score in [-1, 1]
//! ε     ~ Uniform(-noise, noise)
//! move  = clamp(s + ε, -1, 1) · σ · volatility_multiplier
//! price = last · (1 + move)
//! ```
//! Direction is Up / Down when |move| exceeds `neutral_band`, Neutral otherwise.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::bias::DirectionalBias;
use super::{PredictError, Predictor};
use crate::domain::{Direction, ModelPrediction, TimeSeries};

/// Closed interval confidence is sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceRange {
    pub min: f64,
    pub max: f64,
}

impl ConfidenceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.min) && (0.0..=1.0).contains(&self.max) && self.min <= self.max
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// Full parameter set of a profile. Serializable so profiles can be tuned from config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    /// Profile name (e.g., "fast_reacting").
    pub name: String,
    /// Model type stamped on predictions (e.g., "lstm").
    pub model_type: String,
    pub volatility_window: usize,
    pub volatility_multiplier: f64,
    pub confidence: ConfidenceRange,
    /// Half-width of the uniform noise added to the bias score. 0 disables it.
    pub noise: f64,
    /// Fractional move below which the direction is Neutral.
    pub neutral_band: f64,
    pub bias: DirectionalBias,
}

impl ProfileSpec {
    /// Bars needed: enough for both the volatility window and the bias.
    pub fn min_lookback(&self) -> usize {
        (self.volatility_window + 1).max(self.bias.min_lookback())
    }

    /// Human-readable reasons this spec cannot be used, if any.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.model_type.trim().is_empty() {
            problems.push(format!("profile '{}': model_type is empty", self.name));
        }
        if self.volatility_window < 2 {
            problems.push(format!("profile '{}': volatility_window must be >= 2", self.name));
        }
        if !(self.volatility_multiplier.is_finite() && self.volatility_multiplier >= 0.0) {
            problems.push(format!(
                "profile '{}': volatility_multiplier must be finite and >= 0",
                self.name
            ));
        }
        if !self.confidence.is_valid() {
            problems.push(format!(
                "profile '{}': confidence range must satisfy 0 <= min <= max <= 1",
                self.name
            ));
        }
        if !(self.noise.is_finite() && self.noise >= 0.0) {
            problems.push(format!("profile '{}': noise must be finite and >= 0", self.name));
        }
        if !(self.neutral_band.is_finite() && self.neutral_band >= 0.0) {
            problems.push(format!("profile '{}': neutral_band must be finite and >= 0", self.name));
        }
        let bias_ok = match self.bias {
            DirectionalBias::Momentum { window } => window >= 1,
            DirectionalBias::TrendFollowing { fast, slow } => fast >= 1 && slow >= 1,
            DirectionalBias::MeanReversion { period, multiplier } => {
                period >= 2 && multiplier.is_finite() && multiplier > 0.0
            }
        };
        if !bias_ok {
            problems.push(format!("profile '{}': bias parameters out of range", self.name));
        }
        problems
    }
}

/// Built-in profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Short-window momentum, wide projection, noisy.
    FastReacting,
    /// EMA trend-following, moderate projection.
    SlowRobust,
    /// Bollinger mean-reversion, tight projection.
    Statistical,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::FastReacting, Profile::SlowRobust, Profile::Statistical];

    pub fn name(&self) -> &'static str {
        match self {
            Profile::FastReacting => "fast_reacting",
            Profile::SlowRobust => "slow_robust",
            Profile::Statistical => "statistical",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn spec(&self) -> ProfileSpec {
        match self {
            Profile::FastReacting => ProfileSpec {
                name: self.name().into(),
                model_type: "lstm".into(),
                volatility_window: 20,
                volatility_multiplier: 2.0,
                confidence: ConfidenceRange::new(0.55, 0.85),
                noise: 0.35,
                neutral_band: 0.002,
                bias: DirectionalBias::Momentum { window: 5 },
            },
            Profile::SlowRobust => ProfileSpec {
                name: self.name().into(),
                model_type: "xgboost".into(),
                volatility_window: 50,
                volatility_multiplier: 1.0,
                confidence: ConfidenceRange::new(0.60, 0.80),
                noise: 0.2,
                neutral_band: 0.002,
                bias: DirectionalBias::TrendFollowing { fast: 12, slow: 26 },
            },
            Profile::Statistical => ProfileSpec {
                name: self.name().into(),
                model_type: "arima".into(),
                volatility_window: 30,
                volatility_multiplier: 0.5,
                confidence: ConfidenceRange::new(0.50, 0.75),
                noise: 0.1,
                neutral_band: 0.001,
                bias: DirectionalBias::MeanReversion {
                    period: 20,
                    multiplier: 2.0,
                },
            },
        }
    }

    pub fn predictor(&self) -> ProfilePredictor {
        ProfilePredictor::new(self.spec())
    }
}

/// `Predictor` implementation driven by a `ProfileSpec`.
#[derive(Debug, Clone)]
pub struct ProfilePredictor {
    spec: ProfileSpec,
}

impl ProfilePredictor {
    pub fn new(spec: ProfileSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &ProfileSpec {
        &self.spec
    }

    fn undefined(&self, feature: &str) -> PredictError {
        PredictError::UndefinedFeature {
            model_type: self.spec.model_type.clone(),
            feature: feature.to_string(),
        }
    }
}

impl Predictor for ProfilePredictor {
    fn model_type(&self) -> &str {
        &self.spec.model_type
    }

    fn min_lookback(&self) -> usize {
        self.spec.min_lookback()
    }

    fn predict(
        &self,
        series: &TimeSeries,
        rng: &mut dyn RngCore,
    ) -> Result<ModelPrediction, PredictError> {
        let spec = &self.spec;
        // Specs built in code have not been through config validation.
        let problems = spec.problems();
        if !problems.is_empty() {
            return Err(PredictError::InvalidSpec {
                model_type: spec.model_type.clone(),
                problems,
            });
        }

        let required = self.min_lookback();
        let prices = series.prices();
        if prices.len() < required {
            return Err(PredictError::InsufficientHistory {
                model_type: spec.model_type.clone(),
                required,
                available: prices.len(),
            });
        }

        let price = prices[prices.len() - 1];
        if !(price.is_finite() && price > 0.0) {
            return Err(PredictError::InvalidPrice {
                model_type: spec.model_type.clone(),
                price,
            });
        }

        let window = &prices[prices.len() - spec.volatility_window - 1..];
        let volatility = return_volatility(window);
        if volatility.is_nan() {
            return Err(self.undefined("volatility"));
        }

        let score = spec.bias.score(prices, volatility);
        if score.is_nan() {
            return Err(self.undefined(spec.bias.feature_name()));
        }

        let noise = if spec.noise > 0.0 {
            rng.gen_range(-spec.noise..=spec.noise)
        } else {
            0.0
        };
        let confidence = spec.confidence.sample(rng);

        let expected_move = (score + noise).clamp(-1.0, 1.0) * volatility * spec.volatility_multiplier;
        let predicted_price = price * (1.0 + expected_move);

        let direction = if expected_move > spec.neutral_band {
            Direction::Up
        } else if expected_move < -spec.neutral_band {
            Direction::Down
        } else {
            Direction::Neutral
        };

        tracing::debug!(
            model_type = %spec.model_type,
            price,
            volatility,
            score,
            noise,
            expected_move,
            %direction,
            confidence,
            "profile prediction"
        );

        Ok(ModelPrediction::new(
            spec.model_type.clone(),
            predicted_price,
            direction,
            confidence,
        ))
    }
}

/// Population standard deviation of one-bar simple returns across `prices`.
///
/// NaN if any price in the window is undefined or non-positive.
pub fn return_volatility(prices: &[f64]) -> f64 {
    if prices.len() < 2 || prices.iter().any(|p| p.is_nan() || *p <= 0.0) {
        return f64::NAN;
    }
    let returns: Vec<f64> = prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / returns.len() as f64;
    variance.sqrt()
}
