//! Engine configuration.
//!
//! Stored as TOML. Every section is optional; a missing section or field takes
//! its default, so an empty file is a valid config.
//!
//! ```toml
//! master_seed = 42
//! parallel = true
//!
//! [indicators]
//! sma_periods = [20, 50]
//! rsi_period = 14
//!
//! [classifier.rsi]
//! rule = "thresholds"
//! overbought = 70.0
//! oversold = 30.0
//!
//! [ensemble]
//! degenerate_weights = "reject"
//!
//! [[profiles]]
//! name = "fast_reacting"
//! model_type = "lstm"
//! volatility_window = 20
//! volatility_multiplier = 2.0
//! confidence = { min = 0.55, max = 0.85 }
//! noise = 0.35
//! neutral_band = 0.002
//! bias = { kind = "momentum", window = 5 }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::classifier::ClassifierPolicy;
use crate::ensemble::DegeneratePolicy;
use crate::indicators::macd::{MACD_FAST, MACD_SIGNAL, MACD_SLOW};
use crate::predictor::{Profile, ProfileSpec};

/// Seed used when none is configured.
pub const DEFAULT_MASTER_SEED: u64 = 42;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: MACD_FAST,
            slow: MACD_SLOW,
            signal: MACD_SIGNAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerParams {
    pub period: usize,
    pub multiplier: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 20,
            multiplier: 2.0,
        }
    }
}

/// Which indicators the snapshot computes, and with what parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma_periods: Vec<usize>,
    pub ema_periods: Vec<usize>,
    pub vwma_periods: Vec<usize>,
    pub rsi_period: usize,
    pub macd: MacdParams,
    pub bollinger: BollingerParams,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_periods: vec![20, 50],
            ema_periods: vec![12, 26],
            vwma_periods: vec![20],
            rsi_period: 14,
            macd: MacdParams::default(),
            bollinger: BollingerParams::default(),
        }
    }
}

impl IndicatorConfig {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let lists = [
            ("sma_periods", &self.sma_periods),
            ("ema_periods", &self.ema_periods),
            ("vwma_periods", &self.vwma_periods),
        ];
        for (field, periods) in lists {
            if periods.contains(&0) {
                problems.push(format!("indicators.{field}: periods must be >= 1"));
            }
        }
        if self.rsi_period == 0 {
            problems.push("indicators.rsi_period must be >= 1".into());
        }
        let macd = &self.macd;
        if macd.fast == 0 || macd.slow == 0 || macd.signal == 0 {
            problems.push("indicators.macd: periods must be >= 1".into());
        }
        if self.bollinger.period == 0 {
            problems.push("indicators.bollinger.period must be >= 1".into());
        }
        if !(self.bollinger.multiplier.is_finite() && self.bollinger.multiplier >= 0.0) {
            problems.push("indicators.bollinger.multiplier must be finite and >= 0".into());
        }
        problems
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    pub degenerate_weights: DegeneratePolicy,
}

/// Top-level configuration for an `Analyzer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Root of every per-ticker, per-profile random stream.
    pub master_seed: u64,
    /// Evaluate profiles on the rayon pool instead of one after another.
    pub parallel: bool,
    pub indicators: IndicatorConfig,
    pub classifier: ClassifierPolicy,
    pub ensemble: EnsembleConfig,
    pub profiles: Vec<ProfileSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            master_seed: DEFAULT_MASTER_SEED,
            parallel: true,
            indicators: IndicatorConfig::default(),
            classifier: ClassifierPolicy::default(),
            ensemble: EnsembleConfig::default(),
            profiles: Profile::ALL.iter().map(Profile::spec).collect(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Keep only the profiles whose names appear in `names`, in config order.
    pub fn retain_profiles(&mut self, names: &[String]) {
        self.profiles.retain(|p| names.iter().any(|n| *n == p.name));
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = self.indicators.problems();

        if self.profiles.is_empty() {
            problems.push("at least one profile is required".into());
        }
        let mut names = BTreeSet::new();
        let mut model_types = BTreeSet::new();
        for profile in &self.profiles {
            if !names.insert(profile.name.as_str()) {
                problems.push(format!("duplicate profile name '{}'", profile.name));
            }
            // model_type keys the profile's random stream
            if !model_types.insert(profile.model_type.as_str()) {
                problems.push(format!("duplicate model_type '{}'", profile.model_type));
            }
            problems.extend(profile.problems());
        }

        if let crate::classifier::RsiRule::Thresholds {
            overbought,
            oversold,
        } = self.classifier.rsi
        {
            if !(oversold < overbought) {
                problems.push("classifier.rsi: oversold must be below overbought".into());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{MovingAverageRule, RsiRule};
    use crate::predictor::DirectionalBias;

    #[test]
    fn empty_toml_is_default() {
        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.profiles.len(), 3);
        assert_eq!(config.master_seed, DEFAULT_MASTER_SEED);
    }

    #[test]
    fn toml_roundtrip() {
        let config = EngineConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = EngineConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let text = r#"
master_seed = 7
parallel = false

[indicators]
sma_periods = [10]

[classifier.moving_average]
rule = "slow_ma_momentum"
slow_period = 50

[classifier.rsi]
rule = "thresholds"
overbought = 70.0
oversold = 30.0

[ensemble]
degenerate_weights = "reject"
"#;
        let config = EngineConfig::from_toml(text).unwrap();
        assert_eq!(config.master_seed, 7);
        assert!(!config.parallel);
        assert_eq!(config.indicators.sma_periods, vec![10]);
        assert_eq!(config.indicators.ema_periods, vec![12, 26]);
        assert_eq!(config.indicators.rsi_period, 14);
        assert_eq!(
            config.classifier.moving_average,
            MovingAverageRule::SlowMaMomentum { slow_period: 50 }
        );
        assert_eq!(
            config.classifier.rsi,
            RsiRule::Thresholds {
                overbought: 70.0,
                oversold: 30.0
            }
        );
        assert_eq!(config.ensemble.degenerate_weights, DegeneratePolicy::Reject);
        assert_eq!(config.profiles.len(), 3);
    }

    #[test]
    fn custom_profiles_replace_builtins() {
        let text = r#"
[[profiles]]
name = "quick"
model_type = "gru"
volatility_window = 10
volatility_multiplier = 1.5
confidence = { min = 0.4, max = 0.9 }
noise = 0.0
neutral_band = 0.001
bias = { kind = "momentum", window = 3 }
"#;
        let config = EngineConfig::from_toml(text).unwrap();
        assert_eq!(config.profiles.len(), 1);
        let profile = &config.profiles[0];
        assert_eq!(profile.model_type, "gru");
        assert_eq!(profile.bias, DirectionalBias::Momentum { window: 3 });
    }

    #[test]
    fn invalid_values_are_collected() {
        let text = r#"
[indicators]
sma_periods = [0, 20]
rsi_period = 0

[classifier.rsi]
rule = "thresholds"
overbought = 30.0
oversold = 70.0
"#;
        let err = EngineConfig::from_toml(text).unwrap_err();
        match err {
            ConfigError::Invalid(problems) => {
                assert_eq!(problems.len(), 3, "{problems:?}");
                assert!(problems.iter().any(|p| p.contains("sma_periods")));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_and_empty_profiles_rejected() {
        let mut config = EngineConfig::default();
        config.profiles.push(Profile::FastReacting.spec());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.profiles.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn retain_profiles_by_name() {
        let mut config = EngineConfig::default();
        config.retain_profiles(&["statistical".to_string(), "fast_reacting".to_string()]);
        let names: Vec<&str> = config.profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["fast_reacting", "statistical"]);
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            EngineConfig::from_toml("master_seed = \"abc\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = EngineConfig::from_file(Path::new("/nonexistent/quorum.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
