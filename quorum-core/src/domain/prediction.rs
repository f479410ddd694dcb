//! Per-model prediction and per-indicator result records.

use serde::{Deserialize, Serialize};

use super::action::{Action, Direction};

/// Output of a single predictor profile. Read-only once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPrediction {
    pub model_type: String,
    pub predicted_price: f64,
    pub direction: Direction,
    /// Conviction in [0, 1]. Doubles as the vote weight in the ensemble.
    pub confidence: f64,
}

impl ModelPrediction {
    /// Build a prediction, clamping confidence into [0, 1].
    ///
    /// A NaN confidence is treated as no conviction.
    pub fn new(
        model_type: impl Into<String>,
        predicted_price: f64,
        direction: Direction,
        confidence: f64,
    ) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            model_type: model_type.into(),
            predicted_price,
            direction,
            confidence,
        }
    }
}

/// Latest value of one named indicator with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub name: String,
    pub value: f64,
    pub action: Action,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(ModelPrediction::new("lstm", 1.0, Direction::Up, 1.7).confidence, 1.0);
        assert_eq!(ModelPrediction::new("lstm", 1.0, Direction::Up, -0.2).confidence, 0.0);
        assert_eq!(ModelPrediction::new("lstm", 1.0, Direction::Up, f64::NAN).confidence, 0.0);
    }

    #[test]
    fn prediction_uses_camel_case_fields() {
        let p = ModelPrediction::new("arima", 101.5, Direction::Down, 0.4);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["modelType"], "arima");
        assert_eq!(json["predictedPrice"], 101.5);
        assert_eq!(json["direction"], "Down");
    }
}
