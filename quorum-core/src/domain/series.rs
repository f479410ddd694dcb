//! TimeSeries — the aligned price/volume history every analysis starts from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while assembling a `TimeSeries`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("column '{column}' has {actual} entries, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("dates are not strictly increasing at index {index}")]
    UnorderedDates { index: usize },
}

/// One observation of a series, used when building from row-oriented input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub volume: f64,
}

/// Ordered `(date, price, volume)` columns aligned by index, oldest first.
///
/// Optional named feature columns share the same length. The constructor is the
/// only way in, so every `TimeSeries` upholds the equal-length invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSeries")]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
    volumes: Vec<f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    features: BTreeMap<String, Vec<f64>>,
}

#[derive(Deserialize)]
struct RawTimeSeries {
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
    volumes: Vec<f64>,
    #[serde(default)]
    features: BTreeMap<String, Vec<f64>>,
}

impl TryFrom<RawTimeSeries> for TimeSeries {
    type Error = SeriesError;

    fn try_from(raw: RawTimeSeries) -> Result<Self, Self::Error> {
        let mut series = TimeSeries::new(raw.dates, raw.prices, raw.volumes)?;
        for (name, values) in raw.features {
            series = series.with_feature(name, values)?;
        }
        Ok(series)
    }
}

impl TimeSeries {
    pub fn new(
        dates: Vec<NaiveDate>,
        prices: Vec<f64>,
        volumes: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let expected = dates.len();
        check_len("prices", expected, prices.len())?;
        check_len("volumes", expected, volumes.len())?;

        if let Some(index) = dates.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SeriesError::UnorderedDates { index: index + 1 });
        }

        Ok(Self {
            dates,
            prices,
            volumes,
            features: BTreeMap::new(),
        })
    }

    /// Build from row-oriented points (e.g. parsed CSV rows).
    pub fn from_points(points: &[SeriesPoint]) -> Result<Self, SeriesError> {
        Self::new(
            points.iter().map(|p| p.date).collect(),
            points.iter().map(|p| p.price).collect(),
            points.iter().map(|p| p.volume).collect(),
        )
    }

    /// Attach a named auxiliary feature column.
    pub fn with_feature(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let name = name.into();
        check_len(&name, self.len(), values.len())?;
        self.features.insert(name, values);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    pub fn feature(&self, name: &str) -> Option<&[f64]> {
        self.features.get(name).map(|v| v.as_slice())
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(|k| k.as_str())
    }

    /// Most recent price, if any.
    pub fn last_price(&self) -> Option<f64> {
        self.prices.last().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

fn check_len(column: &str, expected: usize, actual: usize) -> Result<(), SeriesError> {
    if expected == actual {
        Ok(())
    } else {
        Err(SeriesError::LengthMismatch {
            column: column.to_string(),
            expected,
            actual,
        })
    }
}
