//! Domain types shared by every stage of an analysis.

pub mod action;
pub mod prediction;
pub mod result;
pub mod series;

pub use action::{Action, Direction, Signal};
pub use prediction::{IndicatorResult, ModelPrediction};
pub use result::CombinedResult;
pub use series::{SeriesError, SeriesPoint, TimeSeries};

/// Ticker symbol type alias
pub type Ticker = String;
