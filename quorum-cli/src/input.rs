//! Series file loading.
//!
//! - `.json`: either the columnar `TimeSeries` form
//!   (`{"dates": [...], "prices": [...], "volumes": [...]}`) or an array of
//!   `{"date", "price", "volume"}` rows
//! - anything else: CSV with a `date,price,volume` header, dates as YYYY-MM-DD

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

use quorum_core::domain::{SeriesPoint, TimeSeries};

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonSeries {
    Columns(TimeSeries),
    Rows(Vec<SeriesPoint>),
}

pub fn load_series(path: &Path) -> Result<TimeSeries> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        read_json(path)
    } else {
        read_csv(path)
    }
}

fn read_json(path: &Path) -> Result<TimeSeries> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed: JsonSeries = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse series JSON {}", path.display()))?;
    match parsed {
        JsonSeries::Columns(series) => Ok(series),
        JsonSeries::Rows(points) => TimeSeries::from_points(&points)
            .with_context(|| format!("Invalid series in {}", path.display())),
    }
}

fn read_csv(path: &Path) -> Result<TimeSeries> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    parse_csv(file).with_context(|| format!("Failed to load series CSV {}", path.display()))
}

fn parse_csv(reader: impl std::io::Read) -> Result<TimeSeries> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut points = Vec::new();
    for (row, record) in rdr.deserialize::<SeriesPoint>().enumerate() {
        // +2: header line and 1-based numbering
        points.push(record.with_context(|| format!("line {}", row + 2))?);
    }
    Ok(TimeSeries::from_points(&points)?)
}
