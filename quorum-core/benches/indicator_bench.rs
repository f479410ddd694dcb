//! Criterion benchmarks for Quorum hot paths.
//!
//! Benchmarks:
//! 1. Indicator compute (single SMA, full default snapshot set)
//! 2. Latest-bar snapshot with classification
//! 3. Ensemble combination
//! 4. Full analysis (parallel vs sequential profile evaluation)

use chrono::{DateTime, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use quorum_core::classifier::Classifier;
use quorum_core::config::{EngineConfig, IndicatorConfig};
use quorum_core::domain::{Direction, ModelPrediction, TimeSeries};
use quorum_core::ensemble::Combiner;
use quorum_core::indicators::{build_indicators, latest_results, IndicatorValues, Sma};
use quorum_core::Analyzer;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(n: usize) -> TimeSeries {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let dates = (0..n)
        .map(|i| base_date + chrono::Duration::days(i as i64))
        .collect();
    let prices = (0..n)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.02)
        .collect();
    let volumes = (0..n).map(|i| 1_000_000.0 + (i % 500) as f64 * 1000.0).collect();
    TimeSeries::new(dates, prices, volumes).unwrap()
}

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap()
}

// ── 1. Indicator Compute ─────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_compute");

    for &bar_count in &[252, 1260, 2520] {
        let series = make_series(bar_count);

        let sma: Vec<Box<dyn quorum_core::indicators::Indicator>> = vec![Box::new(Sma::new(20))];
        group.bench_with_input(BenchmarkId::new("sma_20", bar_count), &bar_count, |b, _| {
            b.iter(|| IndicatorValues::compute_all(black_box(&series), black_box(&sma)));
        });

        let full_stack = build_indicators(&IndicatorConfig::default());
        group.bench_with_input(
            BenchmarkId::new("default_stack", bar_count),
            &bar_count,
            |b, _| {
                b.iter(|| IndicatorValues::compute_all(black_box(&series), black_box(&full_stack)));
            },
        );
    }

    group.finish();
}

// ── 2. Snapshot ──────────────────────────────────────────────────────

fn bench_snapshot(c: &mut Criterion) {
    let series = make_series(1260);
    let config = IndicatorConfig::default();
    let classifier = Classifier::default();

    c.bench_function("latest_results_1260_bars", |b| {
        b.iter(|| latest_results(black_box(&series), &config, &classifier));
    });
}

// ── 3. Ensemble ──────────────────────────────────────────────────────

fn bench_combine(c: &mut Criterion) {
    let predictions: Vec<ModelPrediction> = (0..30)
        .map(|i| {
            let direction = Direction::ALL[i % 3];
            ModelPrediction::new(format!("model_{i}"), 100.0 + i as f64, direction, 0.5)
        })
        .collect();
    let combiner = Combiner::default();

    c.bench_function("combine_30_predictions", |b| {
        b.iter(|| combiner.combine_at("BENCH", black_box(&predictions), fixed_time()));
    });
}

// ── 4. Full Analysis ─────────────────────────────────────────────────

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let series = make_series(1260);

    for parallel in [true, false] {
        let analyzer = Analyzer::new(EngineConfig {
            parallel,
            ..EngineConfig::default()
        })
        .unwrap();
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| analyzer.analyze_at("BENCH", black_box(&series), fixed_time()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_indicators,
    bench_snapshot,
    bench_combine,
    bench_analysis,
);
criterion_main!(benches);
