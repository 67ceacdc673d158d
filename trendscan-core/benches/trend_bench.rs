//! Criterion benchmarks for the scan hot path.
//!
//! Benchmarks:
//! 1. Trend calculation over series of increasing length
//! 2. Chart overlays (SMA) and the point trend over a long history

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use trendscan_core::domain::{Observation, PriceSeries, Ticker};
use trendscan_core::indicators::{raw_trend, Indicator, Sma};
use trendscan_core::trend::TrendCalculator;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_series(n: usize) -> PriceSeries {
    let first = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let observations = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Observation::new(
                first + chrono::Duration::days(i as i64),
                close,
                1_000_000 + (i as u64 % 7) * 10_000,
            )
        })
        .collect();
    PriceSeries::new(Ticker::new("BENCH").unwrap(), observations).unwrap()
}

// ── 1. Trend calculation ─────────────────────────────────────────────

fn bench_trend_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("trend_compute");
    let calc = TrendCalculator::new(&[5, 10, 20, 60], 20).unwrap();
    for n in [64, 252, 2520] {
        let series = make_series(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, s| {
            b.iter(|| calc.compute(black_box(s)))
        });
    }
    group.finish();
}

// ── 2. Rolling indicators ────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let closes = make_series(2520).closes();
    let indicators: Vec<Box<dyn Indicator>> = vec![Box::new(Sma::new(5)), Box::new(Sma::new(10))];
    c.bench_function("sma_overlays_2520", |b| {
        b.iter(|| {
            for ind in &indicators {
                black_box(ind.compute(black_box(&closes)));
            }
        })
    });
    c.bench_function("raw_trend_2520", |b| {
        b.iter(|| {
            for w in [5, 10, 20, 60] {
                black_box(raw_trend(black_box(&closes), w));
            }
        })
    });
}

criterion_group!(benches, bench_trend_compute, bench_indicators);
criterion_main!(benches);
