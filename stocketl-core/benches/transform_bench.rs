//! Criterion benchmarks for the transformer.
//!
//! Benchmarks:
//! 1. Full transform (parse, validate, sort, enrich) on raw API-shaped records
//! 2. Enrichment alone on typed records
//! 3. Rolling primitives

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use stocketl_core::domain::DailyRecord;
use stocketl_core::extract::{SeriesProvider, SyntheticProvider};
use stocketl_core::transform::{enrich, pct_change, rolling_mean, rolling_sample_std, transform};
use stocketl_core::DuplicatePolicy;

// ── Helpers ──────────────────────────────────────────────────────────

fn end_date() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

fn make_daily(n: usize) -> Vec<DailyRecord> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            DailyRecord {
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000.0,
            }
        })
        .collect()
}

// ── 1. Full Transform ────────────────────────────────────────────────

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    for &days in &[252, 1260, 5000] {
        let raw = SyntheticProvider::new(end_date(), days).fetch("BENCH").unwrap();
        group.bench_with_input(BenchmarkId::new("raw_to_enriched", days), &days, |b, _| {
            b.iter(|| transform(black_box(raw.clone()), DuplicatePolicy::Reject));
        });
    }

    group.finish();
}

// ── 2. Enrichment ────────────────────────────────────────────────────

fn bench_enrich(c: &mut Criterion) {
    let mut group = c.benchmark_group("enrich");

    for &days in &[252, 1260, 5000] {
        let records = make_daily(days);
        group.bench_with_input(BenchmarkId::new("typed", days), &days, |b, _| {
            b.iter(|| enrich(black_box(&records)));
        });
    }

    group.finish();
}

// ── 3. Rolling Primitives ────────────────────────────────────────────

fn bench_rolling(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling");

    let closes: Vec<f64> = make_daily(5000).iter().map(|r| r.close).collect();
    let returns = pct_change(&closes);

    group.bench_function("pct_change_5000", |b| {
        b.iter(|| pct_change(black_box(&closes)));
    });
    group.bench_function("mean_50_5000", |b| {
        b.iter(|| rolling_mean(black_box(&closes), 50));
    });
    group.bench_function("sample_std_7_5000", |b| {
        b.iter(|| rolling_sample_std(black_box(&returns), 7));
    });

    group.finish();
}

criterion_group!(benches, bench_transform, bench_enrich, bench_rolling);
criterion_main!(benches);
