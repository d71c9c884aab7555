//! Criterion benchmarks for the core pipeline stages.
//!
//! Benchmarks:
//! 1. Aggregation of scored articles into daily means
//! 2. Alignment onto a multi-year trading-day index
//! 3. Seeded split + OLS fit + MSE

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use newsalign_core::{
    aggregate, align, fit_and_evaluate, resolve_missing, AlignedRow, AlignedSeries,
    DailyMarketBar, DailySentiment, MissingPolicy, ScoredArticle,
};

// ── Helpers ──────────────────────────────────────────────────────────

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, 2).unwrap()
}

fn make_articles(n: usize) -> Vec<ScoredArticle> {
    (0..n)
        .map(|i| ScoredArticle {
            headline: format!("h{i}"),
            published_at: (base() + Duration::days((i / 3) as i64))
                .format("%Y-%m-%dT%H:%M:%SZ")
                .to_string(),
            raw_content: String::new(),
            cleaned_content: String::new(),
            sentiment: (i as f64 * 0.37).sin(),
        })
        .collect()
}

fn make_bars(n: usize) -> Vec<DailyMarketBar> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            DailyMarketBar {
                date: base() + Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000_000,
            }
        })
        .collect()
}

fn make_series(n: usize) -> AlignedSeries {
    AlignedSeries::from_rows(
        (0..n)
            .map(|i| AlignedRow {
                date: base() + Duration::days(i as i64),
                close: 100.0 + (i as f64 * 0.1).sin() * 10.0,
                sentiment: Some((i as f64 * 0.37).sin()),
            })
            .collect(),
    )
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for n in [1_000usize, 10_000] {
        let articles = make_articles(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &articles, |b, a| {
            b.iter(|| aggregate(black_box(a)).unwrap())
        });
    }
    group.finish();
}

fn bench_align(c: &mut Criterion) {
    let bars = make_bars(2_520);
    let daily = DailySentiment::from_observations(
        (0..2_520)
            .step_by(2)
            .map(|i| (base() + Duration::days(i as i64), 0.1)),
    );
    c.bench_function("align_2520_days", |b| {
        b.iter(|| {
            let aligned = align(black_box(&daily), black_box(&bars)).unwrap();
            resolve_missing(&aligned, MissingPolicy::ForwardFill)
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_and_evaluate");
    for n in [252usize, 2_520] {
        let series = make_series(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, s| {
            b.iter(|| fit_and_evaluate(black_box(s), 0.2, 42).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_align, bench_evaluate);
criterion_main!(benches);
