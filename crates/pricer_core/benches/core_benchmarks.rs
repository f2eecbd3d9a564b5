//! Criterion benchmarks for pricer_core distribution functions.
//!
//! Measures the inverse CND separately over the central region and the
//! tails, since the two branches cost differently.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::analytical::BlackScholes;
use pricer_core::math::distributions::{inverse_norm_cdf, norm_cdf};

fn grid(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| lo + (hi - lo) * (i as f64 + 0.5) / n as f64)
        .collect()
}

/// Benchmark the inverse CND by region.
fn bench_inverse_cnd(c: &mut Criterion) {
    let mut group = c.benchmark_group("inverse_cnd");

    let regions = [
        ("central", grid(0.03, 0.97, 10_000)),
        ("lower_tail", grid(1e-9, 0.02, 10_000)),
        ("upper_tail", grid(0.98, 1.0 - 1e-9, 10_000)),
    ];
    for (name, points) in &regions {
        group.bench_with_input(BenchmarkId::new("f64", name), points, |b, points| {
            b.iter(|| {
                points
                    .iter()
                    .map(|&p| inverse_norm_cdf(black_box(p)))
                    .sum::<f64>()
            });
        });
    }

    let points32: Vec<f32> = regions[0].1.iter().map(|&p| p as f32).collect();
    group.bench_function("f32/central", |b| {
        b.iter(|| {
            points32
                .iter()
                .map(|&p| inverse_norm_cdf(black_box(p)))
                .sum::<f32>()
        });
    });

    group.finish();
}

/// Benchmark the forward CDF.
fn bench_norm_cdf(c: &mut Criterion) {
    let xs = grid(-6.0, 6.0, 10_000);
    c.bench_function("norm_cdf/10k", |b| {
        b.iter(|| xs.iter().map(|&x| norm_cdf(black_box(x))).sum::<f64>());
    });
}

/// Benchmark closed-form call pricing.
fn bench_black_scholes(c: &mut Criterion) {
    let strikes = grid(50.0, 150.0, 1_000);
    let model = BlackScholes::new(100.0_f64, 0.05, 0.2).unwrap();
    c.bench_function("black_scholes/call_1k", |b| {
        b.iter(|| {
            strikes
                .iter()
                .map(|&k| model.price_call(black_box(k), 1.0))
                .sum::<f64>()
        });
    });
}

criterion_group!(benches, bench_inverse_cnd, bench_norm_cdf, bench_black_scholes);
criterion_main!(benches);
