//! Benchmarks for the two brute-force searches.
//!
//! Triple enumeration grows as n!² and the height search as B², so these
//! track how far the configured bounds can be pushed.

use abc_toys::height::{self, CurveEquation};
use abc_toys::monodromy::{self, TripleFilter};
use abc_toys::{tate, MonodromyConfig, Rational};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// ============================================================================
// Benchmark: permutation triples
// ============================================================================

fn bench_triples(c: &mut Criterion) {
    let mut group = c.benchmark_group("triples");
    let config = MonodromyConfig::default();
    for n in [3usize, 4, 5] {
        let pairs: u64 = (1..=n as u64).product::<u64>().pow(2);
        group.throughput(Throughput::Elements(pairs));
        group.bench_with_input(BenchmarkId::new("all", n), &n, |b, &n| {
            b.iter(|| monodromy::enumerate_triples_with(black_box(n), TripleFilter::All, &config))
        });
        group.bench_with_input(BenchmarkId::new("transitive", n), &n, |b, &n| {
            b.iter(|| {
                monodromy::enumerate_triples_with(black_box(n), TripleFilter::Transitive, &config)
            })
        });
    }
    group.finish();
}

// ============================================================================
// Benchmark: height enumeration
// ============================================================================

fn bench_height(c: &mut Criterion) {
    let mut group = c.benchmark_group("height_enumerate");
    let curve = CurveEquation::default();
    for bound in [10u32, 50, 200] {
        let bound_h = (f64::from(bound) + 0.5).ln();
        group.throughput(Throughput::Elements(u64::from(bound) * (2 * u64::from(bound) + 1)));
        group.bench_with_input(BenchmarkId::from_parameter(bound), &bound_h, |b, &h| {
            b.iter(|| height::enumerate(&curve, black_box(h)))
        });
    }
    group.finish();
}

// ============================================================================
// Benchmark: Tate series
// ============================================================================

fn bench_tate(c: &mut Criterion) {
    let q = Rational::new(1, 125).unwrap();
    let mut group = c.benchmark_group("tate_generate");
    for order in [10u32, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, &order| {
            b.iter(|| tate::generate(5, q, black_box(order)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_triples, bench_height, bench_tate);
criterion_main!(benches);
