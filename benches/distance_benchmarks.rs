//! Benchmarks for the comparison pipeline.
//!
//! Covers:
//! - the bounded evaluator with and without a limit
//! - the heuristic estimator against the exact evaluator on long inputs
//! - histogram computation, cold vs through a warm cache
//! - normalization of noisy signatures

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sigsim::distance::{bounded_distance, distance};
use sigsim::ngram::{estimate_distance, HistogramCache, NgramHistogram};
use sigsim::normalize::normalize;

/// Synthetic failure text: vocabulary words with occasional pointer noise.
fn synthetic_signature(rng: &mut StdRng, words: usize) -> String {
    let vocab = [
        "timeout", "waiting", "for", "pod", "volume", "node", "failed", "sync", "error", "refused",
    ];
    let mut s = String::new();
    for i in 0..words {
        if i > 0 {
            s.push(' ');
        }
        if rng.gen_ratio(1, 8) {
            s.push_str(&format!("0x{:012x}", rng.gen::<u64>() >> 16));
        } else {
            s.push_str(vocab[rng.gen_range(0..vocab.len())]);
        }
    }
    s
}

fn bench_distance_pairs(c: &mut Criterion) {
    let pairs = [
        ("identical", "timeout waiting for pod", "timeout waiting for pod"),
        ("one_edit", "timeout waiting for pod", "timeout waiting for pods"),
        ("related", "timeout waiting for pod", "timeout syncing the pod"),
        ("unrelated", "connection refused by peer", "filesystem quota exhausted"),
    ];

    let mut group = c.benchmark_group("distance");
    for (name, a, b) in pairs {
        group.bench_with_input(BenchmarkId::new("unbounded", name), &(a, b), |bench, (a, b)| {
            bench.iter(|| distance(black_box(a), black_box(b)))
        });
        group.bench_with_input(BenchmarkId::new("limit_4", name), &(a, b), |bench, (a, b)| {
            bench.iter(|| bounded_distance(black_box(a), black_box(b), 4))
        });
    }
    group.finish();
}

fn bench_long_signatures(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let a = normalize(&synthetic_signature(&mut rng, 400));
    let b = normalize(&synthetic_signature(&mut rng, 400));

    let mut group = c.benchmark_group("long_signatures");
    group.bench_function("unbounded", |bench| {
        bench.iter(|| distance(black_box(&a), black_box(&b)))
    });
    group.bench_function("limit_8", |bench| {
        bench.iter(|| bounded_distance(black_box(&a), black_box(&b), 8))
    });
    group.bench_function("estimator", |bench| {
        let ha = NgramHistogram::of(&a);
        let hb = NgramHistogram::of(&b);
        bench.iter(|| estimate_distance(black_box(&ha), black_box(&hb)))
    });
    group.finish();
}

fn bench_histograms(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let corpus: Vec<String> = (0..64)
        .map(|_| normalize(&synthetic_signature(&mut rng, 40)))
        .collect();

    let mut group = c.benchmark_group("histogram");
    group.bench_function("cold", |bench| {
        bench.iter(|| {
            for s in &corpus {
                black_box(NgramHistogram::of(s));
            }
        })
    });
    group.bench_function("warm_cache", |bench| {
        let cache = HistogramCache::new();
        for s in &corpus {
            cache.histogram(s);
        }
        bench.iter(|| {
            for s in &corpus {
                black_box(cache.histogram(s));
            }
        })
    });
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(99);
    let noisy = format!(
        "E0102 10:32:01.123 {} on 10.12.0.7 at 0xc00042a000",
        synthetic_signature(&mut rng, 30)
    );
    let long: String = vec![noisy.as_str(); 100].join("\n");

    let mut group = c.benchmark_group("normalize");
    group.bench_function("short", |bench| bench.iter(|| normalize(black_box(&noisy))));
    group.bench_function("long_repeated_lines", |bench| {
        bench.iter(|| normalize(black_box(&long)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_distance_pairs,
    bench_long_signatures,
    bench_histograms,
    bench_normalize
);
criterion_main!(benches);
