//! Criterion benchmarks for divergent-divergence: KL estimation and spectral distance.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use divergent_divergence::{KlConfig, SigmaScale, SpectralConfig};
use divergent_series::Series;

fn make_sine_series(n: usize, channels: usize, offset: f64) -> Series {
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..channels).map(|c| (i as f64 * 0.1 + c as f64).sin() + offset).collect())
        .collect();
    Series::from_rows(&rows).unwrap()
}

fn bench_kl(c: &mut Criterion) {
    let mut group = c.benchmark_group("kl_estimate");

    for &len in &[100usize, 500] {
        for (label, scale) in [("fixed", SigmaScale::Fixed(1.0)), ("adaptive", SigmaScale::Adaptive)] {
            let id = BenchmarkId::new(format!("len{len}"), label);
            let a = make_sine_series(len, 3, 0.0);
            let b = make_sine_series(len, 3, 0.5);
            let cfg = KlConfig::new().with_sigma_scale(scale);
            group.bench_with_input(id, &(a, b), |bencher, (a, b)| {
                bencher.iter(|| cfg.estimate(a, b).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_spectral(c: &mut Criterion) {
    let mut group = c.benchmark_group("spectral_hellinger");
    let cfg = SpectralConfig::new();

    for &len in &[256usize, 4096] {
        let a = make_sine_series(len, 3, 0.0);
        let b = make_sine_series(len, 3, 0.5);
        group.bench_with_input(BenchmarkId::from_parameter(len), &(a, b), |bencher, (a, b)| {
            bencher.iter(|| cfg.distance(a, b).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kl, bench_spectral);
criterion_main!(benches);
