//! Criterion benchmarks for divergent-metrics: point-wise errors, rank correlations, and KSG mutual information.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use divergent_metrics::{horizoned_metric, kendall, mae, mse, smape, spearman};
use divergent_series::Series;

fn make_sine_series(n: usize, channels: usize, offset: f64) -> Series {
    let rows: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..channels).map(|c| (i as f64 * 0.1 + c as f64).sin() + offset).collect())
        .collect();
    Series::from_rows(&rows).unwrap()
}

fn bench_pointwise(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointwise");
    for &len in &[256usize, 4096] {
        let a = make_sine_series(len, 3, 2.0);
        let b = make_sine_series(len, 3, 2.1);
        group.bench_with_input(BenchmarkId::new("mse", len), &(a.clone(), b.clone()), |bencher, (a, b)| {
            bencher.iter(|| mse(a, b).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("smape", len), &(a, b), |bencher, (a, b)| {
            bencher.iter(|| smape(a, b).unwrap());
        });
    }
    group.finish();
}

fn bench_correlation(c: &mut Criterion) {
    let a = make_sine_series(512, 1, 0.0);
    let b = make_sine_series(512, 1, 0.5);

    c.bench_function("spearman_512", |bencher| {
        bencher.iter(|| spearman(&a, &b).unwrap());
    });
    c.bench_function("kendall_512", |bencher| {
        bencher.iter(|| kendall(&a, &b).unwrap());
    });
}

fn bench_horizon(c: &mut Criterion) {
    let a = make_sine_series(256, 2, 0.0);
    let b = make_sine_series(256, 2, 0.3);

    c.bench_function("horizoned_mae_256", |bencher| {
        bencher.iter(|| horizoned_metric(&a, &b, None, mae).unwrap());
    });
}

#[cfg(feature = "knn-mi")]
fn bench_mutual_information(c: &mut Criterion) {
    use divergent_metrics::{KnnMutualInformation, mutual_information};

    let a = make_sine_series(500, 1, 0.0);
    let b = make_sine_series(500, 1, 0.2);
    let backend = KnnMutualInformation::new();

    c.bench_function("knn_mi_500", |bencher| {
        bencher.iter(|| mutual_information(&a, &b, Some(&backend)).unwrap());
    });
}

#[cfg(not(feature = "knn-mi"))]
fn bench_mutual_information(_c: &mut Criterion) {}

criterion_group!(
    benches,
    bench_pointwise,
    bench_correlation,
    bench_horizon,
    bench_mutual_information
);
criterion_main!(benches);
