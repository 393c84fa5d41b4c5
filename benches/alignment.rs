//! Functional alignment benchmarks using Criterion.
//!
//! Benchmarks cover:
//! - Alignment methods on a single piece
//! - Scalability in the number of voxels
//! - Piecewise alignment with explicit labels and k-means parcels
//! - Bagging and template construction
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fmralign::prelude::*;
use rand::prelude::*;
use rand_distr::Normal;
use std::hint::black_box;

// ============================================================================
// Data Generation with Reproducible RNG
// ============================================================================

/// Gaussian signals of shape `n_samples x n_voxels`.
fn generate_signals(n_samples: usize, n_voxels: usize, seed: u64) -> Matrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Normal::new(0.0, 1.0).unwrap();
    Matrix::from_fn(n_samples, n_voxels, |_, _| dist.sample(&mut rng))
}

/// A target that shuffles the source voxels and adds noise.
fn generate_target(source: &Matrix<f64>, seed: u64) -> Matrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.1).unwrap();
    let mut order: Vec<usize> = (0..source.cols()).collect();
    order.shuffle(&mut rng);
    Matrix::from_fn(source.rows(), source.cols(), |i, j| {
        source[(i, order[j])] + noise.sample(&mut rng)
    })
}

/// Contiguous blocks of `block` voxels.
fn block_labels(n_voxels: usize, block: usize) -> Vec<usize> {
    (0..n_voxels).map(|v| v / block).collect()
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("methods");
    group.sample_size(20);

    let source = generate_signals(50, 40, 1);
    let target = generate_target(&source, 2);

    for method in [Identity, ScaledOrthogonal, Ridge, Hungarian, OptimalTransport] {
        let model = Aligner::new()
            .method(method)
            .adapter(Pairwise)
            .build()
            .unwrap();
        group.bench_function(method.name(), |b| {
            b.iter(|| model.fit(black_box(&source), black_box(&target)).unwrap())
        });
    }

    group.finish();
}

fn bench_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalability");
    group.sample_size(10);

    for n_voxels in [50, 100, 200, 400] {
        let source = generate_signals(80, n_voxels, 3);
        let target = generate_target(&source, 4);
        let model = Aligner::new()
            .method(ScaledOrthogonal)
            .adapter(Pairwise)
            .build()
            .unwrap();

        group.throughput(Throughput::Elements(n_voxels as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_voxels), &n_voxels, |b, _| {
            b.iter(|| model.fit(black_box(&source), black_box(&target)).unwrap())
        });
    }

    group.finish();
}

fn bench_piecewise(c: &mut Criterion) {
    let mut group = c.benchmark_group("piecewise");
    group.sample_size(10);

    let n_voxels = 400;
    let source = generate_signals(60, n_voxels, 5);
    let target = generate_target(&source, 6);

    for block in [20, 50, 100] {
        let model = Aligner::new()
            .parcellation(Labels(block_labels(n_voxels, block)))
            .adapter(Pairwise)
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::new("labels", block), &block, |b, _| {
            b.iter(|| model.fit(black_box(&source), black_box(&target)).unwrap())
        });
    }

    for k in [4, 8, 16] {
        let model = Aligner::new()
            .parcellation(KMeans(k))
            .seed(11)
            .adapter(Pairwise)
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::new("kmeans", k), &k, |b, _| {
            b.iter(|| model.fit(black_box(&source), black_box(&target)).unwrap())
        });
    }

    for parallel in [false, true] {
        let model = Aligner::new()
            .parcellation(Labels(block_labels(n_voxels, 20)))
            .parallel(parallel)
            .adapter(Pairwise)
            .build()
            .unwrap();
        let fitted = model.fit(&source, &target).unwrap();
        group.bench_with_input(
            BenchmarkId::new("transform_parallel", parallel),
            &parallel,
            |b, _| b.iter(|| fitted.transform(black_box(&source)).unwrap()),
        );
    }

    group.finish();
}

fn bench_bagging(c: &mut Criterion) {
    let mut group = c.benchmark_group("bagging");
    group.sample_size(10);

    let source = generate_signals(60, 200, 7);
    let target = generate_target(&source, 8);

    for n_bags in [1, 2, 4] {
        let model = Aligner::new()
            .parcellation(KMeans(8))
            .n_bags(n_bags)
            .adapter(Pairwise)
            .build()
            .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n_bags), &n_bags, |b, _| {
            b.iter(|| model.fit(black_box(&source), black_box(&target)).unwrap())
        });
    }

    group.finish();
}

fn bench_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("template");
    group.sample_size(10);

    let base = generate_signals(50, 120, 9);

    for n_subjects in [3, 6] {
        let subjects: Vec<Matrix<f64>> = (0..n_subjects)
            .map(|s| generate_target(&base, 100 + s as u64))
            .collect();
        let model = Aligner::new()
            .parcellation(Labels(block_labels(120, 30)))
            .n_iter(2)
            .adapter(Template)
            .build()
            .unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(n_subjects),
            &n_subjects,
            |b, _| b.iter(|| model.fit(black_box(&subjects)).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_methods,
    bench_scalability,
    bench_piecewise,
    bench_bagging,
    bench_template
);
criterion_main!(benches);
