//! MDAV partitioning and group replacement benchmarks.
//!
//! MDAV is quadratic in the number of records; these runs show how the
//! constant moves with k and with the replacement strategy.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use microagg::data::{Attribute, Dataset, NumericKind};
use microagg::replace::{CentroidSubstitution, GroupPermutation, GroupReplacer, HybridSynthesis};
use microagg::Mdav;
use rand::prelude::*;

fn synthetic(n: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let attributes = vec![
        Attribute::quasi_identifier("age").with_kind(NumericKind::Integer),
        Attribute::quasi_identifier("zip").with_kind(NumericKind::Integer),
        Attribute::confidential("income"),
    ];
    let rows = (0..n).map(|_| {
        vec![
            f64::from(rng.random_range(18i32..90)),
            f64::from(rng.random_range(8000i32..8100)),
            rng.random_range(500.0..5000.0),
        ]
    });
    Dataset::from_rows(attributes, rows).unwrap()
}

fn bench_partition_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("mdav_partition");
    group.sample_size(10);

    for n in [500, 1_000, 2_000].iter() {
        group.throughput(Throughput::Elements(*n as u64));
        let ds = synthetic(*n, 42);
        let qi = ds.quasi_identifier_dataset().unwrap();
        let mdav = Mdav::new(5).unwrap().with_progress_interval(0);

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |bench, _| {
            bench.iter(|| mdav.partition(black_box(&qi)).unwrap());
        });
    }

    group.finish();
}

fn bench_partition_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("mdav_k");
    group.sample_size(10);
    let ds = synthetic(1_000, 7);
    let qi = ds.quasi_identifier_dataset().unwrap();

    for k in [3, 5, 10, 25].iter() {
        let mdav = Mdav::new(*k).unwrap().with_progress_interval(0);
        group.bench_with_input(BenchmarkId::from_parameter(k), k, |bench, _| {
            bench.iter(|| mdav.partition(black_box(&qi)).unwrap());
        });
    }

    group.finish();
}

fn bench_replacers(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace");
    let ds = synthetic(2_000, 11);
    let partition = Mdav::new(5)
        .unwrap()
        .with_progress_interval(0)
        .partition(&ds)
        .unwrap();

    group.bench_function("centroid", |bench| {
        bench.iter(|| CentroidSubstitution::new().replace(black_box(&ds), &partition).unwrap());
    });
    group.bench_function("permutation", |bench| {
        let mut rng = StdRng::seed_from_u64(1);
        bench.iter(|| {
            GroupPermutation::new(&mut rng)
                .replace(black_box(&ds), &partition)
                .unwrap()
        });
    });
    group.bench_function("hybrid", |bench| {
        let mut rng = StdRng::seed_from_u64(2);
        bench.iter(|| {
            HybridSynthesis::new(&mut rng)
                .replace(black_box(&ds), &partition)
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_partition_scaling,
    bench_partition_k,
    bench_replacers
);
criterion_main!(benches);
