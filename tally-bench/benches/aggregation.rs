//! Criterion benchmarks for sequential and parallel aggregation

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tally_bench::synthetic_cars;
use tally_core::prelude::*;

fn bench_keyed(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyed");

    for size in [1_000, 10_000, 100_000] {
        let cars = synthetic_cars(size);

        group.bench_with_input(
            BenchmarkId::new("grouping_by_color", size),
            &cars,
            |b, cars| {
                let by_color = grouping_by_with(|c: &Car| c.color().to_owned(), counting());
                b.iter(|| {
                    let groups = Sequence::new(cars.iter().cloned())
                        .collect(&by_color)
                        .unwrap();
                    black_box(groups);
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("to_map_merging_year", size),
            &cars,
            |b, cars| {
                let by_year =
                    to_map_merging(|c: &Car| c.year(), |c: &Car| c.price(), |a, b| a + b).sorted();
                b.iter(|| {
                    let totals = Sequence::new(cars.iter().cloned()).collect(&by_year).unwrap();
                    black_box(totals);
                });
            },
        );
    }

    group.finish();
}

fn bench_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel");
    let cars = synthetic_cars(200_000);
    let stats = grouping_by_with(|c: &Car| c.year(), summarizing(|c: &Car| c.price()));

    for threads in [1, 2, 4] {
        let config = ParallelConfig::with_threads(threads);
        group.bench_with_input(
            BenchmarkId::new("summarizing_by_year", threads),
            &config,
            |b, config| {
                b.iter(|| {
                    let result = Sequence::new(cars.iter().cloned())
                        .par_collect(&stats, config)
                        .unwrap();
                    black_box(result);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_keyed, bench_parallel);
criterion_main!(benches);
