//! Benchmarks for tally aggregation pipelines

use std::time::{Duration, Instant};

use tally_core::prelude::*;
use tally_readers::mock_data;
use tracing::info;

const MODELS: [&str; 6] = ["Corolla", "Fiesta", "Civic", "Golf", "Leaf", "Octavia"];
const COLORS: [&str; 7] = ["Green", "Blue", "Pink", "Red", "Teal", "Yellow", "Maroon"];

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Number of measured iterations
    pub iterations: usize,

    /// Warmup iterations
    pub warmup_iterations: usize,

    /// Number of synthetic records per iteration
    pub record_count: usize,

    /// Number of threads for parallel benchmarks
    pub num_threads: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            warmup_iterations: 3,
            record_count: 100_000,
            num_threads: 4,
        }
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchResult {
    /// Name of the benchmark
    pub name: String,

    /// Total time taken
    pub total_time: Duration,

    /// Average time per iteration
    pub avg_time: Duration,

    /// Min time per iteration
    pub min_time: Duration,

    /// Max time per iteration
    pub max_time: Duration,

    /// Throughput (records/second)
    pub throughput: f64,
}

/// Deterministic car listings for benchmarking
pub fn synthetic_cars(count: usize) -> Vec<Car> {
    (0..count)
        .map(|i| {
            let id = i32::try_from(i).unwrap_or(i32::MAX);
            Car::new(
                id,
                MODELS[i % MODELS.len()],
                COLORS[i % COLORS.len()],
                1990 + id % 34,
                f64::from(id % 997) * 101.25 + 3_000.0,
            )
        })
        .collect()
}

/// Run a benchmark
#[allow(clippy::cast_precision_loss)]
pub fn run_benchmark<F>(name: &str, config: &BenchConfig, func: F) -> Result<BenchResult>
where
    F: Fn() -> Result<()>,
{
    if config.iterations == 0 {
        return Err(Error::InvalidArgument("iterations must be positive".into()));
    }

    // Warmup
    for _ in 0..config.warmup_iterations {
        func()?;
    }

    let mut times = Vec::with_capacity(config.iterations);
    let start_total = Instant::now();

    for _ in 0..config.iterations {
        let start = Instant::now();
        func()?;
        times.push(start.elapsed());
    }

    let total_time = start_total.elapsed();
    let runs = u32::try_from(times.len()).unwrap_or(u32::MAX);
    let avg_time = times.iter().sum::<Duration>() / runs;
    let min_time = times.iter().min().copied().unwrap_or_default();
    let max_time = times.iter().max().copied().unwrap_or_default();

    let total_records = config.iterations * config.record_count;
    let throughput = total_records as f64 / total_time.as_secs_f64().max(f64::EPSILON);

    info!(name, ?avg_time, throughput, "benchmark finished");

    Ok(BenchResult {
        name: name.to_string(),
        total_time,
        avg_time,
        min_time,
        max_time,
        throughput,
    })
}

/// Benchmark grouping by color with a counting downstream
pub fn bench_grouping(config: &BenchConfig) -> Result<BenchResult> {
    let cars = synthetic_cars(config.record_count);
    let by_color = grouping_by_with(|c: &Car| c.color().to_owned(), counting());

    run_benchmark("grouping_by color", config, || {
        let groups = Sequence::new(cars.iter().cloned()).collect(&by_color)?;
        debug_assert!(groups.len() <= COLORS.len());
        Ok(())
    })
}

/// Benchmark price statistics over a filtered sequence
pub fn bench_summarizing(config: &BenchConfig) -> Result<BenchResult> {
    let cars = synthetic_cars(config.record_count);
    let prices = summarizing(|c: &Car| c.price());

    run_benchmark("summarizing price", config, || {
        Sequence::new(cars.iter().cloned())
            .filter(|c| c.year() >= 2000)
            .collect(&prices)?;
        Ok(())
    })
}

/// Benchmark joining model names
pub fn bench_joining(config: &BenchConfig) -> Result<BenchResult> {
    let cars = synthetic_cars(config.record_count);
    let models = joining_with(",");

    run_benchmark("joining models", config, || {
        Sequence::new(cars.iter().map(|c| c.model())).collect(&models)?;
        Ok(())
    })
}

/// Benchmark parallel grouping against the same aggregation run sequentially
pub fn bench_parallel_grouping(config: &BenchConfig) -> Result<Vec<BenchResult>> {
    let cars = synthetic_cars(config.record_count);
    let by_year = grouping_by_with(|c: &Car| c.year(), summing(|c: &Car| c.price()));
    let parallel = ParallelConfig::with_threads(config.num_threads);

    let sequential = run_benchmark("grouping_by year (sequential)", config, || {
        Sequence::new(cars.iter().cloned()).collect(&by_year)?;
        Ok(())
    })?;
    let chunked = run_benchmark("grouping_by year (parallel)", config, || {
        Sequence::new(cars.iter().cloned()).par_collect(&by_year, &parallel)?;
        Ok(())
    })?;

    Ok(vec![sequential, chunked])
}

/// Benchmark loading the bundled car listings and grouping them by color
pub fn bench_fixture(config: &BenchConfig) -> Result<BenchResult> {
    let loader = mock_data::cars_loader();
    let prices = mapping(|c: Car| c.price(), to_list());
    let by_color = grouping_by_with(|c: &Car| c.color().to_owned(), prices);

    let fixture = BenchConfig {
        record_count: loader.load_records()?.len(),
        ..config.clone()
    };
    run_benchmark("load fixture and group", &fixture, || {
        loader.sequence()?.collect(&by_color)?;
        Ok(())
    })
}

/// Run every benchmark with the given configuration
pub fn run_all(config: &BenchConfig) -> Result<Vec<BenchResult>> {
    let mut results = vec![
        bench_grouping(config)?,
        bench_summarizing(config)?,
        bench_joining(config)?,
        bench_fixture(config)?,
    ];
    results.extend(bench_parallel_grouping(config)?);
    Ok(results)
}
