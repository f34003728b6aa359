//! Benchmark runner for tally aggregation pipelines

use tally_bench::{bench_grouping, run_all, BenchConfig, BenchResult};
use tally_core::ParallelConfig;
use tracing_subscriber::EnvFilter;

fn print_result(result: &BenchResult) {
    println!("\nBenchmark: {}", result.name);
    println!("  Total time:   {:?}", result.total_time);
    println!("  Average time: {:?}", result.avg_time);
    println!("  Min time:     {:?}", result.min_time);
    println!("  Max time:     {:?}", result.max_time);
    println!("  Throughput:   {:.2} records/sec", result.throughput);
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Tally Aggregation Benchmarks ===");

    let config = BenchConfig {
        iterations: 5,
        warmup_iterations: 2,
        record_count: 200_000,
        num_threads: ParallelConfig::default().worker_threads,
    };

    for result in run_all(&config)? {
        print_result(&result);
    }

    println!("\n=== Scaling ===");

    for record_count in [1_000, 10_000, 100_000, 1_000_000] {
        let config = BenchConfig {
            iterations: 3,
            warmup_iterations: 1,
            record_count,
            ..config.clone()
        };

        let result = bench_grouping(&config)?;
        println!("\nRecords: {record_count}");
        println!("  Average time: {:?}", result.avg_time);
        println!("  Throughput:   {:.2} records/sec", result.throughput);
    }

    Ok(())
}
