//! Benchmark suite for comparing replay strategies
//!
//! Compares the synchronous and asynchronous replay strategies using the
//! divan benchmarking framework.
//!
//! ```bash
//! cargo bench
//! ```
//!
//! # Benchmark Fixtures
//!
//! - `benchmark_small.csv` - 2 users, one full cycle each (~90 events)
//! - `benchmark_medium.csv` - 50 users, five cycles each (~10,000 events)
//!
//! Every cycle completes 20 tasks, withdraws, confirms or fails the
//! withdrawal and resets the account. Users are interleaved.

use earnflow_engine::cli::StrategyType;
use earnflow_engine::strategy::{create_strategy, BatchConfig, ReplayConfig};
use std::path::Path;

fn main() {
    divan::main();
}

const FIXTURES: &[&str] = &[
    "benches/fixtures/benchmark_small.csv",
    "benches/fixtures/benchmark_medium.csv",
];

#[divan::bench(args = FIXTURES)]
fn sync_strategy(fixture: &str) {
    let strategy = create_strategy(StrategyType::Sync, ReplayConfig::default(), None);
    let mut output = Vec::new();

    strategy
        .process(Path::new(fixture), &mut output)
        .expect("Replay failed");
}

#[divan::bench(args = FIXTURES)]
fn async_strategy(fixture: &str) {
    let strategy = create_strategy(
        StrategyType::Async,
        ReplayConfig::default(),
        Some(BatchConfig::default()),
    );
    let mut output = Vec::new();

    strategy
        .process(Path::new(fixture), &mut output)
        .expect("Replay failed");
}

/// Async replay with batches smaller than one user's cycle
#[divan::bench(args = [50, 250, 1000])]
fn async_strategy_batch_size(batch_size: usize) {
    let strategy = create_strategy(
        StrategyType::Async,
        ReplayConfig::default(),
        Some(BatchConfig::new(batch_size, num_cpus::get())),
    );
    let mut output = Vec::new();

    strategy
        .process(Path::new("benches/fixtures/benchmark_medium.csv"), &mut output)
        .expect("Replay failed");
}
