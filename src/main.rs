//! EarnFlow replay CLI
//!
//! Replays a CSV script of dashboard events and prints the final wallet
//! state of every user to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- events.csv > wallets.csv
//! cargo run -- --strategy async --batch-size 500 events.csv > wallets.csv
//! cargo run -- --seed 7 --ledger ledger.csv events.csv > wallets.csv
//! RUST_LOG=info cargo run -- events.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success (rejected events are logged, not fatal)
//! - 1: Error (invalid configuration, file not found, unwritable output)

use earnflow_engine::cli::{self, CliArgs};
use earnflow_engine::io::write_ledger_csv;
use earnflow_engine::strategy;
use earnflow_engine::types::EarnflowError;
use std::fs::File;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), EarnflowError> {
    let replay = args.to_replay_config()?;
    let batch = matches!(args.strategy, cli::StrategyType::Async).then(|| args.to_batch_config());
    let strategy = strategy::create_strategy(args.strategy, replay, batch);

    let mut output = std::io::stdout();
    let report = strategy.process(&args.input_file, &mut output)?;

    if let Some(path) = &args.ledger {
        let mut file = File::create(path).map_err(|e| EarnflowError::IoError {
            message: format!("Failed to create ledger file '{}': {}", path.display(), e),
        })?;
        write_ledger_csv(&report.ledger, &mut file)?;
    }

    Ok(())
}
