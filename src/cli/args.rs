use crate::config::DashboardConfig;
use crate::strategy::{BatchConfig, ReplayConfig};
use crate::types::EarnflowError;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

/// Replay EarnFlow dashboard events and print the final wallet state
#[derive(Parser, Debug)]
#[command(name = "earnflow")]
#[command(about = "Replay EarnFlow dashboard events and print the final wallet state", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing scripted events
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy to use for the replay
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for single-threaded or 'async' for batched replay"
    )]
    pub strategy: StrategyType,

    /// Balance required before a withdrawal may start
    #[arg(long = "min-withdrawal", value_name = "AMOUNT", help = "Minimum withdrawal balance (default: 10.00)")]
    pub min_withdrawal: Option<Decimal>,

    /// Tasks allowed per cycle
    #[arg(long = "max-tasks", value_name = "COUNT", help = "Tasks per cycle (default: 20)")]
    pub max_tasks: Option<u32>,

    /// Simulated payout latency
    #[arg(
        long = "confirmation-delay-ms",
        value_name = "MILLIS",
        help = "Simulated confirmation delay in milliseconds (default: 3000)"
    )]
    pub confirmation_delay_ms: Option<u64>,

    /// Seed for sampled commissions
    #[arg(long = "seed", value_name = "SEED", help = "Seed for reproducible sampled commissions")]
    pub seed: Option<u64>,

    /// Number of events per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of events per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Optional ledger output path
    #[arg(long = "ledger", value_name = "PATH", help = "Also write every ledger entry to this CSV file")]
    pub ledger: Option<PathBuf>,
}

/// Available replay strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values use defaults; zero values fall back to defaults with
    /// a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create a validated DashboardConfig from CLI arguments
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the overrides produce an invalid config.
    pub fn to_dashboard_config(&self) -> Result<DashboardConfig, EarnflowError> {
        let default = DashboardConfig::default();
        let config = DashboardConfig {
            minimum_withdrawal: self.min_withdrawal.unwrap_or(default.minimum_withdrawal),
            max_tasks: self.max_tasks.unwrap_or(default.max_tasks),
            confirmation_delay: self
                .confirmation_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(default.confirmation_delay),
            commission: default.commission,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create the ReplayConfig shared by both strategies
    pub fn to_replay_config(&self) -> Result<ReplayConfig, EarnflowError> {
        Ok(ReplayConfig {
            dashboard: self.to_dashboard_config()?,
            seed: self.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "input.csv"], StrategyType::Sync)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "input.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "input.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::batch_size(&["program", "--batch-size", "2000", "input.csv"], Some(2000), None)]
    #[case::max_concurrent(&["program", "--max-concurrent", "8", "input.csv"], None, Some(8))]
    #[case::no_options(&["program", "input.csv"], None, None)]
    fn test_batch_options(
        #[case] args: &[&str],
        #[case] batch_size: Option<usize>,
        #[case] max_concurrent: Option<usize>,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.batch_size, batch_size);
        assert_eq!(parsed.max_concurrent_batches, max_concurrent);
    }

    #[rstest]
    #[case::all_defaults(&["program", "input.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "input.csv"], 2000, num_cpus::get())]
    #[case::all_custom(
        &["program", "--batch-size", "2000", "--max-concurrent", "8", "input.csv"],
        2000,
        8
    )]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "input.csv"], 1000, num_cpus::get())]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "input.csv"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
    }

    #[test]
    fn test_dashboard_config_defaults() {
        let parsed = CliArgs::try_parse_from(["program", "input.csv"]).unwrap();
        assert_eq!(parsed.to_dashboard_config().unwrap(), DashboardConfig::default());
        assert_eq!(parsed.to_replay_config().unwrap().seed, None);
    }

    #[test]
    fn test_dashboard_config_overrides() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--min-withdrawal",
            "5.50",
            "--max-tasks",
            "10",
            "--confirmation-delay-ms",
            "250",
            "--seed",
            "42",
            "--ledger",
            "ledger.csv",
            "input.csv",
        ])
        .unwrap();

        let replay = parsed.to_replay_config().unwrap();
        assert_eq!(replay.dashboard.minimum_withdrawal, Decimal::new(550, 2));
        assert_eq!(replay.dashboard.max_tasks, 10);
        assert_eq!(replay.dashboard.confirmation_delay, Duration::from_millis(250));
        assert_eq!(replay.seed, Some(42));
        assert_eq!(parsed.ledger, Some(PathBuf::from("ledger.csv")));
    }

    #[rstest]
    #[case::zero_tasks(&["program", "--max-tasks", "0", "input.csv"])]
    #[case::negative_minimum(&["program", "--min-withdrawal=-1", "input.csv"])]
    fn test_dashboard_config_rejects_invalid(#[case] args: &[&str]) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert!(matches!(
            parsed.to_dashboard_config(),
            Err(EarnflowError::InvalidConfig { .. })
        ));
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "input.csv"])]
    #[case::invalid_minimum(&["program", "--min-withdrawal", "ten", "input.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
