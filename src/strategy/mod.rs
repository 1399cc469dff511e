//! Processing strategy module for event replay
//!
//! This module defines the Strategy pattern for complete replay pipelines,
//! covering both script parsing and session processing. This allows the
//! synchronous and asynchronous batch implementations to be selected at
//! runtime.

use crate::cli::StrategyType;
use crate::config::DashboardConfig;
use crate::io::csv_format::write_summaries_csv;
use crate::types::{EarnflowError, Transaction, UserId, WalletSummary};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Settings shared by every strategy
#[derive(Debug, Clone, Default)]
pub struct ReplayConfig {
    /// Configuration for every session created during the replay
    pub dashboard: DashboardConfig,
    /// Seed for sampled commissions; `None` draws from entropy
    pub seed: Option<u64>,
}

/// Final state of a replay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayReport {
    /// One summary per user, sorted by user
    pub summaries: Vec<WalletSummary>,
    /// Every ledger entry, grouped by user in ascending order
    pub ledger: Vec<(UserId, Transaction)>,
    /// Events the sessions accepted
    pub applied: usize,
    /// Events the sessions rejected
    pub rejected: usize,
    /// Rows that could not be parsed
    pub skipped: usize,
}

/// Processing strategy trait for complete replay pipelines
///
/// Rejected events and malformed rows are logged and counted in the
/// report; they never abort a replay.
pub trait ProcessingStrategy: Send + Sync {
    /// Replay the script at `input_path` and return the final state
    ///
    /// # Errors
    ///
    /// Returns an error if the input file cannot be opened or read, or the
    /// async runtime cannot be created.
    fn replay(&self, input_path: &Path) -> Result<ReplayReport, EarnflowError>;

    /// Replay the script and write the summaries CSV to `output`
    fn process(
        &self,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<ReplayReport, EarnflowError> {
        let report = self.replay(input_path)?;
        write_summaries_csv(&report.summaries, output)?;
        Ok(report)
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// `batch` is only used by the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    replay: ReplayConfig,
    batch: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(replay)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            replay,
            batch.unwrap_or_default(),
        )),
    }
}

/// Log an event the session did not accept
pub(crate) fn log_rejection(user: UserId, event: &str, error: &EarnflowError) {
    if error.is_rejection() {
        log::warn!("user {}: {} rejected: {}", user, event, error);
    } else {
        log::warn!("user {}: {} failed: {}", user, event, error);
    }
}
