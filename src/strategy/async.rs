//! Asynchronous batch processing strategy
//!
//! Reads the script in batches and replays each batch with user-based
//! partitioning across a tokio multi-threaded runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (user partitioning + tokio tasks)
//!     └── AsyncSessionRegistry (DashMap of sessions)
//! ```
//!
//! Batches are processed one after another, so a user's events keep their
//! input order even when they span several batches. Within a batch,
//! different users run in parallel.

use crate::core::r#async::{AsyncSessionRegistry, BatchProcessor};
use crate::io::async_reader::AsyncReader;
use crate::io::open_error;
use crate::strategy::{log_rejection, ProcessingStrategy, ReplayConfig, ReplayReport};
use crate::types::EarnflowError;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    /// Number of events per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a BatchConfig, replacing zero values with defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            log::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            log::warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches,
                default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    replay: ReplayConfig,
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(replay: ReplayConfig, config: BatchConfig) -> Self {
        Self { replay, config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn replay(&self, input_path: &Path) -> Result<ReplayReport, EarnflowError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| EarnflowError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let registry = Arc::new(AsyncSessionRegistry::new(
                self.replay.dashboard.clone(),
                self.replay.seed,
            ));
            let processor = BatchProcessor::new(Arc::clone(&registry));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| open_error(input_path, e))?;

            // csv-async expects futures-io traits
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);
            let mut report = ReplayReport::default();

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for outcome in processor.process_batch(batch).await? {
                    match outcome.result {
                        Ok(()) => report.applied += 1,
                        Err(e) => {
                            report.rejected += 1;
                            log_rejection(outcome.user, outcome.event.name(), &e);
                        }
                    }
                }
            }

            report.skipped = reader.skipped();
            report.summaries = registry.summaries();
            report.ledger = registry.ledgers();
            log::info!(
                "Replayed {} events for {} users ({} rejected, {} skipped)",
                report.applied + report.rejected,
                report.summaries.len(),
                report.rejected,
                report.skipped
            );

            Ok(report)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[rstest]
    #[case::defaults(1000, num_cpus::get(), 1000, num_cpus::get())]
    #[case::custom(50, 3, 50, 3)]
    #[case::zero_batch_size(0, 3, 1000, 3)]
    #[case::zero_workers(50, 0, 50, num_cpus::get())]
    fn test_batch_config_new(
        #[case] batch_size: usize,
        #[case] workers: usize,
        #[case] expected_batch_size: usize,
        #[case] expected_workers: usize,
    ) {
        let config = BatchConfig::new(batch_size, workers);
        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_workers);
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncProcessingStrategy::new(ReplayConfig::default(), BatchConfig::default());
        let result = strategy.replay(Path::new("nonexistent.csv"));
        assert!(matches!(result, Err(EarnflowError::FileNotFound { .. })));
    }

    #[test]
    fn test_async_strategy_maintains_ordering_across_batches() {
        // user 1's withdraw arrives in a later batch than its earnings
        let file = create_temp_csv(
            "type,user,amount,detail\n\
             start,1,,\n\
             start,2,,\n\
             complete,1,11.00,\n\
             complete,2,3.00,\n\
             withdraw,1,,\n\
             confirm,1,,0x01\n\
             withdraw,2,,\n",
        );

        let strategy = AsyncProcessingStrategy::new(ReplayConfig::default(), BatchConfig::new(2, 2));
        let mut output = Vec::new();
        let report = strategy.process(file.path(), &mut output).unwrap();

        assert_eq!(report.applied, 6);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.summaries[0].balance, Decimal::ZERO);
        assert!(report.summaries[0].has_withdrawn);
        assert_eq!(report.summaries[1].balance, Decimal::new(300, 2));
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "user,balance,pending,available,tasks,has_withdrawn,withdrawing\n\
             1,0.00,0.00,0.00,1,true,false\n\
             2,3.00,0.00,3.00,1,false,false\n"
        );
    }
}
