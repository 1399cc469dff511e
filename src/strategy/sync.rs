//! Synchronous processing strategy
//!
//! Single-threaded replay. Orchestrates the flow between:
//! - `SyncReader` for CSV input (iterator interface)
//! - `SessionManager` for per-user session state
//!
//! Rows are streamed one at a time; memory grows with the number of users
//! and ledger entries, not with the script length.

use crate::core::SessionManager;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{log_rejection, ProcessingStrategy, ReplayConfig, ReplayReport};
use crate::types::EarnflowError;
use std::path::Path;

/// Synchronous processing strategy
///
/// ```no_run
/// use earnflow_engine::strategy::{ProcessingStrategy, ReplayConfig, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let strategy = SyncProcessingStrategy::new(ReplayConfig::default());
/// let mut output = std::io::stdout();
/// strategy.process(Path::new("events.csv"), &mut output).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct SyncProcessingStrategy {
    config: ReplayConfig,
}

impl SyncProcessingStrategy {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn replay(&self, input_path: &Path) -> Result<ReplayReport, EarnflowError> {
        let mut manager = SessionManager::new(self.config.dashboard.clone(), self.config.seed);
        let reader = SyncReader::new(input_path)?;
        let mut report = ReplayReport::default();

        for row in reader {
            match row {
                Ok(scripted) => {
                    let name = scripted.event.name();
                    match manager.apply(scripted.user, scripted.event) {
                        Ok(()) => report.applied += 1,
                        Err(e) => {
                            report.rejected += 1;
                            log_rejection(scripted.user, name, &e);
                        }
                    }
                }
                Err(e) => {
                    report.skipped += 1;
                    log::warn!("Skipping row: {}", e);
                }
            }
        }

        report.summaries = manager.summaries();
        report.ledger = manager.ledgers();
        log::info!(
            "Replayed {} events for {} users ({} rejected, {} skipped)",
            report.applied + report.rejected,
            report.summaries.len(),
            report.rejected,
            report.skipped
        );

        Ok(report)
    }
}
