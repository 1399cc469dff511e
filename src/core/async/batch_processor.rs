//! Batch processor for concurrent event replay
//!
//! Partitions a batch of scripted events by user and replays each user's
//! events on its own tokio task. Events of one user are applied strictly in
//! input order; events of different users run concurrently.
//!
//! Batches must be processed one after another (awaiting each
//! `process_batch`) for ordering to hold across batch boundaries.

use crate::core::r#async::AsyncSessionRegistry;
use crate::types::{DashboardEvent, EarnflowError, ScriptedEvent, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Outcome of one replayed event
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub user: UserId,
    pub event: DashboardEvent,
    pub result: Result<(), EarnflowError>,
}

/// Replays batches of scripted events against a shared registry
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    registry: Arc<AsyncSessionRegistry>,
}

impl BatchProcessor {
    pub fn new(registry: Arc<AsyncSessionRegistry>) -> Self {
        Self { registry }
    }

    /// Split a batch into per-user event lists, keeping input order
    pub fn partition_by_user(&self, batch: Vec<ScriptedEvent>) -> HashMap<UserId, Vec<DashboardEvent>> {
        let mut user_batches: HashMap<UserId, Vec<DashboardEvent>> = HashMap::new();

        for scripted in batch {
            user_batches
                .entry(scripted.user)
                .or_default()
                .push(scripted.event);
        }

        user_batches
    }

    /// Apply one user's events in order
    ///
    /// Every event is applied even if earlier ones fail.
    pub async fn process_user_events(
        &self,
        user: UserId,
        events: Vec<DashboardEvent>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(events.len());

        for event in events {
            let result = self.registry.apply(user, event.clone());
            results.push(ProcessingResult {
                user,
                event,
                result,
            });
        }

        results
    }

    /// Replay a batch, one task per user
    ///
    /// Results are grouped per user; the order between users is unspecified.
    ///
    /// # Errors
    ///
    /// Returns `TaskJoin` if a user's task panicked or was cancelled.
    pub async fn process_batch(
        &self,
        batch: Vec<ScriptedEvent>,
    ) -> Result<Vec<ProcessingResult>, EarnflowError> {
        let user_batches = self.partition_by_user(batch);

        let mut tasks = Vec::with_capacity(user_batches.len());
        for (user, events) in user_batches {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_user_events(user, events).await
            }));
        }

        collect_results(tasks).await
    }
}

/// Await every user task, failing on the first one that did not finish
async fn collect_results(
    tasks: Vec<JoinHandle<Vec<ProcessingResult>>>,
) -> Result<Vec<ProcessingResult>, EarnflowError> {
    let mut results = Vec::new();
    for task in tasks {
        let user_results = task.await.map_err(|e| {
            log::error!("Replay task failed: {}", e);
            EarnflowError::TaskJoin {
                message: e.to_string(),
            }
        })?;
        results.extend(user_results);
    }
    Ok(results)
}
