//! Thread-safe session registry for concurrent use
//!
//! This module provides the `AsyncSessionRegistry` struct, which holds one
//! DashboardEngine per user in a `DashMap`.
//!
//! # Design
//!
//! `DashMap` shards its entries, so sessions of different users can be
//! updated from different tasks at the same time, while operations on the
//! same user are serialized by the entry lock. Each update runs to
//! completion under that lock, so no task can observe a half-applied
//! transition.

use crate::config::DashboardConfig;
use crate::core::engine::DashboardEngine;
use crate::types::{DashboardEvent, EarnflowError, Transaction, UserId, WalletSummary};
use dashmap::DashMap;

/// Concurrent map of user sessions
#[derive(Debug)]
pub struct AsyncSessionRegistry {
    config: DashboardConfig,
    seed: Option<u64>,

    /// Sessions by user; created on first access
    sessions: DashMap<UserId, DashboardEngine>,
}

impl AsyncSessionRegistry {
    /// Create an empty registry
    pub fn new(config: DashboardConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            seed,
            sessions: DashMap::new(),
        }
    }

    /// Run a closure against a user's session
    ///
    /// The session is created first if needed. The closure holds the entry
    /// lock for its whole duration; it must not await or touch the same user
    /// again.
    pub fn update<F, T>(&self, user: UserId, f: F) -> Result<T, EarnflowError>
    where
        F: FnOnce(&mut DashboardEngine) -> Result<T, EarnflowError>,
    {
        let mut entry = self
            .sessions
            .entry(user)
            .or_insert_with(|| DashboardEngine::seeded(user, self.config.clone(), self.seed));
        f(entry.value_mut())
    }

    /// Apply an event to a user's session, draining its effects
    pub fn apply(&self, user: UserId, event: DashboardEvent) -> Result<(), EarnflowError> {
        self.update(user, |session| {
            let result = session.process(event);
            for effect in session.drain_effects() {
                log::debug!("user {}: {:?}", user, effect);
            }
            result
        })
    }

    /// Snapshot of one session, if it exists
    pub fn summary(&self, user: UserId) -> Option<WalletSummary> {
        self.sessions.get(&user).map(|session| session.summary())
    }

    /// Copy of one ledger entry, if it exists
    pub fn transaction(&self, user: UserId, tx: u64) -> Option<Transaction> {
        self.sessions
            .get(&user)
            .and_then(|session| session.transaction(tx).cloned())
    }

    /// Summaries of every session, sorted by user
    pub fn summaries(&self) -> Vec<WalletSummary> {
        let mut summaries: Vec<WalletSummary> = self
            .sessions
            .iter()
            .map(|entry| entry.value().summary())
            .collect();
        summaries.sort_by_key(|summary| summary.user);
        summaries
    }

    /// Every ledger entry, grouped by user in ascending order
    pub fn ledgers(&self) -> Vec<(UserId, Transaction)> {
        let mut rows: Vec<(UserId, Transaction)> = self
            .sessions
            .iter()
            .flat_map(|entry| {
                let user = *entry.key();
                entry
                    .value()
                    .ledger()
                    .entries()
                    .iter()
                    .map(|tx| (user, tx.clone()))
                    .collect::<Vec<_>>()
            })
            .collect();
        // stable: keeps ledger order within a user
        rows.sort_by_key(|(user, _)| *user);
        rows
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
