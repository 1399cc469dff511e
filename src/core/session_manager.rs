//! Session management module
//!
//! This module provides the `SessionManager` struct which maintains one
//! DashboardEngine per user for single-threaded replay.
//!
//! The SessionManager is responsible for:
//! - Creating a session on a user's first event
//! - Routing each event to the owning session
//! - Providing sorted summaries for output

use crate::config::DashboardConfig;
use crate::core::engine::DashboardEngine;
use crate::types::{DashboardEvent, EarnflowError, Transaction, UserId, WalletSummary};
use std::collections::HashMap;

/// Owns every user's session
#[derive(Debug)]
pub struct SessionManager {
    config: DashboardConfig,
    seed: Option<u64>,
    sessions: HashMap<UserId, DashboardEngine>,
}

impl SessionManager {
    /// Create a SessionManager with no sessions
    ///
    /// New sessions are built from `config`; with a `seed`, their sampled
    /// commissions are reproducible.
    pub fn new(config: DashboardConfig, seed: Option<u64>) -> Self {
        SessionManager {
            config,
            seed,
            sessions: HashMap::new(),
        }
    }

    /// Get or create the session for a user
    pub fn session(&mut self, user: UserId) -> &mut DashboardEngine {
        let config = &self.config;
        let seed = self.seed;
        self.sessions
            .entry(user)
            .or_insert_with(|| DashboardEngine::seeded(user, config.clone(), seed))
    }

    /// Apply an event to a user's session
    ///
    /// Effects queued by the event are drained; replay scripts confirm or
    /// fail withdrawals with explicit events instead.
    pub fn apply(&mut self, user: UserId, event: DashboardEvent) -> Result<(), EarnflowError> {
        let session = self.session(user);
        let result = session.process(event);
        for effect in session.drain_effects() {
            log::debug!("user {}: {:?}", user, effect);
        }
        result
    }

    /// Summaries of every session, sorted by user
    pub fn summaries(&self) -> Vec<WalletSummary> {
        let mut summaries: Vec<WalletSummary> =
            self.sessions.values().map(DashboardEngine::summary).collect();
        summaries.sort_by_key(|summary| summary.user);
        summaries
    }

    /// Every ledger entry, grouped by user in ascending order
    pub fn ledgers(&self) -> Vec<(UserId, Transaction)> {
        let mut users: Vec<&UserId> = self.sessions.keys().collect();
        users.sort();

        users
            .into_iter()
            .flat_map(|user| {
                self.sessions[user]
                    .ledger()
                    .entries()
                    .iter()
                    .map(move |tx| (*user, tx.clone()))
            })
            .collect()
    }
}
