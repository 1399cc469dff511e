//! Transaction ledger
//!
//! This module provides the TransactionLedger component that keeps every
//! earning and withdrawal attempt of a session, in creation order. Entries
//! are looked up by id so that a confirmation or failure can update the
//! matching withdrawal in place.
//!
//! # Duplicate Handling
//!
//! If a duplicate transaction ID is recorded, only the first occurrence is
//! kept. Subsequent entries with the same ID are ignored.

use crate::types::{EarnflowError, Transaction, TransactionId, TransactionStatus};
use std::collections::HashMap;

/// Ordered ledger with id lookup
#[derive(Debug, Clone, Default)]
pub struct TransactionLedger {
    /// Entries in creation order
    entries: Vec<Transaction>,

    /// Position of each entry in `entries`
    index: HashMap<TransactionId, usize>,
}

impl TransactionLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        TransactionLedger {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append an entry
    ///
    /// Returns `false` and leaves the ledger unchanged if the id is taken.
    pub fn record(&mut self, tx: Transaction) -> bool {
        if self.index.contains_key(&tx.id) {
            return false;
        }
        self.index.insert(tx.id, self.entries.len());
        self.entries.push(tx);
        true
    }

    pub fn get(&self, tx_id: TransactionId) -> Option<&Transaction> {
        self.index.get(&tx_id).map(|&pos| &self.entries[pos])
    }

    fn get_mut(&mut self, tx_id: TransactionId) -> Option<&mut Transaction> {
        match self.index.get(&tx_id) {
            Some(&pos) => self.entries.get_mut(pos),
            None => None,
        }
    }

    /// Whether an entry with this id exists
    pub fn contains(&self, tx_id: TransactionId) -> bool {
        self.index.contains_key(&tx_id)
    }

    /// Update the mutable fields of an entry
    ///
    /// `tx_hash` is only written when provided; an existing hash is kept
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the id is unknown.
    pub fn set_status(
        &mut self,
        tx_id: TransactionId,
        status: TransactionStatus,
        tx_hash: Option<String>,
    ) -> Result<(), EarnflowError> {
        let tx = self
            .get_mut(tx_id)
            .ok_or_else(|| EarnflowError::transaction_not_found(tx_id, "set_status"))?;

        tx.status = status;
        if tx_hash.is_some() {
            tx.tx_hash = tx_hash;
        }
        Ok(())
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    /// Entries still awaiting confirmation
    pub fn pending(&self) -> impl Iterator<Item = &Transaction> {
        self.entries
            .iter()
            .filter(|tx| tx.status == TransactionStatus::Pending)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
