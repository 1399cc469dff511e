//! Ledger record types
//!
//! A [`Transaction`] is created for every earning and every withdrawal
//! attempt. Once created, only its `status` and `tx_hash` ever change.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// Dashboard user identifier
///
/// Each user owns exactly one independent session.
pub type UserId = u32;

/// Transaction identifier
///
/// Allocated sequentially per session, starting at 1.
pub type TransactionId = u64;

/// What a ledger entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Funds leaving the balance toward a payout destination
    Withdrawal,

    /// Commission credited for a completed task
    Earning,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Withdrawal => write!(f, "withdrawal"),
            TransactionKind::Earning => write!(f, "earning"),
        }
    }
}

/// Settlement status of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Withdrawal submitted, confirmation outstanding
    Pending,

    /// Settled. Earnings are created in this state.
    Confirmed,

    /// Withdrawal rejected; the optimistic deduction was rolled back
    Failed,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Confirmed => write!(f, "confirmed"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A single ledger entry
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub amount: Decimal,

    /// Payout destination, withdrawals only
    pub address: Option<String>,

    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,

    /// Processor reference, set when a withdrawal confirms
    pub tx_hash: Option<String>,
}

impl Transaction {
    /// Build a pending withdrawal entry
    pub fn withdrawal(
        id: TransactionId,
        amount: Decimal,
        address: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Transaction {
            id,
            kind: TransactionKind::Withdrawal,
            amount,
            address,
            status: TransactionStatus::Pending,
            timestamp,
            tx_hash: None,
        }
    }

    /// Build a confirmed earning entry
    pub fn earning(id: TransactionId, amount: Decimal, timestamp: DateTime<Utc>) -> Self {
        Transaction {
            id,
            kind: TransactionKind::Earning,
            amount,
            address: None,
            status: TransactionStatus::Confirmed,
            timestamp,
            tx_hash: None,
        }
    }
}
