//! Balance state for a dashboard session
//!
//! This module defines the WalletState structure holding confirmed earnings
//! and the amount currently in flight toward a payout, plus the flattened
//! WalletSummary used for output.

use super::transaction::UserId;
use rust_decimal::Decimal;

/// Confirmed balance and in-flight withdrawal amount
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletState {
    /// Confirmed earnings
    ///
    /// Grows with task completions, shrinks only when a withdrawal confirms.
    pub balance: Decimal,

    /// Funds reserved by a withdrawal awaiting confirmation
    ///
    /// Deducted from what the user sees immediately, but not from `balance`
    /// until the payout confirms.
    pub pending_withdrawal: Decimal,
}

impl WalletState {
    /// Create an empty wallet
    pub fn new() -> Self {
        WalletState {
            balance: Decimal::ZERO,
            pending_withdrawal: Decimal::ZERO,
        }
    }

    /// Balance shown to the user: `balance - pending_withdrawal`
    pub fn available(&self) -> Decimal {
        self.balance - self.pending_withdrawal
    }
}

/// Snapshot of one session for reporting
#[derive(Debug, Clone, PartialEq)]
pub struct WalletSummary {
    pub user: UserId,
    pub balance: Decimal,
    pub pending_withdrawal: Decimal,
    pub available: Decimal,
    pub tasks_completed: u32,
    pub has_withdrawn: bool,
    pub is_withdrawing: bool,
}
