//! Balance management module
//!
//! This module provides the `BalanceBook` struct which owns a session's
//! confirmed balance and its in-flight withdrawal amount.
//!
//! The BalanceBook is responsible for:
//! - Crediting task commissions
//! - Reserving funds when a withdrawal starts (optimistic deduction)
//! - Settling reserved funds when the withdrawal confirms
//! - Releasing reserved funds when the withdrawal fails
//!
//! Every operation keeps `available = balance - pending_withdrawal >= 0`.

use crate::types::{EarnflowError, WalletState};
use rust_decimal::Decimal;

/// Owner of one session's balances
#[derive(Debug, Clone, Default)]
pub struct BalanceBook {
    wallet: WalletState,
}

impl BalanceBook {
    /// Create a BalanceBook with zero balances
    pub fn new() -> Self {
        BalanceBook {
            wallet: WalletState::new(),
        }
    }

    /// Current balances
    pub fn wallet(&self) -> &WalletState {
        &self.wallet
    }

    pub fn balance(&self) -> Decimal {
        self.wallet.balance
    }

    pub fn pending(&self) -> Decimal {
        self.wallet.pending_withdrawal
    }

    pub fn available(&self) -> Decimal {
        self.wallet.available()
    }

    /// Credit a commission to the confirmed balance
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is zero or negative
    /// - Adding the amount to the balance would overflow
    pub fn credit(&mut self, amount: Decimal) -> Result<(), EarnflowError> {
        if amount <= Decimal::ZERO {
            return Err(EarnflowError::NonPositiveAmount { amount });
        }

        self.wallet.balance = self
            .wallet
            .balance
            .checked_add(amount)
            .ok_or_else(|| EarnflowError::arithmetic_overflow("credit"))?;

        Ok(())
    }

    /// Move funds into the in-flight withdrawal amount
    ///
    /// The confirmed balance does not change; only the available amount
    /// drops.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is zero or negative
    /// - Funds are already reserved
    /// - The amount exceeds the available balance
    pub fn reserve(&mut self, amount: Decimal) -> Result<(), EarnflowError> {
        if amount <= Decimal::ZERO {
            return Err(EarnflowError::NonPositiveAmount { amount });
        }

        if !self.wallet.pending_withdrawal.is_zero() {
            return Err(EarnflowError::withdrawal_in_progress(None));
        }

        let available = self.available();
        if amount > available {
            return Err(EarnflowError::insufficient_funds(available, amount));
        }

        self.wallet.pending_withdrawal = amount;
        Ok(())
    }

    /// Subtract the reserved amount from the balance and clear it
    ///
    /// Returns the settled amount.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Nothing is reserved
    /// - Subtracting would underflow
    pub fn settle(&mut self) -> Result<Decimal, EarnflowError> {
        let amount = self.wallet.pending_withdrawal;
        if amount.is_zero() {
            return Err(EarnflowError::NoWithdrawalInFlight);
        }

        let new_balance = self
            .wallet
            .balance
            .checked_sub(amount)
            .filter(|balance| !balance.is_sign_negative())
            .ok_or_else(|| EarnflowError::arithmetic_underflow("settle"))?;

        self.wallet.balance = new_balance;
        self.wallet.pending_withdrawal = Decimal::ZERO;

        Ok(amount)
    }

    /// Drop the reservation, leaving the balance untouched
    ///
    /// Returns the released amount (zero if nothing was reserved).
    pub fn release(&mut self) -> Decimal {
        std::mem::replace(&mut self.wallet.pending_withdrawal, Decimal::ZERO)
    }

    /// Zero both balances
    pub fn clear(&mut self) {
        self.wallet = WalletState::new();
    }
}
