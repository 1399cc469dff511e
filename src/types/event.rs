//! Events fed into a dashboard session and the effects it emits
//!
//! Events are the inputs of the engine's transition functions. Effects are
//! the outputs a caller must act on, such as waiting for a payout
//! confirmation from the payment processor.

use super::commission::Commission;
use super::transaction::{TransactionId, UserId};
use rust_decimal::Decimal;
use std::time::Duration;

/// A user request to move funds out of the balance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WithdrawalRequest {
    /// Amount to withdraw. `None` withdraws the full available balance.
    pub amount: Option<Decimal>,

    /// Payout destination (bank account, wallet address)
    pub address: Option<String>,
}

impl WithdrawalRequest {
    /// Withdraw everything that is available
    pub fn full_balance() -> Self {
        Self::default()
    }

    pub fn amount(amount: Decimal) -> Self {
        WithdrawalRequest {
            amount: Some(amount),
            address: None,
        }
    }

    pub fn to_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Inputs accepted by [`crate::core::DashboardEngine::process`]
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// Begin an optimization task
    StartTask,

    /// Finish the running task. A missing commission is sampled.
    CompleteTask { commission: Option<Commission> },

    /// Request a withdrawal
    Withdraw(WithdrawalRequest),

    /// Payment processor confirmed the payout.
    /// A missing `tx` targets the withdrawal currently in flight.
    ConfirmWithdrawal {
        tx: Option<TransactionId>,
        tx_hash: Option<String>,
    },

    /// Payment processor rejected the payout
    FailWithdrawal {
        tx: Option<TransactionId>,
        reason: String,
    },

    /// Start a new task cycle once the counter is full
    ResetTasks,

    /// Clear the whole session for a new cycle
    ResetAccount,
}

impl DashboardEvent {
    /// Short lowercase name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            DashboardEvent::StartTask => "start",
            DashboardEvent::CompleteTask { .. } => "complete",
            DashboardEvent::Withdraw(_) => "withdraw",
            DashboardEvent::ConfirmWithdrawal { .. } => "confirm",
            DashboardEvent::FailWithdrawal { .. } => "fail",
            DashboardEvent::ResetTasks => "reset_tasks",
            DashboardEvent::ResetAccount => "reset_account",
        }
    }
}

/// An event addressed to one user's session, as read from a replay script
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedEvent {
    pub user: UserId,
    pub event: DashboardEvent,
}

/// Work queued by the engine for its caller
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// A withdrawal is pending; confirmation is expected after `delay`
    AwaitConfirmation {
        tx: TransactionId,
        amount: Decimal,
        address: Option<String>,
        delay: Duration,
    },
}

/// Payout submitted to a [`crate::core::PaymentGateway`]
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutRequest {
    pub user: UserId,
    pub tx: TransactionId,
    pub amount: Decimal,
    pub address: Option<String>,

    /// Stable per withdrawal, so a resubmission cannot pay twice
    pub idempotency_key: String,

    /// Expected settlement latency
    pub delay: Duration,
}

impl PayoutRequest {
    pub fn new(
        user: UserId,
        tx: TransactionId,
        amount: Decimal,
        address: Option<String>,
        delay: Duration,
    ) -> Self {
        PayoutRequest {
            user,
            tx,
            amount,
            address,
            idempotency_key: format!("{}-{}", user, tx),
            delay,
        }
    }
}

/// Gateway acknowledgement of a settled payout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutReceipt {
    pub tx_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_request_idempotency_key() {
        let request = PayoutRequest::new(4, 12, Decimal::TEN, None, Duration::ZERO);
        assert_eq!(request.idempotency_key, "4-12");
    }

    #[test]
    fn test_withdrawal_request_builders() {
        let request = WithdrawalRequest::amount(Decimal::new(1500, 2)).to_address("bank_01");
        assert_eq!(request.amount, Some(Decimal::new(1500, 2)));
        assert_eq!(request.address.as_deref(), Some("bank_01"));

        assert_eq!(WithdrawalRequest::full_balance().amount, None);
    }
}
