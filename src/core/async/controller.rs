//! Withdrawal controller backed by a payment gateway
//!
//! `WithdrawalController` is the production path for withdrawals: it applies
//! the optimistic deduction synchronously, hands the payout to a
//! [`PaymentGateway`], and reconciles the session when the gateway answers.
//!
//! ```text
//! withdraw() ──▶ session.withdraw()        (pending tx, funds reserved)
//!            └─▶ tokio task: gateway.submit_payout().await
//!                   ├─ Ok(receipt) ─▶ session.confirm_withdrawal(tx, hash)
//!                   └─ Err(e)      ─▶ session.fail_withdrawal(tx, e)
//! ```
//!
//! The optimistic deduction is always visible before the confirmation task
//! runs, because it is applied before the task is spawned.

use crate::core::r#async::AsyncSessionRegistry;
use crate::core::traits::PaymentGateway;
use crate::types::{
    EarnflowError, Effect, PayoutRequest, TransactionId, TransactionStatus, UserId,
    WithdrawalRequest,
};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A withdrawal whose confirmation is in progress
#[derive(Debug)]
pub struct WithdrawalHandle {
    pub tx: TransactionId,
    task: JoinHandle<Result<TransactionStatus, EarnflowError>>,
}

impl WithdrawalHandle {
    /// Wait for the gateway and the reconciliation step
    ///
    /// Resolves to `Confirmed` or `Failed`.
    ///
    /// # Errors
    ///
    /// Returns an error if reconciliation was rejected (for example the
    /// account was reset while the payout was in flight) or the background
    /// task did not finish.
    pub async fn settled(self) -> Result<TransactionStatus, EarnflowError> {
        self.task.await.map_err(|e| EarnflowError::TaskJoin {
            message: e.to_string(),
        })?
    }
}

/// Drives withdrawals through a payment gateway
pub struct WithdrawalController<G: PaymentGateway + 'static> {
    registry: Arc<AsyncSessionRegistry>,
    gateway: Arc<G>,
}

impl<G: PaymentGateway + 'static> Clone for WithdrawalController<G> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G: PaymentGateway + 'static> WithdrawalController<G> {
    pub fn new(registry: Arc<AsyncSessionRegistry>, gateway: Arc<G>) -> Self {
        Self { registry, gateway }
    }

    /// Start a withdrawal and schedule its confirmation
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns the session's rejection (below minimum, in flight,
    /// insufficient funds) with nothing scheduled.
    pub fn withdraw(
        &self,
        user: UserId,
        request: WithdrawalRequest,
    ) -> Result<WithdrawalHandle, EarnflowError> {
        let (tx, effects) = self.registry.update(user, |session| {
            let tx = session.withdraw(request)?;
            Ok((tx, session.drain_effects()))
        })?;

        let payout = effects
            .into_iter()
            .find_map(|effect| match effect {
                Effect::AwaitConfirmation {
                    tx: pending,
                    amount,
                    address,
                    delay,
                } if pending == tx => Some(PayoutRequest::new(user, tx, amount, address, delay)),
                _ => None,
            })
            .ok_or(EarnflowError::NoWithdrawalInFlight)?;

        let registry = Arc::clone(&self.registry);
        let settlement = self.gateway.submit_payout(payout);

        let task = tokio::spawn(async move {
            match settlement.await {
                Ok(receipt) => {
                    registry.update(user, |session| {
                        session.confirm_withdrawal(Some(tx), Some(receipt.tx_hash))
                    })?;
                    Ok(TransactionStatus::Confirmed)
                }
                Err(e) => {
                    log::warn!("user {}: payout for withdrawal {} rejected: {}", user, tx, e);
                    registry.update(user, |session| {
                        session.fail_withdrawal(Some(tx), &e.to_string())
                    })?;
                    Ok(TransactionStatus::Failed)
                }
            }
        });

        Ok(WithdrawalHandle { tx, task })
    }
}
