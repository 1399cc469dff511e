//! Collaborator traits injected into a dashboard session
//!
//! The engine never talks to the outside world directly. Payouts, reward
//! amounts and timestamps all come through these seams so production can
//! plug in real services while tests use deterministic fakes.

use crate::types::{Commission, EarnflowError, PayoutReceipt, PayoutRequest};
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;

/// Payment processor that settles withdrawals
///
/// Settlement is asynchronous: the returned future resolves once the
/// processor has confirmed or rejected the payout.
pub trait PaymentGateway: Send + Sync {
    /// Submit a payout and wait for its outcome
    ///
    /// # Errors
    ///
    /// Returns `EarnflowError::Gateway` if the processor rejects the payout.
    fn submit_payout(
        &self,
        payout: PayoutRequest,
    ) -> BoxFuture<'static, Result<PayoutReceipt, EarnflowError>>;
}

/// Source of task commission amounts
pub trait CommissionSampler: Send + Sync {
    /// Pick the partner and amount for one completed task
    fn sample(&mut self) -> Commission;
}

/// Source of transaction timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
