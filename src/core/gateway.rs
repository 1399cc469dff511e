//! Simulated payment gateway
//!
//! Stands in for the payment processor's payout API. Each payout settles
//! after the request's delay and receives a random `0x`-prefixed hash.
//! Amounts at or above `reject_from` are declined, which lets callers
//! exercise the failure path without a real processor.

use crate::core::traits::PaymentGateway;
use crate::types::{EarnflowError, PayoutReceipt, PayoutRequest};
use futures::future::BoxFuture;
use futures::FutureExt;
use rand::Rng;
use rust_decimal::Decimal;
use std::fmt::Write;

/// Gateway that confirms payouts after a timer
#[derive(Debug, Clone, Default)]
pub struct SimulatedGateway {
    reject_from: Option<Decimal>,
}

impl SimulatedGateway {
    /// Gateway that confirms every payout
    pub fn new() -> Self {
        Self { reject_from: None }
    }

    /// Decline payouts of `limit` or more
    pub fn rejecting_from(limit: Decimal) -> Self {
        Self {
            reject_from: Some(limit),
        }
    }
}

impl PaymentGateway for SimulatedGateway {
    fn submit_payout(
        &self,
        payout: PayoutRequest,
    ) -> BoxFuture<'static, Result<PayoutReceipt, EarnflowError>> {
        let reject_from = self.reject_from;

        async move {
            log::debug!(
                "payout {} submitted: {} to {}",
                payout.idempotency_key,
                payout.amount,
                payout.address.as_deref().unwrap_or("default account")
            );

            tokio::time::sleep(payout.delay).await;

            if let Some(limit) = reject_from {
                if payout.amount >= limit {
                    return Err(EarnflowError::gateway(format!(
                        "payout {} of {} reaches limit {}",
                        payout.idempotency_key, payout.amount, limit
                    )));
                }
            }

            Ok(PayoutReceipt {
                tx_hash: random_hash(),
            })
        }
        .boxed()
    }
}

fn random_hash() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    let mut hash = String::with_capacity(66);
    hash.push_str("0x");
    for byte in bytes {
        // writing to a String cannot fail
        let _ = write!(hash, "{:02x}", byte);
    }
    hash
}
