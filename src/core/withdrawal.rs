//! Withdrawal reconciliation state machine
//!
//! Tracks a single withdrawal from request to settlement:
//!
//! ```text
//! Idle ──Initiate──▶ Initiated ──Record──▶ PendingConfirmation ──Confirm──▶ Confirmed
//!                        │                          │
//!                        └──────────Fail────────────┴──────────▶ Failed
//! ```
//!
//! `Confirmed` and `Failed` accept a new `Initiate` exactly like `Idle`.
//! Transitions are pure: [`WithdrawalPhase::transition`] consumes the
//! current phase and an event and returns the next phase, or an error that
//! leaves the caller's phase untouched.

use crate::types::{EarnflowError, TransactionId};
use rust_decimal::Decimal;

/// Where the current withdrawal stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WithdrawalPhase {
    #[default]
    Idle,

    /// Guards passed, ledger entry not yet written
    Initiated { amount: Decimal },

    /// Ledger entry written and funds reserved; waiting on the processor
    PendingConfirmation { tx: TransactionId, amount: Decimal },

    Confirmed { tx: TransactionId },

    /// Rolled back. `tx` is absent when the failure came before recording.
    Failed { tx: Option<TransactionId> },
}

/// Inputs of the withdrawal state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalEvent {
    Initiate { amount: Decimal },
    Record { tx: TransactionId },
    Confirm { tx: TransactionId },

    /// A missing `tx` fails whatever is in flight
    Fail { tx: Option<TransactionId> },
}

impl WithdrawalEvent {
    fn name(&self) -> &'static str {
        match self {
            WithdrawalEvent::Initiate { .. } => "initiate",
            WithdrawalEvent::Record { .. } => "record",
            WithdrawalEvent::Confirm { .. } => "confirm",
            WithdrawalEvent::Fail { .. } => "fail",
        }
    }
}

impl WithdrawalPhase {
    pub fn name(&self) -> &'static str {
        match self {
            WithdrawalPhase::Idle => "idle",
            WithdrawalPhase::Initiated { .. } => "initiated",
            WithdrawalPhase::PendingConfirmation { .. } => "pending",
            WithdrawalPhase::Confirmed { .. } => "confirmed",
            WithdrawalPhase::Failed { .. } => "failed",
        }
    }

    /// Whether a withdrawal is between request and settlement
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            WithdrawalPhase::Initiated { .. } | WithdrawalPhase::PendingConfirmation { .. }
        )
    }

    /// The recorded transaction awaiting confirmation, if any
    pub fn pending_tx(&self) -> Option<TransactionId> {
        match self {
            WithdrawalPhase::PendingConfirmation { tx, .. } => Some(*tx),
            _ => None,
        }
    }

    /// Amount currently in flight
    pub fn in_flight_amount(&self) -> Decimal {
        match self {
            WithdrawalPhase::Initiated { amount }
            | WithdrawalPhase::PendingConfirmation { amount, .. } => *amount,
            _ => Decimal::ZERO,
        }
    }

    /// Compute the next phase
    ///
    /// # Errors
    ///
    /// - `WithdrawalInProgress` when initiating while another is in flight
    /// - `UnknownWithdrawal` when confirming or failing a transaction other
    ///   than the pending one
    /// - `InvalidTransition` for any other event the phase does not accept
    pub fn transition(self, event: WithdrawalEvent) -> Result<WithdrawalPhase, EarnflowError> {
        use WithdrawalEvent as E;
        use WithdrawalPhase as P;

        match (self, event) {
            (P::Idle | P::Confirmed { .. } | P::Failed { .. }, E::Initiate { amount }) => {
                Ok(P::Initiated { amount })
            }
            (P::Initiated { .. }, E::Initiate { .. }) => {
                Err(EarnflowError::withdrawal_in_progress(None))
            }
            (P::PendingConfirmation { tx, .. }, E::Initiate { .. }) => {
                Err(EarnflowError::withdrawal_in_progress(Some(tx)))
            }

            (P::Initiated { amount }, E::Record { tx }) => {
                Ok(P::PendingConfirmation { tx, amount })
            }

            (P::PendingConfirmation { tx, .. }, E::Confirm { tx: requested }) => {
                if requested == tx {
                    Ok(P::Confirmed { tx })
                } else {
                    Err(EarnflowError::UnknownWithdrawal { tx: requested })
                }
            }

            (P::Initiated { .. }, E::Fail { tx: None }) => Ok(P::Failed { tx: None }),
            (P::PendingConfirmation { tx, .. }, E::Fail { tx: requested }) => match requested {
                Some(requested) if requested != tx => {
                    Err(EarnflowError::UnknownWithdrawal { tx: requested })
                }
                _ => Ok(P::Failed { tx: Some(tx) }),
            },

            (phase, event) => Err(EarnflowError::invalid_transition(
                phase.name(),
                event.name(),
            )),
        }
    }
}
