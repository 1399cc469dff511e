//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `wallet`: Balance state and per-user summaries
//! - `transaction`: Ledger records and identifiers
//! - `commission`: Task reward amounts and partner kinds
//! - `event`: Dashboard events, withdrawal requests and payout messages
//! - `error`: Error types for the engine

pub mod commission;
pub mod error;
pub mod event;
pub mod transaction;
pub mod wallet;

pub use commission::{Commission, PartnerKind};
pub use error::EarnflowError;
pub use event::{
    DashboardEvent, Effect, PayoutReceipt, PayoutRequest, ScriptedEvent, WithdrawalRequest,
};
pub use transaction::{Transaction, TransactionId, TransactionKind, TransactionStatus, UserId};
pub use wallet::{WalletState, WalletSummary};
