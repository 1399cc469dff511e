//! EarnFlow Engine Library
//! # Overview
//!
//! Client-side state engine for the EarnFlow earnings dashboard: a task
//! gate that caps completed tasks per cycle, and a withdrawal flow that
//! deducts optimistically and reconciles with the payment processor.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (wallet, transactions, events, errors)
//! - [`config`] - Session limits and commission tables
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Per-user session, the single owner of its state
//!   - [`core::withdrawal`] - Withdrawal reconciliation state machine
//!   - [`core::task_counter`] - Task gate
//!   - [`core::r#async`] - Concurrent sessions and gateway-driven settlement
//! - [`io`] - Event script parsing and CSV output
//! - [`strategy`] - Sync and async replay pipelines
//! - [`cli`] - CLI arguments parsing
//!
//! # Withdrawal Flow
//!
//! ```text
//! Idle ──withdraw──▶ Initiated ──record──▶ PendingConfirmation
//!                                            ├─confirm──▶ Confirmed
//!                                            └─fail─────▶ Failed
//! ```
//!
//! While a withdrawal is in flight its amount is reserved: the displayed
//! balance is `balance - pending`, and a second withdrawal is rejected.
//! Confirmation removes the funds for good; failure restores them.

pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use config::{CommissionRange, CommissionTable, DashboardConfig};
pub use core::{
    AsyncSessionRegistry, DashboardEngine, SessionManager, WithdrawalController,
    WithdrawalPhase,
};
pub use io::{write_ledger_csv, write_summaries_csv};
pub use types::{
    Commission, DashboardEvent, EarnflowError, PartnerKind, Transaction, TransactionId,
    TransactionKind, TransactionStatus, UserId, WalletSummary, WithdrawalRequest,
};
