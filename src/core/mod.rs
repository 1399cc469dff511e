//! Core business logic module
//!
//! This module contains the session components:
//! - `traits` - Collaborator seams (payment gateway, commission sampler, clock)
//! - `engine` - Per-user session orchestration
//! - `withdrawal` - Withdrawal reconciliation state machine
//! - `balance_book` - Balance and in-flight withdrawal bookkeeping
//! - `task_counter` - Daily cycle gate
//! - `ledger` - Transaction history
//! - `commission` - Commission samplers
//! - `gateway` - Simulated payment gateway
//! - `session_manager` - Single-threaded multi-user sessions
//! - `async` - Concurrent sessions and gateway-driven withdrawals

pub mod balance_book;
pub mod commission;
pub mod engine;
pub mod gateway;
pub mod ledger;
pub mod r#async;
pub mod session_manager;
pub mod task_counter;
pub mod traits;
pub mod withdrawal;

pub use balance_book::BalanceBook;
pub use commission::{FixedCommissionSampler, RandomCommissionSampler};
pub use engine::DashboardEngine;
pub use gateway::SimulatedGateway;
pub use ledger::TransactionLedger;
pub use r#async::{AsyncSessionRegistry, BatchProcessor, WithdrawalController, WithdrawalHandle};
pub use session_manager::SessionManager;
pub use task_counter::TaskCounter;
pub use traits::{Clock, CommissionSampler, FixedClock, PaymentGateway, SystemClock};
pub use withdrawal::{WithdrawalEvent, WithdrawalPhase};
