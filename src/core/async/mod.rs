//! Concurrent session handling
//!
//! This module provides thread-safe components for running many user
//! sessions at once and for settling withdrawals asynchronously.
//!
//! # Architecture
//!
//! - **AsyncSessionRegistry**: One DashboardEngine per user in a DashMap
//! - **BatchProcessor**: Replays scripted events, one tokio task per user
//! - **WithdrawalController**: Settles withdrawals through a PaymentGateway
//!
//! # Thread Safety
//!
//! - Sessions of different users are updated in parallel
//! - Updates to the same user are serialized by the DashMap entry lock
//! - No global locks - fine-grained locking per session

pub mod batch_processor;
pub mod controller;
pub mod session_registry;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use controller::{WithdrawalController, WithdrawalHandle};
pub use session_registry::AsyncSessionRegistry;
