//! Error types for the EarnFlow engine
//!
//! This module defines all error types that can occur while driving a
//! dashboard session. Errors are designed to be descriptive and user-facing:
//! most of them are the rejections a dashboard shows as an inline message.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **Script Parsing Errors**: Malformed CSV, unknown event types, bad amounts
//! - **Task Gate Rejections**: Task limit reached, task already running, reset refused
//! - **Withdrawal Rejections**: Below minimum, withdrawal in flight, insufficient funds
//! - **State Machine Errors**: Transitions the withdrawal flow does not allow
//! - **Arithmetic Errors**: Overflow, underflow in balance calculations
//! - **Runtime Errors**: Gateway failures, configuration, task join failures

use super::transaction::TransactionId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the engine
///
/// Each variant includes the context needed to tell the user what went
/// wrong. Rejections never modify session state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EarnflowError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents a replay from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed row is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Unknown event type in a script
    #[error("Invalid event type '{event_type}' for user {user}")]
    InvalidEventType {
        /// The unrecognised type string
        event_type: String,
        /// User the row was addressed to
        user: u32,
    },

    /// Amount field could not be parsed
    #[error("Invalid amount '{amount}' for user {user}")]
    InvalidAmount {
        /// The invalid amount string
        amount: String,
        /// User the row was addressed to
        user: u32,
    },

    /// Every task in the current cycle has been completed
    #[error("Task limit reached: {completed} of {max} tasks completed")]
    TaskLimitReached {
        /// Tasks completed in this cycle
        completed: u32,
        /// Tasks allowed per cycle
        max: u32,
    },

    /// A task is already in progress
    #[error("A task is already running")]
    TaskAlreadyRunning,

    /// Completion reported while no task was started
    #[error("No task is running")]
    TaskNotRunning,

    /// Tasks are locked until the account is reset after a withdrawal
    #[error("Already withdrawn this cycle; reset the account to start new tasks")]
    AlreadyWithdrawn,

    /// Task counter reset requested before the cycle is complete
    #[error("Cannot reset tasks: {completed} of {max} tasks completed")]
    ResetNotAllowed {
        /// Tasks completed in this cycle
        completed: u32,
        /// Tasks allowed per cycle
        max: u32,
    },

    /// Balance has not reached the withdrawal threshold
    #[error("Minimum withdrawal is {minimum}, balance is {balance}")]
    BelowMinimumWithdrawal {
        /// Confirmed balance
        balance: Decimal,
        /// Required threshold
        minimum: Decimal,
    },

    /// Requested amount exceeds what is available
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Available balance
        available: Decimal,
        /// Requested withdrawal amount
        requested: Decimal,
    },

    /// Zero or negative amount
    #[error("Amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// A withdrawal is already awaiting confirmation
    #[error("A withdrawal is already in progress{}", tx.map(|t| format!(" (transaction {})", t)).unwrap_or_default())]
    WithdrawalInProgress {
        /// The in-flight transaction, once recorded
        tx: Option<TransactionId>,
    },

    /// Confirmation or failure reported with nothing in flight
    #[error("No withdrawal is in progress")]
    NoWithdrawalInFlight,

    /// Confirmation or failure reported for a different transaction
    #[error("Transaction {tx} is not the withdrawal in progress")]
    UnknownWithdrawal {
        /// The transaction named by the caller
        tx: TransactionId,
    },

    /// Event not accepted in the current withdrawal phase
    #[error("Cannot apply {event} while withdrawal is {phase}")]
    InvalidTransition {
        /// Phase name at the time of the event
        phase: &'static str,
        /// Event name
        event: &'static str,
    },

    /// Ledger has no entry with this id
    #[error("Transaction {tx} not found for {operation}")]
    TransactionNotFound {
        /// Transaction ID that was not found
        tx: TransactionId,
        /// Operation that failed
        operation: String,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
    },

    /// Arithmetic underflow would occur
    #[error("Arithmetic underflow in {operation}")]
    ArithmeticUnderflow {
        /// Operation that would underflow
        operation: String,
    },

    /// Payment gateway rejected or could not process a payout
    #[error("Payment gateway error: {message}")]
    Gateway {
        /// Gateway-provided description
        message: String,
    },

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong
        message: String,
    },

    /// A background task panicked or was cancelled
    #[error("Background task failed: {message}")]
    TaskJoin {
        /// Join error description
        message: String,
    },
}

// Conversion from io::Error to EarnflowError
impl From<std::io::Error> for EarnflowError {
    fn from(error: std::io::Error) -> Self {
        EarnflowError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to EarnflowError
impl From<csv::Error> for EarnflowError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        EarnflowError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl EarnflowError {
    /// Create a TaskLimitReached error
    pub fn task_limit_reached(completed: u32, max: u32) -> Self {
        EarnflowError::TaskLimitReached { completed, max }
    }

    /// Create a ResetNotAllowed error
    pub fn reset_not_allowed(completed: u32, max: u32) -> Self {
        EarnflowError::ResetNotAllowed { completed, max }
    }

    /// Create a BelowMinimumWithdrawal error
    pub fn below_minimum(balance: Decimal, minimum: Decimal) -> Self {
        EarnflowError::BelowMinimumWithdrawal { balance, minimum }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(available: Decimal, requested: Decimal) -> Self {
        EarnflowError::InsufficientFunds {
            available,
            requested,
        }
    }

    /// Create a WithdrawalInProgress error
    pub fn withdrawal_in_progress(tx: Option<TransactionId>) -> Self {
        EarnflowError::WithdrawalInProgress { tx }
    }

    /// Create an InvalidTransition error
    pub fn invalid_transition(phase: &'static str, event: &'static str) -> Self {
        EarnflowError::InvalidTransition { phase, event }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(tx: TransactionId, operation: &str) -> Self {
        EarnflowError::TransactionNotFound {
            tx,
            operation: operation.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        EarnflowError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create an ArithmeticUnderflow error
    pub fn arithmetic_underflow(operation: &str) -> Self {
        EarnflowError::ArithmeticUnderflow {
            operation: operation.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str, user: u32) -> Self {
        EarnflowError::InvalidAmount {
            amount: amount.to_string(),
            user,
        }
    }

    /// Create an InvalidEventType error
    pub fn invalid_event_type(event_type: &str, user: u32) -> Self {
        EarnflowError::InvalidEventType {
            event_type: event_type.to_string(),
            user,
        }
    }

    /// Create a Gateway error
    pub fn gateway(message: impl Into<String>) -> Self {
        EarnflowError::Gateway {
            message: message.into(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        EarnflowError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error is a user-facing rejection rather than a fault
    ///
    /// Rejections are reported back to the user and leave the session as it
    /// was; everything else indicates broken input or a failing collaborator.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EarnflowError::TaskLimitReached { .. }
                | EarnflowError::TaskAlreadyRunning
                | EarnflowError::TaskNotRunning
                | EarnflowError::AlreadyWithdrawn
                | EarnflowError::ResetNotAllowed { .. }
                | EarnflowError::BelowMinimumWithdrawal { .. }
                | EarnflowError::InsufficientFunds { .. }
                | EarnflowError::NonPositiveAmount { .. }
                | EarnflowError::WithdrawalInProgress { .. }
                | EarnflowError::NoWithdrawalInFlight
        )
    }
}
