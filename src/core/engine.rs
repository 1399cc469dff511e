//! Dashboard session engine
//!
//! This module provides the DashboardEngine that owns one user's session and
//! orchestrates the BalanceBook, TaskCounter, TransactionLedger and the
//! withdrawal state machine.
//!
//! The engine enforces business rules such as:
//! - Task gating (cycle limit, one task at a time, locked after a withdrawal)
//! - Withdrawal guards (minimum balance, no double submission)
//! - Optimistic deduction with rollback when a payout fails
//!
//! Every operation either applies completely or returns an error with the
//! session unchanged. Work that must happen later, such as waiting for a
//! payout confirmation, is queued as an [`Effect`] for the caller to drain.

use crate::config::DashboardConfig;
use crate::core::balance_book::BalanceBook;
use crate::core::commission::RandomCommissionSampler;
use crate::core::ledger::TransactionLedger;
use crate::core::task_counter::TaskCounter;
use crate::core::traits::{Clock, CommissionSampler, SystemClock};
use crate::core::withdrawal::{WithdrawalEvent, WithdrawalPhase};
use crate::types::{
    Commission, DashboardEvent, EarnflowError, Effect, Transaction, TransactionId,
    TransactionStatus, UserId, WalletSummary, WithdrawalRequest,
};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Single owner of a dashboard session's state
pub struct DashboardEngine {
    user: UserId,
    config: DashboardConfig,
    balances: BalanceBook,
    tasks: TaskCounter,
    has_withdrawn: bool,
    phase: WithdrawalPhase,
    ledger: TransactionLedger,
    next_tx_id: TransactionId,
    effects: VecDeque<Effect>,
    sampler: Box<dyn CommissionSampler>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for DashboardEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardEngine")
            .field("user", &self.user)
            .field("wallet", self.balances.wallet())
            .field("tasks", &self.tasks)
            .field("has_withdrawn", &self.has_withdrawn)
            .field("phase", &self.phase)
            .field("transactions", &self.ledger.len())
            .finish()
    }
}

impl DashboardEngine {
    /// Create a session with a randomly seeded commission sampler and the
    /// system clock
    pub fn new(user: UserId, config: DashboardConfig) -> Self {
        let sampler = RandomCommissionSampler::new(config.commission.clone());
        Self::with_parts(user, config, Box::new(sampler), Arc::new(SystemClock))
    }

    /// Create a session whose sampled commissions are reproducible
    ///
    /// With a seed, each user's sampler is seeded from `seed + user` so that
    /// independent sessions do not share a sequence.
    pub fn seeded(user: UserId, config: DashboardConfig, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => {
                let sampler = RandomCommissionSampler::seeded(
                    config.commission.clone(),
                    seed.wrapping_add(u64::from(user)),
                );
                Self::with_parts(user, config, Box::new(sampler), Arc::new(SystemClock))
            }
            None => Self::new(user, config),
        }
    }

    /// Create a session from explicit collaborators
    pub fn with_parts(
        user: UserId,
        config: DashboardConfig,
        sampler: Box<dyn CommissionSampler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tasks = TaskCounter::new(config.max_tasks);
        DashboardEngine {
            user,
            config,
            balances: BalanceBook::new(),
            tasks,
            has_withdrawn: false,
            phase: WithdrawalPhase::Idle,
            ledger: TransactionLedger::new(),
            next_tx_id: 1,
            effects: VecDeque::new(),
            sampler,
            clock,
        }
    }

    /// Apply a single event
    ///
    /// Routes the event to the matching operation and discards its return
    /// value.
    ///
    /// # Errors
    ///
    /// Returns whatever the routed operation returns.
    pub fn process(&mut self, event: DashboardEvent) -> Result<(), EarnflowError> {
        match event {
            DashboardEvent::StartTask => self.start_task(),
            DashboardEvent::CompleteTask { commission } => {
                self.complete_task(commission).map(|_| ())
            }
            DashboardEvent::Withdraw(request) => self.withdraw(request).map(|_| ()),
            DashboardEvent::ConfirmWithdrawal { tx, tx_hash } => {
                self.confirm_withdrawal(tx, tx_hash)
            }
            DashboardEvent::FailWithdrawal { tx, reason } => self.fail_withdrawal(tx, &reason),
            DashboardEvent::ResetTasks => self.reset_tasks(),
            DashboardEvent::ResetAccount => {
                self.reset_account();
                Ok(())
            }
        }
    }

    /// Begin an optimization task
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The user already withdrew this cycle
    /// - Every task of the cycle is done
    /// - A task is already running
    pub fn start_task(&mut self) -> Result<(), EarnflowError> {
        if self.has_withdrawn {
            return Err(EarnflowError::AlreadyWithdrawn);
        }
        self.tasks.start()?;

        log::debug!(
            "user {}: task {} of {} started",
            self.user,
            self.tasks.completed() + 1,
            self.tasks.max()
        );
        Ok(())
    }

    /// Finish the running task and credit its commission
    ///
    /// A missing commission is drawn from the session's sampler. Records a
    /// confirmed earning and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No task is running
    /// - The commission is not positive
    /// - Crediting would overflow
    ///
    /// When crediting fails the running task is abandoned without being
    /// counted, so the next task can start.
    pub fn complete_task(
        &mut self,
        commission: Option<Commission>,
    ) -> Result<TransactionId, EarnflowError> {
        if !self.tasks.is_running() {
            return Err(EarnflowError::TaskNotRunning);
        }

        let commission = commission.unwrap_or_else(|| self.sampler.sample());

        if let Err(e) = self.balances.credit(commission.amount) {
            // a task that cannot be paid ends uncounted
            self.tasks.abandon();
            return Err(e);
        }
        let completed = self.tasks.complete()?;

        let tx = self.allocate_tx_id();
        self.ledger
            .record(Transaction::earning(tx, commission.amount, self.clock.now()));

        log::info!(
            "user {}: task {}/{} completed, {} commission {}",
            self.user,
            completed,
            self.tasks.max(),
            commission.partner,
            commission.amount
        );
        Ok(tx)
    }

    /// Start a withdrawal
    ///
    /// Records a pending withdrawal, reserves the amount so the available
    /// balance drops immediately, and queues an `AwaitConfirmation` effect.
    /// Without an explicit amount the full available balance is withdrawn.
    ///
    /// # Errors
    ///
    /// Returns an error, with the session unchanged, if:
    /// - A withdrawal is already in flight
    /// - The balance is below the minimum withdrawal
    /// - The amount is not positive or exceeds the available balance
    pub fn withdraw(&mut self, request: WithdrawalRequest) -> Result<TransactionId, EarnflowError> {
        if self.phase.is_in_flight() {
            return Err(EarnflowError::withdrawal_in_progress(self.phase.pending_tx()));
        }

        let balance = self.balances.balance();
        if balance < self.config.minimum_withdrawal {
            return Err(EarnflowError::below_minimum(
                balance,
                self.config.minimum_withdrawal,
            ));
        }

        let available = self.balances.available();
        let amount = request.amount.unwrap_or(available);
        if amount <= Decimal::ZERO {
            return Err(EarnflowError::NonPositiveAmount { amount });
        }
        if amount > available {
            return Err(EarnflowError::insufficient_funds(available, amount));
        }

        let initiated = self.phase.transition(WithdrawalEvent::Initiate { amount })?;
        let tx = self.next_tx_id;
        let pending = initiated.transition(WithdrawalEvent::Record { tx })?;

        self.balances.reserve(amount)?;
        self.allocate_tx_id();
        self.ledger.record(Transaction::withdrawal(
            tx,
            amount,
            request.address.clone(),
            self.clock.now(),
        ));
        self.phase = pending;

        self.effects.push_back(Effect::AwaitConfirmation {
            tx,
            amount,
            address: request.address,
            delay: self.config.confirmation_delay,
        });

        log::info!(
            "user {}: withdrawal {} of {} pending, available now {}",
            self.user,
            tx,
            amount,
            self.balances.available()
        );
        Ok(tx)
    }

    /// Settle the in-flight withdrawal
    ///
    /// Subtracts the reserved amount from the balance, marks the transaction
    /// confirmed and closes the task cycle. A missing `tx` targets the
    /// withdrawal in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No withdrawal is pending
    /// - `tx` names a different transaction
    pub fn confirm_withdrawal(
        &mut self,
        tx: Option<TransactionId>,
        tx_hash: Option<String>,
    ) -> Result<(), EarnflowError> {
        let pending_tx = self
            .phase
            .pending_tx()
            .ok_or(EarnflowError::NoWithdrawalInFlight)?;
        let tx = tx.unwrap_or(pending_tx);

        let confirmed = self.phase.transition(WithdrawalEvent::Confirm { tx })?;
        if !self.ledger.contains(tx) {
            return Err(EarnflowError::transaction_not_found(tx, "confirm"));
        }

        let settled = self.balances.settle()?;
        self.ledger
            .set_status(tx, TransactionStatus::Confirmed, tx_hash)?;
        self.phase = confirmed;
        self.has_withdrawn = true;

        log::info!(
            "user {}: withdrawal {} of {} confirmed, balance {}",
            self.user,
            tx,
            settled,
            self.balances.balance()
        );
        Ok(())
    }

    /// Roll back the in-flight withdrawal
    ///
    /// Releases the reservation without touching the balance and marks the
    /// transaction failed. There is no retry; the user may withdraw again.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No withdrawal is in flight
    /// - `tx` names a different transaction
    pub fn fail_withdrawal(
        &mut self,
        tx: Option<TransactionId>,
        reason: &str,
    ) -> Result<(), EarnflowError> {
        if !self.phase.is_in_flight() {
            return Err(EarnflowError::NoWithdrawalInFlight);
        }

        let failed = self.phase.transition(WithdrawalEvent::Fail { tx })?;
        if let WithdrawalPhase::Failed { tx: Some(tx) } = failed {
            self.ledger.set_status(tx, TransactionStatus::Failed, None)?;
        }

        let released = self.balances.release();
        self.phase = failed;

        log::warn!(
            "user {}: withdrawal of {} failed ({}), balance restored to {}",
            self.user,
            released,
            reason,
            self.balances.balance()
        );
        Ok(())
    }

    /// Start a new task cycle
    ///
    /// # Errors
    ///
    /// Returns `ResetNotAllowed` unless every task of the cycle is done.
    pub fn reset_tasks(&mut self) -> Result<(), EarnflowError> {
        self.tasks.reset()?;
        log::info!("user {}: task counter reset", self.user);
        Ok(())
    }

    /// Clear the session for a fresh cycle
    ///
    /// Zeroes the balance and task counter, clears the withdrawn flag and any
    /// in-flight withdrawal. A withdrawal still in flight is marked failed in
    /// the ledger; the ledger itself is kept.
    pub fn reset_account(&mut self) {
        if let Some(tx) = self.phase.pending_tx() {
            if let Err(e) = self.ledger.set_status(tx, TransactionStatus::Failed, None) {
                log::error!(
                    "user {}: in-flight withdrawal {} missing from ledger: {}",
                    self.user,
                    tx,
                    e
                );
            }
            log::warn!(
                "user {}: account reset cancelled withdrawal {}",
                self.user,
                tx
            );
        }

        self.balances.clear();
        self.tasks.clear();
        self.has_withdrawn = false;
        self.phase = WithdrawalPhase::Idle;
        self.effects.clear();

        log::info!("user {}: account reset", self.user);
    }

    /// Take every queued effect, oldest first
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        self.effects.drain(..).collect()
    }

    fn allocate_tx_id(&mut self) -> TransactionId {
        let tx = self.next_tx_id;
        self.next_tx_id += 1;
        tx
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    /// Confirmed balance
    pub fn balance(&self) -> Decimal {
        self.balances.balance()
    }

    pub fn pending_withdrawal(&self) -> Decimal {
        self.balances.pending()
    }

    /// Balance shown to the user
    pub fn available_balance(&self) -> Decimal {
        self.balances.available()
    }

    pub fn tasks_completed(&self) -> u32 {
        self.tasks.completed()
    }

    pub fn is_task_running(&self) -> bool {
        self.tasks.is_running()
    }

    pub fn has_withdrawn(&self) -> bool {
        self.has_withdrawn
    }

    pub fn is_withdrawing(&self) -> bool {
        self.phase.is_in_flight()
    }

    pub fn phase(&self) -> WithdrawalPhase {
        self.phase
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    pub fn transaction(&self, tx: TransactionId) -> Option<&Transaction> {
        self.ledger.get(tx)
    }

    pub fn summary(&self) -> WalletSummary {
        WalletSummary {
            user: self.user,
            balance: self.balances.balance(),
            pending_withdrawal: self.balances.pending(),
            available: self.balances.available(),
            tasks_completed: self.tasks.completed(),
            has_withdrawn: self.has_withdrawn,
            is_withdrawing: self.phase.is_in_flight(),
        }
    }
}
