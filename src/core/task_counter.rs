//! Task counter for the daily cycle gate
//!
//! Counts paid optimization tasks completed in the current cycle. The count
//! lives in `[0, max]`, and a new cycle can only start once it reaches `max`.

use crate::types::EarnflowError;

/// Bounded per-cycle task counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCounter {
    completed: u32,
    max: u32,
    running: bool,
}

impl TaskCounter {
    pub fn new(max: u32) -> Self {
        TaskCounter {
            completed: 0,
            max,
            running: false,
        }
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether every task of the cycle is done
    pub fn is_cycle_complete(&self) -> bool {
        self.completed >= self.max
    }

    /// Mark a task as running
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The cycle is already complete
    /// - A task is already running
    pub fn start(&mut self) -> Result<(), EarnflowError> {
        if self.is_cycle_complete() {
            return Err(EarnflowError::task_limit_reached(self.completed, self.max));
        }
        if self.running {
            return Err(EarnflowError::TaskAlreadyRunning);
        }
        self.running = true;
        Ok(())
    }

    /// Finish the running task and count it
    ///
    /// Returns the new count.
    pub fn complete(&mut self) -> Result<u32, EarnflowError> {
        if !self.running {
            return Err(EarnflowError::TaskNotRunning);
        }
        self.running = false;
        self.completed += 1;
        Ok(self.completed)
    }

    /// Start a new cycle; only allowed once the current one is complete
    pub fn reset(&mut self) -> Result<(), EarnflowError> {
        if self.completed != self.max {
            return Err(EarnflowError::reset_not_allowed(self.completed, self.max));
        }
        self.completed = 0;
        Ok(())
    }

    /// Stop the running task without counting it
    pub fn abandon(&mut self) {
        self.running = false;
    }

    /// Unconditionally zero the counter and stop any running task
    pub fn clear(&mut self) {
        self.completed = 0;
        self.running = false;
    }
}
