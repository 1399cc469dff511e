//! Session configuration
//!
//! Thresholds and reward ranges shared by every dashboard session. Defaults
//! match the production dashboard: a 10.00 minimum withdrawal, 20 tasks per
//! cycle and a three second simulated confirmation.

use crate::types::EarnflowError;
use rust_decimal::Decimal;
use std::time::Duration;

/// Inclusive commission range in currency units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommissionRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl CommissionRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        CommissionRange { min, max }
    }
}

/// Reward table used when sampling task commissions
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionTable {
    /// Range paid by real affiliate partners
    pub affiliate: CommissionRange,

    /// Range paid by simulated partners
    pub simulated: CommissionRange,

    /// Probability that a task is routed to an affiliate partner
    pub affiliate_weight: f64,
}

impl Default for CommissionTable {
    fn default() -> Self {
        Self {
            affiliate: CommissionRange::new(Decimal::new(75, 2), Decimal::new(175, 2)),
            simulated: CommissionRange::new(Decimal::new(25, 2), Decimal::new(75, 2)),
            affiliate_weight: 0.9,
        }
    }
}

/// Per-session limits and timings
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Balance required before a withdrawal may start
    pub minimum_withdrawal: Decimal,

    /// Tasks allowed per cycle
    pub max_tasks: u32,

    /// Simulated latency between a withdrawal and its confirmation
    pub confirmation_delay: Duration,

    pub commission: CommissionTable,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            minimum_withdrawal: Decimal::new(1000, 2),
            max_tasks: 20,
            confirmation_delay: Duration::from_millis(3000),
            commission: CommissionTable::default(),
        }
    }
}

impl DashboardConfig {
    /// Check that the values can drive a session
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if:
    /// - `max_tasks` is zero
    /// - `minimum_withdrawal` is negative
    /// - a commission range is not strictly positive or is inverted
    /// - `affiliate_weight` is outside `[0, 1]`
    pub fn validate(&self) -> Result<(), EarnflowError> {
        if self.max_tasks == 0 {
            return Err(EarnflowError::invalid_config("max_tasks must be at least 1"));
        }

        if self.minimum_withdrawal.is_sign_negative() {
            return Err(EarnflowError::invalid_config(format!(
                "minimum_withdrawal must not be negative, got {}",
                self.minimum_withdrawal
            )));
        }

        for (name, range) in [
            ("affiliate", &self.commission.affiliate),
            ("simulated", &self.commission.simulated),
        ] {
            if range.min <= Decimal::ZERO || range.min > range.max {
                return Err(EarnflowError::invalid_config(format!(
                    "{} commission range {}..={} is invalid",
                    name, range.min, range.max
                )));
            }
        }

        let weight = self.commission.affiliate_weight;
        if !(0.0..=1.0).contains(&weight) {
            return Err(EarnflowError::invalid_config(format!(
                "affiliate_weight must be within [0, 1], got {}",
                weight
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_are_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.minimum_withdrawal, Decimal::new(1000, 2));
        assert_eq!(config.max_tasks, 20);
        assert_eq!(config.confirmation_delay, Duration::from_secs(3));
        assert_eq!(config.commission.affiliate_weight, 0.9);
    }

    #[rstest]
    #[case::zero_tasks(DashboardConfig { max_tasks: 0, ..DashboardConfig::default() }, "max_tasks")]
    #[case::negative_minimum(
        DashboardConfig { minimum_withdrawal: Decimal::new(-1, 0), ..DashboardConfig::default() },
        "minimum_withdrawal"
    )]
    #[case::inverted_range(
        DashboardConfig {
            commission: CommissionTable {
                affiliate: CommissionRange::new(Decimal::TWO, Decimal::ONE),
                ..CommissionTable::default()
            },
            ..DashboardConfig::default()
        },
        "affiliate commission range"
    )]
    #[case::zero_min_range(
        DashboardConfig {
            commission: CommissionTable {
                simulated: CommissionRange::new(Decimal::ZERO, Decimal::new(75, 2)),
                affiliate_weight: 0.0,
                ..CommissionTable::default()
            },
            ..DashboardConfig::default()
        },
        "simulated commission range"
    )]
    #[case::weight_above_one(
        DashboardConfig {
            commission: CommissionTable { affiliate_weight: 1.5, ..CommissionTable::default() },
            ..DashboardConfig::default()
        },
        "affiliate_weight"
    )]
    fn test_validate_rejects(#[case] config: DashboardConfig, #[case] expected: &str) {
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EarnflowError::InvalidConfig { .. }));
        assert!(err.to_string().contains(expected), "got: {}", err);
    }
}
