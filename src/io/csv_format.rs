//! CSV format handling for event scripts and session output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvEvent structure for deserialization
//! - Conversion from CSV rows to scripted dashboard events
//! - Summary and ledger output serialization
//!
//! All functions are pure (no file access) for easy testing.
//!
//! # Input format
//!
//! ```text
//! type,user,amount,detail
//! start,1,,
//! complete,1,1.25,affiliate
//! withdraw,1,,acct_123
//! confirm,1,,0xabc
//! fail,1,,card_declined
//! reset_tasks,1,,
//! reset_account,1,,
//! ```
//!
//! `amount` is the commission for `complete` and the requested amount for
//! `withdraw` (empty means full balance). `detail` is the partner, payout
//! address, transaction hash or failure reason depending on the type.

use crate::types::{
    Commission, DashboardEvent, EarnflowError, PartnerKind, ScriptedEvent, Transaction,
    UserId, WalletSummary, WithdrawalRequest,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Reason recorded when a script fails a withdrawal without one
const DEFAULT_FAILURE_REASON: &str = "payment processor rejected the payout";

/// CSV row structure for deserialization
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub user: UserId,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Convert a CsvEvent to a ScriptedEvent
///
/// This function:
/// - Parses the event type (case-insensitive)
/// - Parses the amount into a Decimal (if present)
/// - Interprets `detail` according to the event type
///
/// # Errors
///
/// Returns an error if:
/// - The event type is unknown
/// - The amount is not a decimal number
/// - A `complete` row names an unknown partner
pub fn convert_csv_event(csv_event: CsvEvent) -> Result<ScriptedEvent, EarnflowError> {
    let user = csv_event.user;

    let amount = match csv_event.amount.as_deref().map(str::trim) {
        Some(amount_str) if !amount_str.is_empty() => Some(
            Decimal::from_str(amount_str)
                .map_err(|_| EarnflowError::invalid_amount(amount_str, user))?,
        ),
        _ => None,
    };

    let detail = csv_event
        .detail
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let event = match csv_event.event_type.trim().to_lowercase().as_str() {
        "start" => DashboardEvent::StartTask,
        "complete" => {
            let partner = match detail.as_deref() {
                Some(partner) => partner.parse::<PartnerKind>().map_err(|message| {
                    EarnflowError::ParseError {
                        line: None,
                        message: format!("{} for user {}", message, user),
                    }
                })?,
                None => PartnerKind::Affiliate,
            };
            DashboardEvent::CompleteTask {
                commission: amount.map(|amount| Commission::new(partner, amount)),
            }
        }
        "withdraw" => DashboardEvent::Withdraw(WithdrawalRequest {
            amount,
            address: detail,
        }),
        "confirm" => DashboardEvent::ConfirmWithdrawal {
            tx: None,
            tx_hash: detail,
        },
        "fail" => DashboardEvent::FailWithdrawal {
            tx: None,
            reason: detail.unwrap_or_else(|| DEFAULT_FAILURE_REASON.to_string()),
        },
        "reset_tasks" => DashboardEvent::ResetTasks,
        "reset_account" => DashboardEvent::ResetAccount,
        _ => {
            return Err(EarnflowError::invalid_event_type(
                &csv_event.event_type,
                user,
            ))
        }
    };

    Ok(ScriptedEvent { user, event })
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

fn write_error(what: &str, e: impl std::fmt::Display) -> EarnflowError {
    EarnflowError::IoError {
        message: format!("Failed to write {}: {}", what, e),
    }
}

/// Write session summaries in CSV format
///
/// Columns: user, balance, pending, available, tasks, has_withdrawn,
/// withdrawing. Rows are sorted by user; money has two decimals.
pub fn write_summaries_csv(
    summaries: &[WalletSummary],
    output: &mut dyn Write,
) -> Result<(), EarnflowError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record([
            "user",
            "balance",
            "pending",
            "available",
            "tasks",
            "has_withdrawn",
            "withdrawing",
        ])
        .map_err(|e| write_error("CSV header", e))?;

    let mut sorted = summaries.to_vec();
    sorted.sort_by_key(|summary| summary.user);

    for summary in sorted {
        writer
            .write_record(&[
                summary.user.to_string(),
                money(summary.balance),
                money(summary.pending_withdrawal),
                money(summary.available),
                summary.tasks_completed.to_string(),
                summary.has_withdrawn.to_string(),
                summary.is_withdrawing.to_string(),
            ])
            .map_err(|e| write_error("summary record", e))?;
    }

    writer.flush().map_err(|e| write_error("output", e))?;
    Ok(())
}

/// Write ledger entries in CSV format
///
/// Columns: user, id, kind, amount, address, status, timestamp, tx_hash.
/// Rows are written in the order given.
pub fn write_ledger_csv(
    rows: &[(UserId, Transaction)],
    output: &mut dyn Write,
) -> Result<(), EarnflowError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record([
            "user",
            "id",
            "kind",
            "amount",
            "address",
            "status",
            "timestamp",
            "tx_hash",
        ])
        .map_err(|e| write_error("CSV header", e))?;

    for (user, tx) in rows {
        writer
            .write_record(&[
                user.to_string(),
                tx.id.to_string(),
                tx.kind.to_string(),
                money(tx.amount),
                tx.address.clone().unwrap_or_default(),
                tx.status.to_string(),
                tx.timestamp.to_rfc3339(),
                tx.tx_hash.clone().unwrap_or_default(),
            ])
            .map_err(|e| write_error("ledger record", e))?;
    }

    writer.flush().map_err(|e| write_error("output", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionStatus;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn csv_event(event_type: &str, amount: Option<&str>, detail: Option<&str>) -> CsvEvent {
        CsvEvent {
            event_type: event_type.to_string(),
            user: 1,
            amount: amount.map(str::to_string),
            detail: detail.map(str::to_string),
        }
    }

    #[rstest]
    #[case::start("start", DashboardEvent::StartTask)]
    #[case::reset_tasks("reset_tasks", DashboardEvent::ResetTasks)]
    #[case::reset_account("RESET_ACCOUNT", DashboardEvent::ResetAccount)]
    #[case::sampled_complete("complete", DashboardEvent::CompleteTask { commission: None })]
    #[case::confirm("confirm", DashboardEvent::ConfirmWithdrawal { tx: None, tx_hash: None })]
    #[case::full_withdraw("Withdraw", DashboardEvent::Withdraw(WithdrawalRequest::full_balance()))]
    fn test_convert_without_fields(#[case] event_type: &str, #[case] expected: DashboardEvent) {
        let scripted = convert_csv_event(csv_event(event_type, None, None)).unwrap();
        assert_eq!(scripted.user, 1);
        assert_eq!(scripted.event, expected);
    }

    #[test]
    fn test_convert_complete_with_commission() {
        let scripted =
            convert_csv_event(csv_event("complete", Some(" 1.25 "), Some("simulated"))).unwrap();

        assert_eq!(
            scripted.event,
            DashboardEvent::CompleteTask {
                commission: Some(Commission::new(PartnerKind::Simulated, Decimal::new(125, 2)))
            }
        );
    }

    #[test]
    fn test_convert_complete_defaults_to_affiliate() {
        let scripted = convert_csv_event(csv_event("complete", Some("2"), None)).unwrap();

        assert_eq!(
            scripted.event,
            DashboardEvent::CompleteTask {
                commission: Some(Commission::new(PartnerKind::Affiliate, Decimal::TWO))
            }
        );
    }

    #[test]
    fn test_convert_withdraw_with_amount_and_address() {
        let scripted =
            convert_csv_event(csv_event("withdraw", Some("12.50"), Some("acct_77"))).unwrap();

        assert_eq!(
            scripted.event,
            DashboardEvent::Withdraw(
                WithdrawalRequest::amount(Decimal::new(1250, 2)).to_address("acct_77")
            )
        );
    }

    #[rstest]
    #[case::with_reason(Some("card_declined"), "card_declined")]
    #[case::default_reason(None, DEFAULT_FAILURE_REASON)]
    #[case::blank_reason(Some("   "), DEFAULT_FAILURE_REASON)]
    fn test_convert_fail_reason(#[case] detail: Option<&str>, #[case] expected: &str) {
        let scripted = convert_csv_event(csv_event("fail", None, detail)).unwrap();

        assert_eq!(
            scripted.event,
            DashboardEvent::FailWithdrawal {
                tx: None,
                reason: expected.to_string()
            }
        );
    }

    #[rstest]
    #[case::invalid_type("deposit", None, None, "Invalid event type")]
    #[case::invalid_amount("complete", Some("lots"), None, "Invalid amount")]
    #[case::invalid_partner("complete", Some("1.00"), Some("sponsor"), "unknown partner")]
    fn test_convert_errors(
        #[case] event_type: &str,
        #[case] amount: Option<&str>,
        #[case] detail: Option<&str>,
        #[case] expected: &str,
    ) {
        let err = convert_csv_event(csv_event(event_type, amount, detail)).unwrap_err();
        assert!(err.to_string().contains(expected), "got: {}", err);
    }

    fn summary(user: UserId, balance: Decimal, pending: Decimal) -> WalletSummary {
        WalletSummary {
            user,
            balance,
            pending_withdrawal: pending,
            available: balance - pending,
            tasks_completed: 20,
            has_withdrawn: false,
            is_withdrawing: !pending.is_zero(),
        }
    }

    #[rstest]
    #[case::empty(vec![], "user,balance,pending,available,tasks,has_withdrawn,withdrawing\n")]
    #[case::pending_withdrawal(
        vec![summary(1, Decimal::new(2500, 2), Decimal::new(2500, 2))],
        "user,balance,pending,available,tasks,has_withdrawn,withdrawing\n\
         1,25.00,25.00,0.00,20,false,true\n"
    )]
    #[case::sorted_and_rounded(
        vec![
            summary(3, Decimal::new(1, 0), Decimal::ZERO),
            summary(2, Decimal::new(123456, 4), Decimal::ZERO),
        ],
        "user,balance,pending,available,tasks,has_withdrawn,withdrawing\n\
         2,12.35,0.00,12.35,20,false,false\n\
         3,1.00,0.00,1.00,20,false,false\n"
    )]
    fn test_write_summaries_csv(#[case] summaries: Vec<WalletSummary>, #[case] expected: &str) {
        let mut output = Vec::new();
        write_summaries_csv(&summaries, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_write_ledger_csv() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let mut withdrawal =
            Transaction::withdrawal(2, Decimal::new(2500, 2), Some("acct_1".into()), at);
        withdrawal.status = TransactionStatus::Confirmed;
        withdrawal.tx_hash = Some("0xabc".into());
        let rows = vec![
            (1, Transaction::earning(1, Decimal::new(125, 2), at)),
            (1, withdrawal),
        ];

        let mut output = Vec::new();
        write_ledger_csv(&rows, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "user,id,kind,amount,address,status,timestamp,tx_hash\n\
             1,1,earning,1.25,,confirmed,2024-06-01T08:00:00+00:00,\n\
             1,2,withdrawal,25.00,acct_1,confirmed,2024-06-01T08:00:00+00:00,0xabc\n"
        );
    }
}
