//! Gateway-driven withdrawals across many sessions
//!
//! Uses tokio's paused clock so the simulated confirmation delay elapses
//! instantly.

use earnflow_engine::config::DashboardConfig;
use earnflow_engine::core::{AsyncSessionRegistry, SimulatedGateway, WithdrawalController};
use earnflow_engine::types::{
    Commission, DashboardEvent, PartnerKind, TransactionStatus, UserId, WithdrawalRequest,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

fn earn(registry: &AsyncSessionRegistry, user: UserId, tasks: u32, rate: Decimal) {
    for _ in 0..tasks {
        registry.apply(user, DashboardEvent::StartTask).unwrap();
        registry
            .apply(
                user,
                DashboardEvent::CompleteTask {
                    commission: Some(Commission::new(PartnerKind::Affiliate, rate)),
                },
            )
            .unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_withdrawals_settle_independently() {
    let config = DashboardConfig {
        confirmation_delay: Duration::from_secs(3),
        ..DashboardConfig::default()
    };
    let registry = Arc::new(AsyncSessionRegistry::new(config, None));
    // users 1-5 earn 12.00, users 6-10 earn 24.00
    for user in 1..=10 {
        let rate = if user <= 5 { Decimal::new(60, 2) } else { Decimal::new(120, 2) };
        earn(&registry, user, 20, rate);
    }

    let gateway = SimulatedGateway::rejecting_from(Decimal::new(2000, 2));
    let controller = WithdrawalController::new(Arc::clone(&registry), Arc::new(gateway));

    let mut handles = Vec::new();
    for user in 1..=10 {
        let handle = controller
            .withdraw(user, WithdrawalRequest::full_balance())
            .unwrap();
        assert!(registry.summary(user).unwrap().is_withdrawing);
        handles.push((user, handle));
    }

    for (user, handle) in handles {
        let status = handle.settled().await.unwrap();
        let summary = registry.summary(user).unwrap();
        assert!(!summary.is_withdrawing);
        assert_eq!(summary.pending_withdrawal, Decimal::ZERO);

        if user <= 5 {
            assert_eq!(status, TransactionStatus::Confirmed);
            assert_eq!(summary.balance, Decimal::ZERO);
            assert!(summary.has_withdrawn);
        } else {
            assert_eq!(status, TransactionStatus::Failed);
            assert_eq!(summary.balance, Decimal::new(2400, 2));
            assert!(!summary.has_withdrawn);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_balance_hidden_until_gateway_answers() {
    let registry = Arc::new(AsyncSessionRegistry::new(DashboardConfig::default(), None));
    earn(&registry, 1, 20, Decimal::new(125, 2));
    let controller =
        WithdrawalController::new(Arc::clone(&registry), Arc::new(SimulatedGateway::new()));

    let handle = controller
        .withdraw(1, WithdrawalRequest::full_balance().to_address("acct_1"))
        .unwrap();
    let tx = handle.tx;

    tokio::time::sleep(Duration::from_millis(2999)).await;
    let summary = registry.summary(1).unwrap();
    assert_eq!(summary.available, Decimal::ZERO);
    assert_eq!(summary.balance, Decimal::new(2500, 2));
    assert_eq!(
        registry.transaction(1, tx).map(|t| t.status),
        Some(TransactionStatus::Pending)
    );

    assert_eq!(handle.settled().await.unwrap(), TransactionStatus::Confirmed);
    let confirmed = registry.transaction(1, tx).unwrap();
    assert_eq!(confirmed.address.as_deref(), Some("acct_1"));
    assert!(confirmed.tx_hash.is_some_and(|hash| hash.starts_with("0x")));
}
