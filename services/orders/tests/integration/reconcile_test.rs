use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::dec;
use tokio::task::JoinSet;

use sitemart_domain::id::OrderId;
use sitemart_domain::order::{OrderStatus, PurchaseKind};
use sitemart_orders::domain::types::ReconcileOutcome;
use sitemart_orders::error::OrdersServiceError;
use sitemart_orders::usecase::reconcile::ReconcilePaymentUseCase;

use crate::helpers::{MockGateway, MockOrderRepo, pending_order};

fn usecase(
    store: &MockOrderRepo,
    gateway: &MockGateway,
) -> ReconcilePaymentUseCase<MockOrderRepo, MockGateway> {
    ReconcilePaymentUseCase {
        orders: store.clone(),
        gateway: gateway.clone(),
    }
}

fn assert_expiry_about_thirty_days_out(store: &MockOrderRepo, id: OrderId) {
    let expiry = store.get(id).unwrap().rent_expiry_date.unwrap();
    let expected = Utc::now() + Duration::days(30);
    assert!((expected - expiry).num_seconds().abs() < 60, "expiry {expiry}");
}

#[tokio::test]
async fn should_complete_sale_on_approval() {
    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Sale, dec!(150.00))]);
    let gateway = MockGateway::new().with_payment("1001", "approved", Some("1"), Some(dec!(150)));

    let outcome = usecase(&store, &gateway).execute("1001").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Applied(OrderStatus::Completed));
    let order = store.get(OrderId(1)).unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert!(order.rent_expiry_date.is_none());
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn should_start_rental_with_thirty_day_expiry_on_approval() {
    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Rent, dec!(80.00))]);
    let gateway = MockGateway::new().with_payment("1001", "approved", Some("1"), Some(dec!(80)));

    let outcome = usecase(&store, &gateway).execute("1001").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Applied(OrderStatus::Rented));
    assert_eq!(store.get(OrderId(1)).unwrap().status, OrderStatus::Rented);
    assert_expiry_about_thirty_days_out(&store, OrderId(1));
}

#[tokio::test]
async fn should_reject_on_rejection_or_cancellation() {
    for status in ["rejected", "cancelled"] {
        let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Rent, dec!(80.00))]);
        let gateway = MockGateway::new().with_payment("1001", status, Some("1"), None);

        let outcome = usecase(&store, &gateway).execute("1001").await.unwrap();

        assert_eq!(outcome, ReconcileOutcome::Applied(OrderStatus::Rejected));
        let order = store.get(OrderId(1)).unwrap();
        assert_eq!(order.status, OrderStatus::Rejected);
        assert!(order.rent_expiry_date.is_none());
    }
}

#[tokio::test]
async fn should_not_write_for_in_process_payment() {
    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Sale, dec!(150.00))]);
    let gateway = MockGateway::new().with_payment("1001", "in_process", Some("1"), None);

    let outcome = usecase(&store, &gateway).execute("1001").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Unchanged);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn should_write_once_across_duplicate_deliveries() {
    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Rent, dec!(80.00))]);
    let gateway = MockGateway::new().with_payment("1001", "approved", Some("1"), None);
    let uc = usecase(&store, &gateway);

    let first = uc.execute("1001").await.unwrap();
    let expiry = store.get(OrderId(1)).unwrap().rent_expiry_date;
    let second = uc.execute("1001").await.unwrap();

    assert_eq!(first, ReconcileOutcome::Applied(OrderStatus::Rented));
    assert_eq!(second, ReconcileOutcome::Unchanged);
    assert_eq!(store.write_count(), 1);
    assert_eq!(store.get(OrderId(1)).unwrap().rent_expiry_date, expiry);
}

#[tokio::test]
async fn should_keep_terminal_status_when_later_report_regresses() {
    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Sale, dec!(150.00))]);
    let gateway = MockGateway::new().with_payment("1001", "approved", Some("1"), None);
    let uc = usecase(&store, &gateway);
    uc.execute("1001").await.unwrap();

    gateway.set_payment("1001", "pending", Some("1"), None);
    let outcome = uc.execute("1001").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Conflict);
    assert_eq!(store.get(OrderId(1)).unwrap().status, OrderStatus::Completed);
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn should_never_move_between_terminal_statuses() {
    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Rent, dec!(80.00))]);
    let gateway = MockGateway::new().with_payment("1001", "rejected", Some("1"), None);
    let uc = usecase(&store, &gateway);
    uc.execute("1001").await.unwrap();

    for later in ["approved", "pending", "in_process", "cancelled"] {
        gateway.set_payment("1001", later, Some("1"), None);
        uc.execute("1001").await.unwrap();
        let order = store.get(OrderId(1)).unwrap();
        assert_eq!(order.status, OrderStatus::Rejected, "after {later}");
        assert!(order.rent_expiry_date.is_none());
    }
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn should_discard_payment_without_correlation_key() {
    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Sale, dec!(150.00))]);
    let gateway = MockGateway::new()
        .with_payment("1001", "approved", None, None)
        .with_payment("1002", "approved", Some("order-1"), None);
    let uc = usecase(&store, &gateway);

    assert_eq!(
        uc.execute("1001").await.unwrap(),
        ReconcileOutcome::Unattributable
    );
    assert_eq!(
        uc.execute("1002").await.unwrap(),
        ReconcileOutcome::Unattributable
    );
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn should_discard_payment_for_unknown_order() {
    let store = MockOrderRepo::default();
    let gateway = MockGateway::new().with_payment("1001", "approved", Some("404"), None);

    let outcome = usecase(&store, &gateway).execute("1001").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::UnknownOrder);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn should_reconcile_order_whose_reference_is_not_yet_stored() {
    let mut order = pending_order(1, PurchaseKind::Sale, dec!(150.00));
    order.gateway_reference = None;
    let store = MockOrderRepo::new(vec![order]);
    let gateway = MockGateway::new().with_payment("1001", "approved", Some("1"), None);

    let outcome = usecase(&store, &gateway).execute("1001").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Applied(OrderStatus::Completed));
}

#[tokio::test]
async fn should_not_let_a_foreign_payment_drive_the_order() {
    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Sale, dec!(150.00))]);
    let gateway = MockGateway::new().with_payment("2002", "rejected", Some("1"), None);

    let outcome = usecase(&store, &gateway).execute("2002").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Conflict);
    assert_eq!(store.get(OrderId(1)).unwrap().status, OrderStatus::Pending);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn should_ignore_unmapped_gateway_status() {
    let mut order = pending_order(1, PurchaseKind::Sale, dec!(150.00));
    order.status = OrderStatus::Completed;
    let store = MockOrderRepo::new(vec![order]);
    let gateway = MockGateway::new().with_payment("1001", "refunded", Some("1"), None);

    let outcome = usecase(&store, &gateway).execute("1001").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Ignored);
    assert_eq!(store.get(OrderId(1)).unwrap().status, OrderStatus::Completed);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn should_apply_despite_amount_divergence() {
    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Sale, dec!(150.00))]);
    let gateway = MockGateway::new().with_payment("1001", "approved", Some("1"), Some(dec!(1)));

    let outcome = usecase(&store, &gateway).execute("1001").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Applied(OrderStatus::Completed));
    // the order amount is fixed at checkout
    assert_eq!(
        store.get(OrderId(1)).unwrap().transaction_amount,
        dec!(150.00)
    );
}

#[tokio::test]
async fn should_repair_rental_missing_expiry() {
    let mut order = pending_order(1, PurchaseKind::Rent, dec!(80.00));
    order.status = OrderStatus::Rented;
    let store = MockOrderRepo::new(vec![order]);
    let gateway = MockGateway::new().with_payment("1001", "approved", Some("1"), None);

    let outcome = usecase(&store, &gateway).execute("1001").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Applied(OrderStatus::Rented));
    assert_expiry_about_thirty_days_out(&store, OrderId(1));
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn should_fail_when_gateway_cannot_be_reached() {
    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Sale, dec!(150.00))]);
    let gateway = MockGateway::new().unavailable();

    let err = usecase(&store, &gateway).execute("1001").await.unwrap_err();

    assert!(matches!(err, OrdersServiceError::GatewayUnavailable(_)));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn should_fail_when_payment_not_yet_visible() {
    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Sale, dec!(150.00))]);
    let gateway = MockGateway::new();

    let err = usecase(&store, &gateway).execute("1001").await.unwrap_err();

    assert!(matches!(err, OrdersServiceError::PaymentNotFound(id) if id == "1001"));
}

#[tokio::test]
async fn should_fail_when_store_write_fails() {
    let store = MockOrderRepo::failing(vec![pending_order(1, PurchaseKind::Sale, dec!(150.00))]);
    let gateway = MockGateway::new().with_payment("1001", "approved", Some("1"), None);

    let err = usecase(&store, &gateway).execute("1001").await.unwrap_err();

    assert!(matches!(err, OrdersServiceError::Internal(_)));
    assert_eq!(store.get(OrderId(1)).unwrap().status, OrderStatus::Pending);
}

#[tokio::test]
async fn should_take_noop_path_after_losing_race_to_same_status() {
    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Sale, dec!(150.00))]);
    *store.race_to.lock().unwrap() = Some(OrderStatus::Completed);
    let gateway = MockGateway::new().with_payment("1001", "approved", Some("1"), None);

    let outcome = usecase(&store, &gateway).execute("1001").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Unchanged);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn should_report_conflict_after_losing_race_to_other_status() {
    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Sale, dec!(150.00))]);
    *store.race_to.lock().unwrap() = Some(OrderStatus::Rejected);
    let gateway = MockGateway::new().with_payment("1001", "approved", Some("1"), None);

    let outcome = usecase(&store, &gateway).execute("1001").await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Conflict);
    assert_eq!(store.get(OrderId(1)).unwrap().status, OrderStatus::Rejected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_transition_once_under_concurrent_deliveries() {
    const DELIVERIES: usize = 16;

    let store = MockOrderRepo::new(vec![pending_order(1, PurchaseKind::Rent, dec!(80.00))]);
    let gateway = MockGateway::new().with_payment("1001", "approved", Some("1"), None);
    let uc = Arc::new(usecase(&store, &gateway));

    let mut tasks = JoinSet::new();
    for _ in 0..DELIVERIES {
        let uc = Arc::clone(&uc);
        tasks.spawn(async move { uc.execute("1001").await });
    }

    let mut applied = 0;
    let mut unchanged = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap().unwrap() {
            ReconcileOutcome::Applied(OrderStatus::Rented) => applied += 1,
            ReconcileOutcome::Unchanged => unchanged += 1,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    assert_eq!(applied, 1);
    assert_eq!(unchanged, DELIVERIES - 1);
    assert_eq!(store.write_count(), 1);
    assert_eq!(gateway.fetch_count(), DELIVERIES);
    let order = store.get(OrderId(1)).unwrap();
    assert_eq!(order.status, OrderStatus::Rented);
    assert!(order.rent_expiry_date.is_some());
}
