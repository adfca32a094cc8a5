use chrono::{Duration, Utc};
use rust_decimal::dec;

use sitemart_domain::id::{OrderId, UserId};
use sitemart_domain::order::PurchaseKind;
use sitemart_domain::pagination::PageRequest;
use sitemart_domain::user::Role;
use sitemart_orders::error::OrdersServiceError;
use sitemart_orders::usecase::history::{GetOrderUseCase, ListMyOrdersUseCase};

use crate::helpers::{BUYER, MockOrderRepo, pending_order};

const STRANGER: UserId = UserId(99);

fn history() -> MockOrderRepo {
    let base = Utc::now() - Duration::days(10);
    let mut orders = Vec::new();
    for id in 1..=5 {
        let mut order = pending_order(id, PurchaseKind::Sale, dec!(150.00));
        order.created_at = base + Duration::days(id);
        orders.push(order);
    }
    let mut foreign = pending_order(6, PurchaseKind::Rent, dec!(80.00));
    foreign.user_id = STRANGER;
    orders.push(foreign);
    MockOrderRepo::new(orders)
}

fn ids(items: &[sitemart_orders::domain::types::OrderWithProduct]) -> Vec<i64> {
    items.iter().map(|item| item.order.id.0).collect()
}

#[tokio::test]
async fn should_list_own_orders_newest_first() {
    let uc = ListMyOrdersUseCase { orders: history() };

    let items = uc.execute(BUYER, PageRequest::default()).await.unwrap();

    assert_eq!(ids(&items), vec![5, 4, 3, 2, 1]);
    assert_eq!(items[0].product_name, "Site 1");
}

#[tokio::test]
async fn should_page_through_orders() {
    let uc = ListMyOrdersUseCase { orders: history() };

    let first = uc.execute(BUYER, PageRequest::new(1, 2)).await.unwrap();
    let third = uc.execute(BUYER, PageRequest::new(3, 2)).await.unwrap();
    let beyond = uc.execute(BUYER, PageRequest::new(4, 2)).await.unwrap();

    assert_eq!(ids(&first), vec![5, 4]);
    assert_eq!(ids(&third), vec![1]);
    assert!(beyond.is_empty());
}

#[tokio::test]
async fn should_return_empty_history_for_new_buyer() {
    let uc = ListMyOrdersUseCase { orders: history() };

    let items = uc.execute(UserId(1234), PageRequest::default()).await.unwrap();

    assert!(items.is_empty());
}

#[tokio::test]
async fn should_get_own_order() {
    let uc = GetOrderUseCase { orders: history() };

    let order = uc.execute(BUYER, Role::User, OrderId(3)).await.unwrap();

    assert_eq!(order.id, OrderId(3));
    assert_eq!(order.user_id, BUYER);
}

#[tokio::test]
async fn should_hide_other_users_order() {
    let uc = GetOrderUseCase { orders: history() };

    let err = uc.execute(BUYER, Role::User, OrderId(6)).await.unwrap_err();

    assert!(matches!(err, OrdersServiceError::OrderNotFound));
}

#[tokio::test]
async fn should_let_admin_read_any_order() {
    let uc = GetOrderUseCase { orders: history() };

    let order = uc.execute(BUYER, Role::Admin, OrderId(6)).await.unwrap();

    assert_eq!(order.user_id, STRANGER);
}

#[tokio::test]
async fn should_report_missing_order_as_not_found() {
    let uc = GetOrderUseCase { orders: history() };

    let err = uc.execute(BUYER, Role::Admin, OrderId(404)).await.unwrap_err();

    assert!(matches!(err, OrdersServiceError::OrderNotFound));
}
