use std::time::Duration;

use mockito::{Matcher, Server};
use rust_decimal::dec;
use serde_json::json;

use sitemart_domain::id::{OrderId, ProductId};
use sitemart_domain::order::PurchaseKind;
use sitemart_orders::domain::repository::PaymentGateway;
use sitemart_orders::domain::types::{CardPayment, GatewayStatus, PaymentMethod, PaymentRequest};
use sitemart_orders::error::OrdersServiceError;
use sitemart_orders::infra::gateway::MercadoPagoGateway;
use sitemart_orders::usecase::checkout::normalize_payer;
use sitemart_testing::payloads;

use crate::helpers::{BUYER, payer};

const ACCESS_TOKEN: &str = "TEST-access-token";

fn gateway(base_url: &str) -> MercadoPagoGateway {
    MercadoPagoGateway::new(base_url, ACCESS_TOKEN, Duration::from_secs(5)).unwrap()
}

fn pix_request() -> PaymentRequest {
    PaymentRequest {
        order_id: OrderId(42),
        user_id: BUYER,
        product_id: ProductId(1),
        purchase_kind: PurchaseKind::Sale,
        amount: dec!(150.00),
        description: "Purchase of site: Site 1".to_owned(),
        method: PaymentMethod::Pix,
        payer: normalize_payer(&payer()).unwrap(),
        notification_url: "https://api.example.com/webhook".to_owned(),
    }
}

#[tokio::test]
async fn should_create_pix_payment_and_return_ticket_url() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/payments")
        .match_header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str())
        .match_header("x-idempotency-key", "order-42")
        .match_body(Matcher::PartialJson(json!({
            "payment_method_id": "pix",
            "external_reference": "42",
            "notification_url": "https://api.example.com/webhook",
            "payer": { "first_name": "Maria", "last_name": "da Silva" },
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(payloads::created_pix_payment(1001, "42", 150.0).to_string())
        .create_async()
        .await;

    let created = gateway(&server.url())
        .create_payment(&pix_request())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(created.gateway_reference, "1001");
    assert_eq!(
        created.redirect_url.as_deref(),
        Some("https://www.mercadopago.com.br/payments/1001/ticket")
    );
}

#[tokio::test]
async fn should_return_only_reference_for_card_approved_at_creation() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/payments")
        .match_body(Matcher::PartialJson(json!({
            "payment_method_id": "master",
            "token": "card-token",
            "installments": 2,
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(payloads::created_card_payment(1002, "approved", "42", 150.0).to_string())
        .create_async()
        .await;

    let mut request = pix_request();
    request.method = PaymentMethod::Card(CardPayment {
        token: "card-token".to_owned(),
        installments: 2,
        payment_method_id: "master".to_owned(),
        issuer_id: None,
    });

    let created = gateway(&server.url())
        .create_payment(&request)
        .await
        .unwrap();

    assert_eq!(created.gateway_reference, "1002");
    assert_eq!(created.redirect_url, None);
}

#[tokio::test]
async fn should_surface_gateway_rejection_reason() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/payments")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(
            payloads::gateway_error("invalid parameters", "Invalid user identification number")
                .to_string(),
        )
        .create_async()
        .await;

    let err = gateway(&server.url())
        .create_payment(&pix_request())
        .await
        .unwrap_err();

    match err {
        OrdersServiceError::GatewayRejected(reason) => assert_eq!(
            reason,
            "invalid parameters: Invalid user identification number"
        ),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn should_treat_server_and_credential_errors_as_unavailable() {
    for status in [500, 401, 503] {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/payments")
            .with_status(status)
            .with_body("{}")
            .create_async()
            .await;

        let err = gateway(&server.url())
            .create_payment(&pix_request())
            .await
            .unwrap_err();

        assert!(
            matches!(err, OrdersServiceError::GatewayUnavailable(_)),
            "status {status} gave {err:?}"
        );
    }
}

#[tokio::test]
async fn should_fetch_payment_snapshot() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/payments/1001")
        .match_header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(payloads::payment("1001", "approved", Some("42"), 150.0).to_string())
        .create_async()
        .await;

    let snapshot = gateway(&server.url()).fetch_payment("1001").await.unwrap();

    mock.assert_async().await;
    assert_eq!(snapshot.id, "1001");
    assert_eq!(snapshot.status, GatewayStatus::Approved);
    assert_eq!(snapshot.correlation_key.as_deref(), Some("42"));
    assert_eq!(snapshot.amount, Some(dec!(150)));
}

#[tokio::test]
async fn should_fetch_payment_without_external_reference() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/payments/1001")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(payloads::payment("1001", "refunded", None, 10.0).to_string())
        .create_async()
        .await;

    let snapshot = gateway(&server.url()).fetch_payment("1001").await.unwrap();

    assert_eq!(snapshot.correlation_key, None);
    assert_eq!(snapshot.status, GatewayStatus::Other("refunded".to_owned()));
}

#[tokio::test]
async fn should_report_unknown_payment_as_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/payments/999")
        .with_status(404)
        .with_body(r#"{"message":"Payment not found"}"#)
        .create_async()
        .await;

    let err = gateway(&server.url()).fetch_payment("999").await.unwrap_err();

    assert!(matches!(err, OrdersServiceError::PaymentNotFound(id) if id == "999"));
}

#[tokio::test]
async fn should_report_unreachable_gateway_as_unavailable() {
    let err = gateway("http://127.0.0.1:1")
        .fetch_payment("1001")
        .await
        .unwrap_err();

    assert!(matches!(err, OrdersServiceError::GatewayUnavailable(_)));
}
