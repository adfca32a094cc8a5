//! Mercado Pago Payments API adapter.
//!
//! `POST /v1/payments` creates a payment for one order, `GET /v1/payments/{id}`
//! reads it back. The order id travels as `external_reference` and is the only
//! correlation key.

use std::time::Duration;

use anyhow::Context as _;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use sitemart_domain::order::PurchaseKind;

use crate::domain::repository::PaymentGateway;
use crate::domain::types::{
    CreatedPayment, DocumentType, GatewayStatus, PaymentMethod, PaymentRequest, PaymentSnapshot,
};
use crate::error::OrdersServiceError;

pub const DEFAULT_BASE_URL: &str = "https://api.mercadopago.com";

#[derive(Clone)]
pub struct MercadoPagoGateway {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl MercadoPagoGateway {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build payment gateway HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            access_token: access_token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreatePaymentBody<'a> {
    #[serde(with = "rust_decimal::serde::float")]
    transaction_amount: Decimal,
    description: &'a str,
    payment_method_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    installments: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issuer_id: Option<&'a str>,
    payer: PayerBody<'a>,
    external_reference: String,
    notification_url: &'a str,
    metadata: MetadataBody,
}

#[derive(Debug, Serialize)]
struct PayerBody<'a> {
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    identification: IdentificationBody<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<AddressBody<'a>>,
}

#[derive(Debug, Serialize)]
struct IdentificationBody<'a> {
    #[serde(rename = "type")]
    kind: DocumentType,
    number: &'a str,
}

#[derive(Debug, Serialize)]
struct AddressBody<'a> {
    zip_code: &'a str,
    street_name: &'a str,
    street_number: &'a str,
}

#[derive(Debug, Serialize)]
struct MetadataBody {
    order_id: i64,
    user_id: i64,
    product_id: i64,
    purchase_kind: PurchaseKind,
}

#[derive(Debug, Deserialize)]
struct PaymentResponse {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    status: String,
    #[serde(default)]
    external_reference: Value,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    transaction_amount: Option<Decimal>,
    #[serde(default)]
    point_of_interaction: Option<PointOfInteraction>,
}

#[derive(Debug, Deserialize)]
struct PointOfInteraction {
    #[serde(default)]
    transaction_data: Option<TransactionData>,
}

#[derive(Debug, Deserialize)]
struct TransactionData {
    #[serde(default)]
    ticket_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    cause: Value,
}

fn payment_body(request: &PaymentRequest) -> CreatePaymentBody<'_> {
    let (payment_method_id, token, installments, issuer_id) = match &request.method {
        PaymentMethod::Pix => ("pix", None, None, None),
        PaymentMethod::Card(card) => (
            card.payment_method_id.as_str(),
            Some(card.token.as_str()),
            Some(card.installments),
            card.issuer_id.as_deref(),
        ),
    };
    let payer = &request.payer;
    CreatePaymentBody {
        transaction_amount: request.amount,
        description: &request.description,
        payment_method_id,
        token,
        installments,
        issuer_id,
        payer: PayerBody {
            email: &payer.email,
            first_name: &payer.first_name,
            last_name: &payer.last_name,
            identification: IdentificationBody {
                kind: payer.identification.kind,
                number: &payer.identification.number,
            },
            address: payer.address.as_ref().map(|a| AddressBody {
                zip_code: &a.zip_code,
                street_name: &a.street_name,
                street_number: &a.street_number,
            }),
        },
        external_reference: request.order_id.to_string(),
        notification_url: &request.notification_url,
        metadata: MetadataBody {
            order_id: request.order_id.0,
            user_id: request.user_id.0,
            product_id: request.product_id.0,
            purchase_kind: request.purchase_kind,
        },
    }
}

/// Ids and references arrive as JSON numbers or strings depending on the field.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `message: cause; cause` from a 4xx body, falling back to the raw text.
fn rejection_reason(status: StatusCode, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let causes: Vec<&str> = match &parsed.cause {
        Value::Array(items) => items
            .iter()
            .filter_map(|c| c.get("description").and_then(Value::as_str))
            .collect(),
        Value::Object(_) => parsed
            .cause
            .get("description")
            .and_then(Value::as_str)
            .into_iter()
            .collect(),
        _ => Vec::new(),
    };

    match (parsed.message, causes.is_empty()) {
        (Some(message), true) => message,
        (Some(message), false) => format!("{message}: {}", causes.join("; ")),
        (None, false) => causes.join("; "),
        (None, true) if !body.trim().is_empty() => body.trim().to_owned(),
        (None, true) => format!("gateway responded with {status}"),
    }
}

async fn error_from_response(
    response: reqwest::Response,
    payment_id: Option<&str>,
) -> OrdersServiceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%status, body = %body, "payment gateway returned an error");
    match (status.as_u16(), payment_id) {
        (400 | 422, _) => OrdersServiceError::GatewayRejected(rejection_reason(status, &body)),
        (404, Some(id)) => OrdersServiceError::PaymentNotFound(id.to_owned()),
        _ => OrdersServiceError::GatewayUnavailable(format!("gateway responded with {status}")),
    }
}

fn transport_error(e: reqwest::Error) -> OrdersServiceError {
    tracing::warn!(error = %e, "payment gateway request failed");
    OrdersServiceError::GatewayUnavailable(e.to_string())
}

impl PaymentGateway for MercadoPagoGateway {
    async fn create_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<CreatedPayment, OrdersServiceError> {
        let response = self
            .client
            .post(self.url("/v1/payments"))
            .bearer_auth(&self.access_token)
            .header("X-Idempotency-Key", format!("order-{}", request.order_id))
            .json(&payment_body(request))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response, None).await);
        }

        let payment: PaymentResponse = response.json().await.map_err(transport_error)?;
        let gateway_reference = scalar_to_string(&payment.id).ok_or_else(|| {
            OrdersServiceError::GatewayUnavailable("payment created without an id".to_owned())
        })?;
        let redirect_url = payment
            .point_of_interaction
            .and_then(|p| p.transaction_data)
            .and_then(|t| t.ticket_url);

        Ok(CreatedPayment {
            gateway_reference,
            redirect_url,
        })
    }

    async fn fetch_payment(
        &self,
        payment_id: &str,
    ) -> Result<PaymentSnapshot, OrdersServiceError> {
        let response = self
            .client
            .get(self.url(&format!("/v1/payments/{payment_id}")))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response, Some(payment_id)).await);
        }

        let payment: PaymentResponse = response.json().await.map_err(transport_error)?;
        Ok(PaymentSnapshot {
            id: scalar_to_string(&payment.id).unwrap_or_else(|| payment_id.to_owned()),
            status: GatewayStatus::parse(&payment.status),
            correlation_key: scalar_to_string(&payment.external_reference),
            amount: payment.transaction_amount,
        })
    }
}
