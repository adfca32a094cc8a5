//! Canned MercadoPago payloads.
//!
//! Shapes follow the Payments API (`/v1/payments`) and its webhook
//! notifications. Only the fields the orders service reads are filled in.

use serde_json::{Value, json};

/// Body of `GET /v1/payments/{id}`.
pub fn payment(id: &str, status: &str, external_reference: Option<&str>, amount: f64) -> Value {
    json!({
        "id": id.parse::<u64>().map(Value::from).unwrap_or_else(|_| Value::from(id)),
        "status": status,
        "status_detail": "accredited",
        "external_reference": external_reference,
        "transaction_amount": amount,
        "currency_id": "BRL",
        "metadata": {},
    })
}

/// Body returned by `POST /v1/payments` for a Pix charge.
pub fn created_pix_payment(id: u64, external_reference: &str, amount: f64) -> Value {
    json!({
        "id": id,
        "status": "pending",
        "status_detail": "pending_waiting_transfer",
        "external_reference": external_reference,
        "transaction_amount": amount,
        "point_of_interaction": {
            "transaction_data": {
                "qr_code": "00020126580014br.gov.bcb.pix",
                "ticket_url": format!("https://www.mercadopago.com.br/payments/{id}/ticket"),
            }
        }
    })
}

/// Body returned by `POST /v1/payments` for a card charge.
pub fn created_card_payment(id: u64, status: &str, external_reference: &str, amount: f64) -> Value {
    json!({
        "id": id,
        "status": status,
        "external_reference": external_reference,
        "transaction_amount": amount,
    })
}

/// Error body the gateway returns on 4xx.
pub fn gateway_error(message: &str, cause: &str) -> Value {
    json!({
        "message": message,
        "error": "bad_request",
        "status": 400,
        "cause": [{ "code": 2067, "description": cause }],
    })
}

/// Webhook body as delivered for `type=payment`.
pub fn payment_notification(payment_id: &str) -> Value {
    json!({
        "action": "payment.updated",
        "api_version": "v1",
        "type": "payment",
        "data": { "id": payment_id },
    })
}
