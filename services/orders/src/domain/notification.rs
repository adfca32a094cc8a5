//! Payment id extraction from gateway notifications.
//!
//! Mercado Pago delivers the same event in several envelopes:
//!
//! - webhooks: `?data.id=123&type=payment`, body `{"type":"payment","data":{"id":"123"}}`
//! - legacy IPN: `?id=123&topic=payment`, body `{"resource":".../v1/payments/123","topic":"payment"}`
//!
//! Notifications about other resources (`merchant_order`, `plan`, ...) carry
//! no payment id. The body `id` field is the notification's own id and is
//! never read.

use std::collections::HashMap;

use serde_json::Value;

const PAYMENT_TOPIC: &str = "payment";

fn topic<'a>(query: &'a HashMap<String, String>, body: Option<&'a Value>) -> Option<&'a str> {
    query
        .get("type")
        .or_else(|| query.get("topic"))
        .map(String::as_str)
        .or_else(|| {
            let body = body?;
            body.get("type")
                .or_else(|| body.get("topic"))
                .and_then(Value::as_str)
        })
}

fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Last path segment of a `resource` URL, or the value itself if bare.
fn resource_id(resource: &str) -> &str {
    resource
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}

fn is_valid_payment_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// The payment id a notification refers to, if any.
pub fn extract_payment_id(
    query: &HashMap<String, String>,
    body: Option<&Value>,
) -> Option<String> {
    let topic = topic(query, body);
    if topic.is_some_and(|t| t != PAYMENT_TOPIC) {
        return None;
    }

    let candidate = query
        .get("data.id")
        .map(|s| s.trim().to_owned())
        .or_else(|| {
            (topic == Some(PAYMENT_TOPIC))
                .then(|| query.get("id"))
                .flatten()
                .map(|s| s.trim().to_owned())
        })
        .or_else(|| body?.get("data")?.get("id").and_then(id_value))
        .or_else(|| {
            body?
                .get("resource")
                .and_then(Value::as_str)
                .map(|r| resource_id(r).to_owned())
        })?;

    is_valid_payment_id(&candidate).then_some(candidate)
}
