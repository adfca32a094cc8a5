use std::collections::HashMap;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use sitemart_core::error::error_response;

use crate::domain::notification::extract_payment_id;
use crate::error::OrdersServiceError;
use crate::state::AppState;
use crate::usecase::reconcile::ReconcilePaymentUseCase;

/// Any failure while processing a notification is answered with 500 so the
/// gateway redelivers it, whatever status the error maps to elsewhere.
pub struct WebhookFailure(OrdersServiceError);

impl IntoResponse for WebhookFailure {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self.0, kind = self.0.kind(), "payment notification failed");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            self.0.kind(),
            self.0.to_string(),
        )
    }
}

/// `POST /webhook`
///
/// The body is optional and parsed leniently; a notification without a
/// payment id is acknowledged with nothing to do.
pub async fn receive_webhook(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Json<Value>, WebhookFailure> {
    let body: Option<Value> = serde_json::from_slice(&body).ok();
    let Some(payment_id) = extract_payment_id(&query, body.as_ref()) else {
        tracing::debug!(?query, "notification without payment id, acknowledging");
        return Ok(Json(json!({ "outcome": "no_payment_id" })));
    };

    let usecase = ReconcilePaymentUseCase {
        orders: state.order_repo(),
        gateway: state.gateway(),
    };
    let outcome = usecase.execute(&payment_id).await.map_err(WebhookFailure)?;
    Ok(Json(json!({ "outcome": outcome.as_str() })))
}
