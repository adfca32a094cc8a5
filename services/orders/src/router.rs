use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use sitemart_core::health::healthz;
use sitemart_core::middleware::request_id_layers;

use crate::handlers::{
    checkout::create_checkout,
    health::readyz,
    orders::{get_my_orders, get_order},
    review::create_review,
    webhook::receive_webhook,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Checkout
        .route("/checkout", post(create_checkout))
        // Payment notifications
        .route("/webhook", post(receive_webhook))
        // Order history
        .route("/orders/@me", get(get_my_orders))
        // `{id}` is an order id here and a site id on the review route
        .route("/orders/{id}", get(get_order))
        // Reviews
        .route("/orders/{id}/review", post(create_review))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layers())
        .with_state(state)
}
