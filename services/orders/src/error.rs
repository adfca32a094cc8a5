use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use sitemart_core::error::error_response;

/// Orders service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum OrdersServiceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("amount does not match the catalog price")]
    PriceMismatch,
    #[error("product not found")]
    ProductNotFound,
    #[error("order not found")]
    OrderNotFound,
    #[error("payment rejected by gateway: {0}")]
    GatewayRejected(String),
    #[error("payment gateway unavailable: {0}")]
    GatewayUnavailable(String),
    #[error("payment {0} not found at gateway")]
    PaymentNotFound(String),
    #[error("only buyers of this site can review it")]
    ReviewNotAllowed,
    #[error("site already reviewed by this user")]
    AlreadyReviewed,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl OrdersServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::PriceMismatch => "PRICE_MISMATCH",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::GatewayRejected(_) => "GATEWAY_REJECTED",
            Self::GatewayUnavailable(_) => "GATEWAY_UNAVAILABLE",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::ReviewNotAllowed => "REVIEW_NOT_ALLOWED",
            Self::AlreadyReviewed => "ALREADY_REVIEWED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_)
            | Self::PriceMismatch
            | Self::GatewayRejected(_)
            | Self::AlreadyReviewed => StatusCode::BAD_REQUEST,
            Self::ReviewNotAllowed => StatusCode::FORBIDDEN,
            Self::ProductNotFound | Self::OrderNotFound => StatusCode::NOT_FOUND,
            Self::GatewayUnavailable(_) | Self::PaymentNotFound(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRequest(reason.into())
    }
}

impl From<JsonRejection> for OrdersServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for OrdersServiceError {
    fn into_response(self) -> Response {
        // 4xx/502 are expected outcomes and TraceLayer records them; only the
        // anyhow chain behind a 500 needs logging here.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), self.to_string())
    }
}
