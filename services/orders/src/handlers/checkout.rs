use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::WithRejection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sitemart_auth_types::principal::Principal;
use sitemart_domain::id::{OrderId, ProductId};
use sitemart_domain::order::{OrderStatus, PurchaseKind};

use crate::domain::types::{CardPayment, PayerAddress, PayerDetails, PaymentMethod};
use crate::error::OrdersServiceError;
use crate::state::AppState;
use crate::usecase::checkout::{CheckoutInput, CheckoutUseCase};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodKind {
    Pix,
    Card,
}

#[derive(Debug, Deserialize)]
pub struct CardRequest {
    pub token: String,
    #[serde(default = "default_installments")]
    pub installments: u32,
    pub payment_method_id: String,
    #[serde(default)]
    pub issuer_id: Option<String>,
}

fn default_installments() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub zip_code: String,
    #[serde(default)]
    pub street_name: String,
    #[serde(default)]
    pub street_number: String,
}

#[derive(Debug, Deserialize)]
pub struct PayerRequest {
    pub full_name: String,
    pub email: String,
    pub document: String,
    #[serde(default)]
    pub address: Option<AddressRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub product_id: ProductId,
    pub purchase_kind: PurchaseKind,
    pub amount: Decimal,
    pub payment_method: PaymentMethodKind,
    #[serde(default)]
    pub card: Option<CardRequest>,
    pub payer: PayerRequest,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    pub gateway_checkout_reference: String,
    pub redirect_url: Option<String>,
    pub status: OrderStatus,
}

fn payment_method(
    kind: PaymentMethodKind,
    card: Option<CardRequest>,
) -> Result<PaymentMethod, OrdersServiceError> {
    match kind {
        PaymentMethodKind::Pix => Ok(PaymentMethod::Pix),
        PaymentMethodKind::Card => {
            let card = card.ok_or_else(|| {
                OrdersServiceError::InvalidRequest("card details are required".to_owned())
            })?;
            Ok(PaymentMethod::Card(CardPayment {
                token: card.token,
                installments: card.installments,
                payment_method_id: card.payment_method_id,
                issuer_id: card.issuer_id,
            }))
        }
    }
}

/// `POST /checkout`
///
/// Bodies that do not deserialize (unknown purchase kind, missing payer,
/// non-numeric amount) are answered as `INVALID_REQUEST`.
pub async fn create_checkout(
    State(state): State<AppState>,
    principal: Principal,
    WithRejection(Json(body), _): WithRejection<Json<CheckoutRequest>, OrdersServiceError>,
) -> Result<(StatusCode, Json<CheckoutResponse>), OrdersServiceError> {
    let method = payment_method(body.payment_method, body.card)?;
    let payer = PayerDetails {
        full_name: body.payer.full_name,
        email: body.payer.email,
        document: body.payer.document,
        address: body.payer.address.map(|a| PayerAddress {
            zip_code: a.zip_code,
            street_name: a.street_name,
            street_number: a.street_number,
        }),
    };

    let usecase = CheckoutUseCase {
        orders: state.order_repo(),
        catalog: state.catalog(),
        gateway: state.gateway(),
        notification_url: state.notification_url.clone(),
        enforce_catalog_price: state.enforce_catalog_price,
    };
    let output = usecase
        .execute(CheckoutInput {
            user_id: principal.user_id,
            product_id: body.product_id,
            purchase_kind: body.purchase_kind,
            amount: body.amount,
            method,
            payer,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order_id: output.order_id,
            gateway_checkout_reference: output.gateway_checkout_reference,
            redirect_url: output.redirect_url,
            status: output.status,
        }),
    ))
}
