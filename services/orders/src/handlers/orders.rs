use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use sitemart_auth_types::principal::Principal;
use sitemart_core::serde::{opt_to_rfc3339_ms, to_rfc3339_ms};
use sitemart_domain::id::{OrderId, ProductId};
use sitemart_domain::order::{OrderStatus, PurchaseKind};
use sitemart_domain::pagination::PageRequest;

use crate::domain::types::{Order, OrderWithProduct};
use crate::error::OrdersServiceError;
use crate::state::AppState;
use crate::usecase::history::{GetOrderUseCase, ListMyOrdersUseCase};

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub product_id: ProductId,
    pub purchase_kind: PurchaseKind,
    pub status: OrderStatus,
    pub transaction_amount: Decimal,
    pub gateway_reference: Option<String>,
    #[serde(serialize_with = "opt_to_rfc3339_ms")]
    pub rent_expiry_date: Option<DateTime<Utc>>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            product_id: order.product_id,
            purchase_kind: order.purchase_kind,
            status: order.status,
            transaction_amount: order.transaction_amount,
            gateway_reference: order.gateway_reference,
            rent_expiry_date: order.rent_expiry_date,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub name: String,
    pub site_link: Option<String>,
    pub main_image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderHistoryItem {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub product: ProductSummary,
}

impl From<OrderWithProduct> for OrderHistoryItem {
    fn from(row: OrderWithProduct) -> Self {
        Self {
            order: row.order.into(),
            product: ProductSummary {
                name: row.product_name,
                site_link: row.site_link,
                main_image_url: row.main_image_url,
            },
        }
    }
}

/// `GET /orders/@me?page=&per-page=`
pub async fn get_my_orders(
    State(state): State<AppState>,
    principal: Principal,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<OrderHistoryItem>>, OrdersServiceError> {
    let usecase = ListMyOrdersUseCase {
        orders: state.order_repo(),
    };
    let rows = usecase.execute(principal.user_id, page).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// `GET /orders/{id}`
pub async fn get_order(
    State(state): State<AppState>,
    principal: Principal,
    Path(order_id): Path<OrderId>,
) -> Result<Json<OrderResponse>, OrdersServiceError> {
    let usecase = GetOrderUseCase {
        orders: state.order_repo(),
    };
    let order = usecase
        .execute(principal.user_id, principal.role, order_id)
        .await?;
    Ok(Json(order.into()))
}
