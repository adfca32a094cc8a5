#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use sitemart_domain::id::{OrderId, ProductId, UserId};
use sitemart_domain::order::OrderStatus;
use sitemart_domain::pagination::PageRequest;

use crate::domain::types::{
    CreatedPayment, NewOrder, NewReview, Order, OrderWithProduct, PaymentRequest, PaymentSnapshot,
    Product, Review,
};
use crate::error::OrdersServiceError;

/// Persisted orders. The only mutable state shared between requests.
pub trait OrderRepository: Send + Sync {
    /// Insert a new order in `pending` with no gateway reference.
    async fn insert_pending(&self, new: &NewOrder) -> Result<Order, OrdersServiceError>;

    /// Store the gateway reference if none is set yet. Returns `false` when a
    /// reference was already present (or the order is gone).
    async fn assign_gateway_reference(
        &self,
        id: OrderId,
        reference: &str,
    ) -> Result<bool, OrdersServiceError>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrdersServiceError>;

    /// Move a `pending` order to `to`, setting `rent_expiry` in the same
    /// statement. Conditional on the row still being `pending`; returns
    /// `false` if another writer got there first.
    async fn transition_from_pending(
        &self,
        id: OrderId,
        to: OrderStatus,
        rent_expiry: Option<DateTime<Utc>>,
    ) -> Result<bool, OrdersServiceError>;

    /// Set the expiry of a `rented` order that has none.
    async fn fill_rent_expiry(
        &self,
        id: OrderId,
        expiry: DateTime<Utc>,
    ) -> Result<bool, OrdersServiceError>;

    /// A buyer's orders, newest first.
    async fn list_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<OrderWithProduct>, OrdersServiceError>;

    /// Whether the user holds a `completed` or `rented` order for the product.
    async fn has_settled_order(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, OrdersServiceError>;
}

/// Buyer reviews of catalog sites.
pub trait ReviewRepository: Send + Sync {
    async fn exists(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, OrdersServiceError>;

    /// Fails with `AlreadyReviewed` when the user already reviewed the product.
    async fn insert(&self, new: &NewReview) -> Result<Review, OrdersServiceError>;
}

/// Read-only product catalog.
pub trait CatalogPort: Send + Sync {
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, OrdersServiceError>;
}

/// Outbound payment processor.
pub trait PaymentGateway: Send + Sync {
    async fn create_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<CreatedPayment, OrdersServiceError>;

    async fn fetch_payment(&self, payment_id: &str)
    -> Result<PaymentSnapshot, OrdersServiceError>;
}
