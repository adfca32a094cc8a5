use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr,
};

use sitemart_domain::id::{OrderId, ProductId, ReviewId, UserId};
use sitemart_domain::order::{OrderStatus, PurchaseKind};
use sitemart_domain::pagination::PageRequest;
use sitemart_orders_schema::{comments, orders, sites};

use crate::domain::repository::{CatalogPort, OrderRepository, ReviewRepository};
use crate::domain::types::{NewOrder, NewReview, Order, OrderWithProduct, Product, Review};
use crate::error::OrdersServiceError;

// ── Order repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn insert_pending(&self, new: &NewOrder) -> Result<Order, OrdersServiceError> {
        let now = Utc::now();
        let model = orders::ActiveModel {
            user_id: Set(new.user_id.0),
            site_id: Set(new.product_id.0),
            purchase_kind: Set(new.purchase_kind.as_str().to_owned()),
            status: Set(OrderStatus::Pending.as_str().to_owned()),
            transaction_amount: Set(new.transaction_amount),
            gateway_reference: Set(None),
            rent_expiry_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("insert pending order")?;
        order_from_model(model)
    }

    async fn assign_gateway_reference(
        &self,
        id: OrderId,
        reference: &str,
    ) -> Result<bool, OrdersServiceError> {
        let result = orders::Entity::update_many()
            .col_expr(orders::Column::GatewayReference, Expr::value(reference))
            .col_expr(orders::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(orders::Column::Id.eq(id.0))
            .filter(orders::Column::GatewayReference.is_null())
            .exec(&self.db)
            .await
            .context("assign gateway reference")?;
        Ok(result.rows_affected == 1)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrdersServiceError> {
        let model = orders::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find order by id")?;
        model.map(order_from_model).transpose()
    }

    async fn transition_from_pending(
        &self,
        id: OrderId,
        to: OrderStatus,
        rent_expiry: Option<DateTime<Utc>>,
    ) -> Result<bool, OrdersServiceError> {
        let result = orders::Entity::update_many()
            .col_expr(orders::Column::Status, Expr::value(to.as_str()))
            .col_expr(orders::Column::RentExpiryDate, Expr::value(rent_expiry))
            .col_expr(orders::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(orders::Column::Id.eq(id.0))
            .filter(orders::Column::Status.eq(OrderStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("transition order from pending")?;
        Ok(result.rows_affected == 1)
    }

    async fn fill_rent_expiry(
        &self,
        id: OrderId,
        expiry: DateTime<Utc>,
    ) -> Result<bool, OrdersServiceError> {
        let result = orders::Entity::update_many()
            .col_expr(orders::Column::RentExpiryDate, Expr::value(expiry))
            .col_expr(orders::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(orders::Column::Id.eq(id.0))
            .filter(orders::Column::Status.eq(OrderStatus::Rented.as_str()))
            .filter(orders::Column::RentExpiryDate.is_null())
            .exec(&self.db)
            .await
            .context("fill rent expiry")?;
        Ok(result.rows_affected == 1)
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<OrderWithProduct>, OrdersServiceError> {
        let rows = orders::Entity::find()
            .find_also_related(sites::Entity)
            .filter(orders::Column::UserId.eq(user_id.0))
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list orders by user")?;

        rows.into_iter()
            .map(|(order, site)| {
                let order = order_from_model(order)?;
                let (product_name, site_link, main_image_url) = match site {
                    Some(site) => (site.name, site.site_link, site.main_image_url),
                    None => (String::new(), None, None),
                };
                Ok(OrderWithProduct {
                    order,
                    product_name,
                    site_link,
                    main_image_url,
                })
            })
            .collect()
    }

    async fn has_settled_order(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, OrdersServiceError> {
        let settled = [OrderStatus::Completed.as_str(), OrderStatus::Rented.as_str()];
        let found = orders::Entity::find()
            .select_only()
            .column(orders::Column::Id)
            .filter(orders::Column::UserId.eq(user_id.0))
            .filter(orders::Column::SiteId.eq(product_id.0))
            .filter(orders::Column::Status.is_in(settled))
            .into_tuple::<i64>()
            .one(&self.db)
            .await
            .context("find settled order")?;
        Ok(found.is_some())
    }
}

fn order_from_model(model: orders::Model) -> Result<Order, OrdersServiceError> {
    let purchase_kind = model
        .purchase_kind
        .parse::<PurchaseKind>()
        .with_context(|| format!("order {} has invalid purchase_kind", model.id))?;
    let status = model
        .status
        .parse::<OrderStatus>()
        .with_context(|| format!("order {} has invalid status", model.id))?;
    Ok(Order {
        id: OrderId(model.id),
        user_id: UserId(model.user_id),
        product_id: ProductId(model.site_id),
        purchase_kind,
        status,
        transaction_amount: model.transaction_amount,
        gateway_reference: model.gateway_reference,
        rent_expiry_date: model.rent_expiry_date,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Catalog ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCatalog {
    pub db: DatabaseConnection,
}

impl CatalogPort for DbCatalog {
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, OrdersServiceError> {
        let model = sites::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find site by id")?;
        Ok(model.map(|site| Product {
            id: ProductId(site.id),
            name: site.name,
            sale_price: site.price_sale,
            rent_price: site.price_rent,
            available: site.is_available,
        }))
    }
}

// ── Reviews ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn exists(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, OrdersServiceError> {
        let found = comments::Entity::find()
            .select_only()
            .column(comments::Column::Id)
            .filter(comments::Column::UserId.eq(user_id.0))
            .filter(comments::Column::SiteId.eq(product_id.0))
            .into_tuple::<i64>()
            .one(&self.db)
            .await
            .context("find review by user and site")?;
        Ok(found.is_some())
    }

    async fn insert(&self, new: &NewReview) -> Result<Review, OrdersServiceError> {
        let now = Utc::now();
        let result = comments::ActiveModel {
            user_id: Set(new.user_id.0),
            site_id: Set(new.product_id.0),
            rating: Set(new.rating),
            comment_text: Set(new.comment_text.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        let model = match result {
            Ok(model) => model,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(OrdersServiceError::AlreadyReviewed);
            }
            Err(e) => return Err(anyhow::Error::new(e).context("insert review").into()),
        };
        Ok(Review {
            id: ReviewId(model.id),
            user_id: UserId(model.user_id),
            product_id: ProductId(model.site_id),
            rating: model.rating,
            comment_text: model.comment_text,
            created_at: model.created_at,
        })
    }
}
