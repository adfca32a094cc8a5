use sitemart_domain::id::{OrderId, UserId};
use sitemart_domain::pagination::PageRequest;
use sitemart_domain::user::Role;

use crate::domain::repository::OrderRepository;
use crate::domain::types::{Order, OrderWithProduct};
use crate::error::OrdersServiceError;

pub struct ListMyOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ListMyOrdersUseCase<O> {
    pub async fn execute(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<OrderWithProduct>, OrdersServiceError> {
        self.orders.list_by_user(user_id, page).await
    }
}

pub struct GetOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> GetOrderUseCase<O> {
    /// Orders of other users are reported as not found unless the caller is
    /// an admin.
    pub async fn execute(
        &self,
        user_id: UserId,
        role: Role,
        order_id: OrderId,
    ) -> Result<Order, OrdersServiceError> {
        self.orders
            .find_by_id(order_id)
            .await?
            .filter(|order| order.user_id == user_id || role.is_admin())
            .ok_or(OrdersServiceError::OrderNotFound)
    }
}
