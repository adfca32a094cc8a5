//! Forward-only order status transitions driven by gateway reports.
//!
//! | gateway  | kind | order status | side effect                  |
//! |----------|------|--------------|------------------------------|
//! | approved | sale | completed    |                              |
//! | approved | rent | rented       | expiry = now + 30 days       |
//! | pending  | any  | pending      |                              |
//! | rejected | any  | rejected     |                              |
//!
//! Only `pending` orders move. A terminal order that receives a different
//! status is a conflict and stays as it is.

use chrono::{DateTime, Duration, Utc};

use sitemart_domain::order::{OrderStatus, PurchaseKind, RENTAL_PERIOD_DAYS};

use crate::domain::types::{GatewayStatus, Order};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The order already reflects the report.
    NoOp,
    Transition {
        to: OrderStatus,
        rent_expiry: Option<DateTime<Utc>>,
    },
    /// `rented` without an expiry; set it.
    RepairExpiry(DateTime<Utc>),
    Conflict {
        current: OrderStatus,
        reported: OrderStatus,
    },
    /// The gateway status has no mapping.
    Ignore,
}

/// Order status a gateway status maps to for a given purchase kind.
pub fn target_status(status: &GatewayStatus, kind: PurchaseKind) -> Option<OrderStatus> {
    match (status, kind) {
        (GatewayStatus::Approved, PurchaseKind::Sale) => Some(OrderStatus::Completed),
        (GatewayStatus::Approved, PurchaseKind::Rent) => Some(OrderStatus::Rented),
        (GatewayStatus::Pending, _) => Some(OrderStatus::Pending),
        (GatewayStatus::Rejected, _) => Some(OrderStatus::Rejected),
        (GatewayStatus::Other(_), _) => None,
    }
}

pub fn rental_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(RENTAL_PERIOD_DAYS)
}

pub fn decide(order: &Order, reported: &GatewayStatus, now: DateTime<Utc>) -> Decision {
    let Some(target) = target_status(reported, order.purchase_kind) else {
        return Decision::Ignore;
    };

    if target == order.status {
        if target == OrderStatus::Rented && order.rent_expiry_date.is_none() {
            return Decision::RepairExpiry(rental_expiry(now));
        }
        return Decision::NoOp;
    }

    if order.status.is_terminal() {
        return Decision::Conflict {
            current: order.status,
            reported: target,
        };
    }

    let rent_expiry = (target == OrderStatus::Rented).then(|| rental_expiry(now));
    Decision::Transition {
        to: target,
        rent_expiry,
    }
}
