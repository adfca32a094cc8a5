use chrono::Utc;
use tracing::{info, warn};

use sitemart_domain::id::OrderId;
use sitemart_domain::order::OrderStatus;

use crate::domain::repository::{OrderRepository, PaymentGateway};
use crate::domain::transition::{Decision, decide};
use crate::domain::types::{Order, PaymentSnapshot, ReconcileOutcome};
use crate::error::OrdersServiceError;

/// Apply the gateway's authoritative view of one payment to its order.
///
/// Safe to run concurrently and repeatedly for the same payment: transitions
/// are conditional on the order still being `pending`, and a writer that
/// loses the race re-reads the order and ends in the no-op or conflict path.
pub struct ReconcilePaymentUseCase<O, G>
where
    O: OrderRepository,
    G: PaymentGateway,
{
    pub orders: O,
    pub gateway: G,
}

impl<O, G> ReconcilePaymentUseCase<O, G>
where
    O: OrderRepository,
    G: PaymentGateway,
{
    pub async fn execute(&self, payment_id: &str) -> Result<ReconcileOutcome, OrdersServiceError> {
        // 1. The notification only names the payment; the gateway is the source of truth
        let payment = self.gateway.fetch_payment(payment_id).await?;

        // 2. Correlate through the order id we sent as external reference
        let Some(order_id) = payment
            .correlation_key
            .as_deref()
            .and_then(|key| key.parse::<OrderId>().ok())
        else {
            info!(
                payment_id = %payment.id,
                correlation_key = ?payment.correlation_key,
                "payment has no usable correlation key, discarding"
            );
            return Ok(ReconcileOutcome::Unattributable);
        };

        let Some(order) = self.orders.find_by_id(order_id).await? else {
            info!(payment_id = %payment.id, order_id = %order_id, "payment refers to unknown order, discarding");
            return Ok(ReconcileOutcome::UnknownOrder);
        };

        // 3. A second payment for the same order never drives its status
        if let Some(reference) = &order.gateway_reference {
            if reference != &payment.id {
                warn!(
                    order_id = %order.id,
                    payment_id = %payment.id,
                    gateway_reference = %reference,
                    "payment does not match the order's gateway reference"
                );
                return Ok(ReconcileOutcome::Conflict);
            }
        }

        if let Some(amount) = payment.amount {
            if amount != order.transaction_amount {
                warn!(
                    order_id = %order.id,
                    payment_id = %payment.id,
                    order_amount = %order.transaction_amount,
                    gateway_amount = %amount,
                    "gateway amount differs from order amount"
                );
            }
        }

        match self.apply(&order, &payment).await? {
            Some(outcome) => Ok(outcome),
            None => {
                // Lost the conditional update: someone else moved the order first
                let Some(current) = self.orders.find_by_id(order.id).await? else {
                    return Ok(ReconcileOutcome::UnknownOrder);
                };
                self.apply(&current, &payment).await?.ok_or_else(|| {
                    anyhow::anyhow!("order {} changed concurrently twice", order.id).into()
                })
            }
        }
    }

    /// Decide and write. `None` means the conditional transition matched no row.
    async fn apply(
        &self,
        order: &Order,
        payment: &PaymentSnapshot,
    ) -> Result<Option<ReconcileOutcome>, OrdersServiceError> {
        let now = Utc::now();
        match decide(order, &payment.status, now) {
            Decision::Ignore => {
                info!(
                    order_id = %order.id,
                    payment_id = %payment.id,
                    gateway_status = ?payment.status,
                    "gateway status has no order mapping, ignoring"
                );
                Ok(Some(ReconcileOutcome::Ignored))
            }
            Decision::NoOp => Ok(Some(ReconcileOutcome::Unchanged)),
            Decision::Conflict { current, reported } => {
                warn!(
                    order_id = %order.id,
                    payment_id = %payment.id,
                    current = %current,
                    reported = %reported,
                    "conflicting status for terminal order, keeping current"
                );
                Ok(Some(ReconcileOutcome::Conflict))
            }
            Decision::RepairExpiry(expiry) => {
                let filled = self.orders.fill_rent_expiry(order.id, expiry).await?;
                if filled {
                    info!(order_id = %order.id, rent_expiry_date = %expiry, "rental expiry repaired");
                    Ok(Some(ReconcileOutcome::Applied(OrderStatus::Rented)))
                } else {
                    Ok(Some(ReconcileOutcome::Unchanged))
                }
            }
            Decision::Transition { to, rent_expiry } => {
                let moved = self
                    .orders
                    .transition_from_pending(order.id, to, rent_expiry)
                    .await?;
                if !moved {
                    return Ok(None);
                }
                info!(
                    order_id = %order.id,
                    payment_id = %payment.id,
                    status = %to,
                    rent_expiry_date = ?rent_expiry,
                    "order status updated"
                );
                Ok(Some(ReconcileOutcome::Applied(to)))
            }
        }
    }
}
