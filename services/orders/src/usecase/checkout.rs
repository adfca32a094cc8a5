use rust_decimal::Decimal;
use tracing::{info, warn};

use sitemart_domain::id::{OrderId, ProductId, UserId};
use sitemart_domain::money::{MAX_TRANSACTION_AMOUNT, MIN_TRANSACTION_AMOUNT, is_transactable};
use sitemart_domain::order::{OrderStatus, PurchaseKind, RENTAL_PERIOD_DAYS};

use crate::domain::repository::{CatalogPort, OrderRepository, PaymentGateway};
use crate::domain::types::{
    DocumentType, Identification, NewOrder, Payer, PayerAddress, PayerDetails, PaymentMethod,
    PaymentRequest,
};
use crate::error::OrdersServiceError;

pub struct CheckoutInput {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub purchase_kind: PurchaseKind,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub payer: PayerDetails,
}

#[derive(Debug)]
pub struct CheckoutOutput {
    pub order_id: OrderId,
    pub gateway_checkout_reference: String,
    pub redirect_url: Option<String>,
    pub status: OrderStatus,
}

pub struct CheckoutUseCase<O, C, G>
where
    O: OrderRepository,
    C: CatalogPort,
    G: PaymentGateway,
{
    pub orders: O,
    pub catalog: C,
    pub gateway: G,
    /// Where the gateway delivers payment notifications.
    pub notification_url: String,
    /// Reject amounts that differ from the catalog price.
    pub enforce_catalog_price: bool,
}

impl<O, C, G> CheckoutUseCase<O, C, G>
where
    O: OrderRepository,
    C: CatalogPort,
    G: PaymentGateway,
{
    pub async fn execute(&self, input: CheckoutInput) -> Result<CheckoutOutput, OrdersServiceError> {
        // 1. Validate everything the caller sent before touching storage
        validate_amount(input.amount)?;
        validate_method(&input.method)?;
        let payer = normalize_payer(&input.payer)?;

        // 2. Unavailable products are hidden from buyers, so they are not found
        let product = self
            .catalog
            .find_product(input.product_id)
            .await?
            .filter(|p| p.available)
            .ok_or(OrdersServiceError::ProductNotFound)?;

        let list_price = product.price_for(input.purchase_kind);
        if list_price < MIN_TRANSACTION_AMOUNT {
            return Err(OrdersServiceError::invalid(format!(
                "product is not offered for {}",
                input.purchase_kind
            )));
        }
        if self.enforce_catalog_price && input.amount != list_price {
            return Err(OrdersServiceError::PriceMismatch);
        }

        // 3. Persist the pending order; it must exist before the gateway sees it
        let order = self
            .orders
            .insert_pending(&NewOrder {
                user_id: input.user_id,
                product_id: product.id,
                purchase_kind: input.purchase_kind,
                transaction_amount: input.amount,
            })
            .await?;
        info!(
            order_id = %order.id,
            user_id = %order.user_id,
            product_id = %order.product_id,
            purchase_kind = %order.purchase_kind,
            amount = %order.transaction_amount,
            "pending order created"
        );

        // 4. Create the payment. On failure the order stays pending without a reference.
        let request = PaymentRequest {
            order_id: order.id,
            user_id: order.user_id,
            product_id: order.product_id,
            purchase_kind: order.purchase_kind,
            amount: order.transaction_amount,
            description: describe(order.purchase_kind, &product.name),
            method: input.method,
            payer,
            notification_url: self.notification_url.clone(),
        };
        let created = match self.gateway.create_payment(&request).await {
            Ok(created) => created,
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "payment creation failed, order left pending");
                return Err(e);
            }
        };

        // 5. Record the gateway reference (single assignment)
        let assigned = self
            .orders
            .assign_gateway_reference(order.id, &created.gateway_reference)
            .await?;
        if !assigned {
            warn!(
                order_id = %order.id,
                payment_id = %created.gateway_reference,
                "order already had a gateway reference"
            );
        }

        Ok(CheckoutOutput {
            order_id: order.id,
            gateway_checkout_reference: created.gateway_reference,
            redirect_url: created.redirect_url,
            status: order.status,
        })
    }
}

fn validate_amount(amount: Decimal) -> Result<(), OrdersServiceError> {
    if amount < MIN_TRANSACTION_AMOUNT {
        return Err(OrdersServiceError::invalid(format!(
            "amount must be at least {MIN_TRANSACTION_AMOUNT:.2}"
        )));
    }
    if amount > MAX_TRANSACTION_AMOUNT {
        return Err(OrdersServiceError::invalid(format!(
            "amount must be at most {MAX_TRANSACTION_AMOUNT:.2}"
        )));
    }
    if !is_transactable(amount) {
        return Err(OrdersServiceError::invalid(
            "amount must have at most two decimal places",
        ));
    }
    Ok(())
}

fn validate_method(method: &PaymentMethod) -> Result<(), OrdersServiceError> {
    if let PaymentMethod::Card(card) = method {
        if card.token.trim().is_empty() {
            return Err(OrdersServiceError::invalid("card token is required"));
        }
        if card.installments < 1 {
            return Err(OrdersServiceError::invalid("installments must be at least 1"));
        }
        if card.payment_method_id.trim().is_empty() {
            return Err(OrdersServiceError::invalid("card payment_method_id is required"));
        }
    }
    Ok(())
}

fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Normalise typed payer details into the gateway's payer shape.
///
/// First word of the name is the first name, the rest the last name (`.` when
/// there is none). The document is a CPF with 11 digits or a CNPJ with 14.
pub fn normalize_payer(details: &PayerDetails) -> Result<Payer, OrdersServiceError> {
    let mut words = details.full_name.split_whitespace();
    let first_name = words
        .next()
        .ok_or_else(|| OrdersServiceError::invalid("payer name is required"))?
        .to_owned();
    let rest: Vec<&str> = words.collect();
    let last_name = if rest.is_empty() {
        ".".to_owned()
    } else {
        rest.join(" ")
    };

    let email = details.email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(OrdersServiceError::invalid("payer email is invalid")),
    }

    let number = digits(&details.document);
    let kind = match number.len() {
        11 => DocumentType::Cpf,
        14 => DocumentType::Cnpj,
        _ => {
            return Err(OrdersServiceError::invalid(
                "document must be a CPF (11 digits) or CNPJ (14 digits)",
            ));
        }
    };

    let address = match &details.address {
        None => None,
        Some(a) => {
            let zip_code = digits(&a.zip_code);
            if zip_code.is_empty() {
                return Err(OrdersServiceError::invalid("zip code is invalid"));
            }
            Some(PayerAddress {
                zip_code,
                street_name: a.street_name.trim().to_owned(),
                street_number: a.street_number.trim().to_owned(),
            })
        }
    };

    Ok(Payer {
        email: email.to_owned(),
        first_name,
        last_name,
        identification: Identification { kind, number },
        address,
    })
}

/// Payment description shown on the buyer's statement.
pub fn describe(kind: PurchaseKind, product_name: &str) -> String {
    match kind {
        PurchaseKind::Sale => format!("Purchase of site: {product_name}"),
        PurchaseKind::Rent => {
            format!("Rental of site: {product_name} ({RENTAL_PERIOD_DAYS} days)")
        }
    }
}
