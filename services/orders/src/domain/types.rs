use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use sitemart_domain::id::{OrderId, ProductId, ReviewId, UserId};
use sitemart_domain::order::{OrderStatus, PurchaseKind};

/// A purchase or rental intent and its settlement lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub purchase_kind: PurchaseKind,
    pub status: OrderStatus,
    pub transaction_amount: Decimal,
    pub gateway_reference: Option<String>,
    pub rent_expiry_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields fixed at checkout; the store assigns id, status and timestamps.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub purchase_kind: PurchaseKind,
    pub transaction_amount: Decimal,
}

/// An order joined with the catalog fields shown in a buyer's history.
#[derive(Debug, Clone)]
pub struct OrderWithProduct {
    pub order: Order,
    pub product_name: String,
    pub site_link: Option<String>,
    pub main_image_url: Option<String>,
}

/// Catalog view of a product, read-only here.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sale_price: Decimal,
    pub rent_price: Decimal,
    pub available: bool,
}

impl Product {
    pub fn price_for(&self, kind: PurchaseKind) -> Decimal {
        match kind {
            PurchaseKind::Sale => self.sale_price,
            PurchaseKind::Rent => self.rent_price,
        }
    }
}

// ── Reviews ───────────────────────────────────────────────────────────────────

/// A rating left by a buyer whose order for the site settled.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub rating: i16,
    pub comment_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub rating: i16,
    pub comment_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ── Payer ─────────────────────────────────────────────────────────────────────

/// Payer details as the buyer typed them at checkout.
#[derive(Debug, Clone)]
pub struct PayerDetails {
    pub full_name: String,
    pub email: String,
    pub document: String,
    pub address: Option<PayerAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayerAddress {
    pub zip_code: String,
    pub street_name: String,
    pub street_number: String,
}

/// Brazilian taxpayer document kinds accepted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocumentType {
    #[serde(rename = "CPF")]
    Cpf,
    #[serde(rename = "CNPJ")]
    Cnpj,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    pub kind: DocumentType,
    pub number: String,
}

/// Payer normalised into the shape the gateway expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub identification: Identification,
    pub address: Option<PayerAddress>,
}

// ── Gateway ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPayment {
    pub token: String,
    pub installments: u32,
    pub payment_method_id: String,
    pub issuer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    Pix,
    Card(CardPayment),
}

/// Everything the gateway needs to create one payment for one order.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// Correlation key, echoed back as the payment's external reference.
    pub order_id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub purchase_kind: PurchaseKind,
    pub amount: Decimal,
    pub description: String,
    pub method: PaymentMethod,
    pub payer: Payer,
    pub notification_url: String,
}

/// Payment status as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayStatus {
    Approved,
    /// `pending`, `in_process`, `authorized` and `in_mediation`.
    Pending,
    /// `rejected` and `cancelled`.
    Rejected,
    /// Anything else (`refunded`, `charged_back`, ...). Not actionable.
    Other(String),
}

impl GatewayStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "approved" => Self::Approved,
            "pending" | "in_process" | "authorized" | "in_mediation" => Self::Pending,
            "rejected" | "cancelled" => Self::Rejected,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// Result of creating a payment. The status in the create response is not
/// kept; only a fetched [`PaymentSnapshot`] drives order transitions.
#[derive(Debug, Clone)]
pub struct CreatedPayment {
    pub gateway_reference: String,
    pub redirect_url: Option<String>,
}

/// Authoritative payment record fetched by id.
#[derive(Debug, Clone)]
pub struct PaymentSnapshot {
    pub id: String,
    pub status: GatewayStatus,
    pub correlation_key: Option<String>,
    pub amount: Option<Decimal>,
}

// ── Reconciliation ────────────────────────────────────────────────────────────

/// What a payment update did to the local order. Every variant is a success
/// from the notifier's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Applied(OrderStatus),
    Unchanged,
    Conflict,
    Unattributable,
    UnknownOrder,
    Ignored,
}

impl ReconcileOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied(_) => "applied",
            Self::Unchanged => "unchanged",
            Self::Conflict => "conflict",
            Self::Unattributable => "unattributable",
            Self::UnknownOrder => "unknown_order",
            Self::Ignored => "ignored",
        }
    }
}
