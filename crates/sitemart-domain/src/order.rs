//! Order vocabulary: what was bought and where its settlement stands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of days a rental stays active after its payment is approved.
pub const RENTAL_PERIOD_DAYS: i64 = 30;

/// Whether the buyer takes ownership of the site or rents it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseKind {
    Sale,
    Rent,
}

impl PurchaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Rent => "rent",
        }
    }
}

impl fmt::Display for PurchaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PurchaseKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(Self::Sale),
            "rent" => Ok(Self::Rent),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

/// Settlement status of an order.
///
/// `Pending` is the only non-terminal state:
///
/// ```text
/// pending ──► completed   (sale approved)
///         ├─► rented      (rent approved)
///         └─► rejected    (rejected / cancelled)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Completed,
    Rented,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Rented => "rented",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "rented" => Ok(Self::Rented),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

/// A stored string did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);
