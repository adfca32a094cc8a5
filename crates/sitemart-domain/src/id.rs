//! Newtype wrappers for domain identifiers.
//!
//! Every persisted entity uses an auto-incremented `BIGINT` key. The newtypes
//! keep a product id from being passed where an order id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id!(
    /// Identifies a user account owned by the authentication collaborator.
    UserId
);

numeric_id!(
    /// Identifies a catalog product (a pre-built site offered for sale or rent).
    ProductId
);

numeric_id!(
    /// Identifies an order. Also serves as the correlation key sent to the
    /// payment gateway and echoed back in notifications.
    OrderId
);

numeric_id!(
    /// Identifies a buyer's review of a site.
    ReviewId
);
