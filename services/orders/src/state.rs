use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use sitemart_auth_types::principal::JwtSecret;

use crate::infra::db::{DbCatalog, DbOrderRepository, DbReviewRepository};
use crate::infra::gateway::MercadoPagoGateway;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub gateway: MercadoPagoGateway,
    pub jwt_secret: JwtSecret,
    /// Where the gateway delivers payment notifications for this deployment.
    pub notification_url: String,
    pub enforce_catalog_price: bool,
}

impl AppState {
    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn catalog(&self) -> DbCatalog {
        DbCatalog {
            db: self.db.clone(),
        }
    }

    pub fn review_repo(&self) -> DbReviewRepository {
        DbReviewRepository {
            db: self.db.clone(),
        }
    }

    pub fn gateway(&self) -> MercadoPagoGateway {
        self.gateway.clone()
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}
