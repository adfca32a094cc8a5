use serde::Deserialize;

use sitemart_core::config::Config;

use crate::infra::gateway::DEFAULT_BASE_URL;

/// Orders service configuration loaded from environment variables.
///
/// Each field reads the upper-case env var of the same name.
#[derive(Debug, Deserialize)]
pub struct OrdersConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret shared with the authentication service.
    pub jwt_secret: String,
    /// TCP port to listen on (default 3114).
    #[serde(default = "default_orders_port")]
    pub orders_port: u16,
    /// Access token of the Mercado Pago seller account.
    pub gateway_access_token: String,
    #[serde(default = "default_gateway_base_url")]
    pub gateway_base_url: String,
    #[serde(default = "default_gateway_timeout_secs")]
    pub gateway_timeout_secs: u64,
    /// Externally reachable base URL of this service, e.g. "https://api.example.com".
    /// Payment notifications are delivered to `{public_base_url}/webhook`.
    pub public_base_url: String,
    /// Reject checkouts whose amount differs from the catalog price (default true).
    #[serde(default = "default_enforce_catalog_price")]
    pub enforce_catalog_price: bool,
}

fn default_orders_port() -> u16 {
    3114
}

fn default_gateway_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_gateway_timeout_secs() -> u64 {
    10
}

fn default_enforce_catalog_price() -> bool {
    true
}

impl Config for OrdersConfig {}

impl OrdersConfig {
    pub fn notification_url(&self) -> String {
        format!("{}/webhook", self.public_base_url.trim_end_matches('/'))
    }
}
