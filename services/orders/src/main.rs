use std::time::Duration;

use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use sitemart_auth_types::principal::JwtSecret;
use sitemart_core::config::Config;
use sitemart_core::tracing::init_tracing;
use sitemart_orders::config::OrdersConfig;
use sitemart_orders::infra::gateway::MercadoPagoGateway;
use sitemart_orders::router::build_router;
use sitemart_orders::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = OrdersConfig::from_env().context("load orders config")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    let gateway = MercadoPagoGateway::new(
        &config.gateway_base_url,
        &config.gateway_access_token,
        Duration::from_secs(config.gateway_timeout_secs),
    )?;

    let notification_url = config.notification_url();
    info!(%notification_url, enforce_catalog_price = config.enforce_catalog_price, "orders config loaded");

    let state = AppState {
        db,
        gateway,
        jwt_secret: JwtSecret(config.jwt_secret),
        notification_url,
        enforce_catalog_price: config.enforce_catalog_price,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.orders_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("orders service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
