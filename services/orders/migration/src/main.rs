use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(sitemart_orders_migration::Migrator).await;
}
