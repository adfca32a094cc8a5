use sea_orm_migration::prelude::*;

mod m20250601_000001_create_sites;
mod m20250601_000002_create_orders;
mod m20250601_000003_add_order_indexes;
mod m20250601_000004_create_comments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_sites::Migration),
            Box::new(m20250601_000002_create_orders::Migration),
            Box::new(m20250601_000003_add_order_indexes::Migration),
            Box::new(m20250601_000004_create_comments::Migration),
        ]
    }
}
