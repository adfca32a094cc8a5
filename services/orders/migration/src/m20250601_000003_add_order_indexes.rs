use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .col(Orders::CreatedAt)
                    .name("idx_orders_user_id_created_at")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Orders::Table)
                    .col(Orders::GatewayReference)
                    .name("idx_orders_gateway_reference")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_orders_gateway_reference").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_orders_user_id_created_at").to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    UserId,
    CreatedAt,
    GatewayReference,
}
