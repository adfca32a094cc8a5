use sea_orm::entity::prelude::*;

/// One purchase attempt and its settlement status.
///
/// `status` and `purchase_kind` hold the lowercase names of
/// `sitemart_domain::order::{OrderStatus, PurchaseKind}`; CHECK constraints
/// keep them inside the closed sets. `rent_expiry_date` is set if and only if
/// `status = 'rented'`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub site_id: i64,
    pub purchase_kind: String,
    pub status: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub transaction_amount: Decimal,
    pub gateway_reference: Option<String>,
    pub rent_expiry_date: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sites::Entity",
        from = "Column::SiteId",
        to = "super::sites::Column::Id"
    )]
    Site,
}

impl Related<super::sites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
