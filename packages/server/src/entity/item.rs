use common::ItemStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(indexed)]
    pub user_id: Uuid,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,

    /// Cleared when the category is deleted.
    #[sea_orm(indexed)]
    pub category_id: Option<Uuid>,
    #[sea_orm(belongs_to, from = "category_id", to = "id", on_delete = "SetNull")]
    pub category: HasOne<super::category::Entity>,

    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub condition: Option<String>,
    pub status: ItemStatus,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<DateTimeUtc>,
    pub purchase_location: Option<String>,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub sale_price: Option<Decimal>,
    pub sale_date: Option<DateTimeUtc>,
    pub sale_location: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    /// Ordered image references.
    pub images: Vec<String>,
    /// Always a JSON object.
    #[sea_orm(column_type = "JsonBinary")]
    pub metafields: serde_json::Value,

    #[sea_orm(has_many)]
    pub additional_costs: HasMany<super::additional_cost::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
