use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "additional_costs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Costs go away with their item.
    #[sea_orm(indexed)]
    pub item_id: Uuid,
    #[sea_orm(belongs_to, from = "item_id", to = "id", on_delete = "Cascade")]
    pub item: HasOne<super::item::Entity>,

    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    pub date: DateTimeUtc,
    /// Free-text label: repair, shipping, parts...
    #[sea_orm(column_name = "type")]
    pub cost_type: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
