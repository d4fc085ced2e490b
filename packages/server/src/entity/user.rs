use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Stored lower-cased.
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password: String,

    pub first_name: Option<String>,
    pub last_name: Option<String>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    #[sea_orm(has_many)]
    pub categories: HasMany<super::category::Entity>,
    #[sea_orm(has_many)]
    pub items: HasMany<super::item::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
