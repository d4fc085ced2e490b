#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ownership state of a tracked item.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Still in the owner's possession.
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "owned"))]
    Owned,
    /// Sold on; sale price/date/location describe the sale.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "sold"))]
    Sold,
}

impl ItemStatus {
    pub const ALL: &'static [ItemStatus] = &[Self::Owned, Self::Sold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owned => "owned",
            Self::Sold => "sold",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status '{invalid}'. Valid values: owned, sold")]
pub struct ParseStatusError {
    invalid: String,
}

impl FromStr for ItemStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owned" => Ok(Self::Owned),
            "sold" => Ok(Self::Sold),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
