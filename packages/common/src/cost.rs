use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::patch::double_option;

/// An expense attached to an item after purchase (repair, shipping, parts...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostResponse {
    pub id: Uuid,
    pub item_id: Uuid,
    #[schema(example = "Sensor cleaning")]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(example = 49.99)]
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    /// Free-text label such as `repair` or `shipping`.
    #[serde(rename = "type")]
    #[schema(example = "repair")]
    pub cost_type: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for attaching a cost to an item.
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCostRequest {
    pub item_id: Uuid,
    #[schema(example = "Sensor cleaning")]
    pub description: String,
    /// Non-negative; accepts a JSON number or numeric string.
    #[schema(value_type = f64, example = 49.99)]
    pub amount: Decimal,
    /// Defaults to the time of creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub cost_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update of a cost. The owning item cannot be changed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateCostRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub cost_type: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}
