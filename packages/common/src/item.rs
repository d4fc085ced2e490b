use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::CategoryResponse;
use crate::cost::CostResponse;
use crate::item_status::ItemStatus;
use crate::pagination::Pagination;
use crate::patch::double_option;

/// An item with its category and additional costs joined in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    #[schema(example = "Canon EOS R6")]
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub condition: Option<String>,
    pub status: ItemStatus,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(example = 1899.0)]
    pub purchase_price: Option<Decimal>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub purchase_location: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub sale_price: Option<Decimal>,
    pub sale_date: Option<DateTime<Utc>>,
    pub sale_location: Option<String>,
    pub notes: Option<String>,
    /// Ordered image references (URLs or paths).
    pub images: Vec<String>,
    /// Open-ended key/value metadata.
    #[schema(value_type = Object)]
    pub metafields: serde_json::Value,
    pub category: Option<CategoryResponse>,
    pub additional_costs: Vec<CostResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating an item. The owner is always the caller.
#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[schema(example = "Canon EOS R6")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Defaults to `owned`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub purchase_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub sale_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// Must be a JSON object when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub metafields: Option<serde_json::Value>,
    /// Must reference one of the caller's categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
}

/// Partial update of an item. `null` clears a nullable field.
///
/// Fields outside this allow-list (such as `userId`) are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub brand: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub model: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub serial_number: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub condition: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub purchase_price: Option<Option<Decimal>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub purchase_date: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub purchase_location: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub sale_price: Option<Option<Decimal>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub sale_date: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub sale_location: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub metafields: Option<serde_json::Value>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<Uuid>)]
    pub category_id: Option<Option<Uuid>>,
}

/// Query parameters for listing items.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ItemListQuery {
    /// Exact status match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    /// Exact category match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    /// Case-insensitive substring over name, brand, model and description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Inclusive lower bound on purchase price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[param(value_type = Option<f64>)]
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound on purchase price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[param(value_type = Option<f64>)]
    pub max_price: Option<Decimal>,
    /// One of: createdAt (default), updatedAt, name, brand, status,
    /// purchasePrice, purchaseDate, salePrice, saleDate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default), case-insensitive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    /// Page number (1-based, default 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// Page size (1-100, default 50).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ItemListResponse {
    pub items: Vec<ItemResponse>,
    pub pagination: Pagination,
}

/// Per-status aggregate over the caller's items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub status: ItemStatus,
    pub count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_purchase_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sale_price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatsResponse {
    pub stats: Vec<StatusSummary>,
    /// Sum of every additional cost across the caller's items; `0` when none.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_additional_costs: Decimal,
}
