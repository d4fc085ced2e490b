use common::item::{CreateItemRequest, ItemListQuery, ItemResponse, UpdateItemRequest};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition, ExprTrait, Order};
use uuid::Uuid;

use crate::entity::{additional_cost, category, item};
use crate::error::AppError;
use crate::models::shared::{escape_like, optional_money, optional_text, required_text};

pub const NAME_MAX: usize = 255;
pub const SHORT_TEXT_MAX: usize = 255;
pub const MAX_IMAGES: usize = 100;
pub const IMAGE_REF_MAX: usize = 2048;

const SORT_FIELDS: &str =
    "createdAt, updatedAt, name, brand, status, purchasePrice, purchaseDate, salePrice, saleDate";

pub fn validate_create_item(payload: &CreateItemRequest) -> Result<String, AppError> {
    let name = required_text(&payload.name, "Name", NAME_MAX)?;
    short_texts([
        ("Brand", payload.brand.as_deref()),
        ("Model", payload.model.as_deref()),
        ("Serial number", payload.serial_number.as_deref()),
        ("Condition", payload.condition.as_deref()),
        ("Purchase location", payload.purchase_location.as_deref()),
        ("Sale location", payload.sale_location.as_deref()),
    ])?;
    optional_money(payload.purchase_price, "Purchase price")?;
    optional_money(payload.sale_price, "Sale price")?;
    if let Some(images) = &payload.images {
        validate_images(images)?;
    }
    if let Some(metafields) = &payload.metafields {
        validate_metafields(metafields)?;
    }
    Ok(name)
}

pub fn validate_update_item(payload: &UpdateItemRequest) -> Result<(), AppError> {
    if let Some(name) = &payload.name {
        required_text(name, "Name", NAME_MAX)?;
    }
    short_texts([
        ("Brand", flatten(&payload.brand)),
        ("Model", flatten(&payload.model)),
        ("Serial number", flatten(&payload.serial_number)),
        ("Condition", flatten(&payload.condition)),
        ("Purchase location", flatten(&payload.purchase_location)),
        ("Sale location", flatten(&payload.sale_location)),
    ])?;
    optional_money(payload.purchase_price.flatten(), "Purchase price")?;
    optional_money(payload.sale_price.flatten(), "Sale price")?;
    if let Some(images) = &payload.images {
        validate_images(images)?;
    }
    if let Some(metafields) = &payload.metafields {
        validate_metafields(metafields)?;
    }
    Ok(())
}

fn flatten(value: &Option<Option<String>>) -> Option<&str> {
    value.as_ref().and_then(|v| v.as_deref())
}

fn short_texts<'a>(fields: impl IntoIterator<Item = (&'a str, Option<&'a str>)>) -> Result<(), AppError> {
    fields
        .into_iter()
        .try_for_each(|(field, value)| optional_text(value, field, SHORT_TEXT_MAX))
}

fn validate_images(images: &[String]) -> Result<(), AppError> {
    if images.len() > MAX_IMAGES {
        return Err(AppError::Validation(format!(
            "At most {MAX_IMAGES} images are allowed"
        )));
    }
    if images
        .iter()
        .any(|i| i.trim().is_empty() || i.len() > IMAGE_REF_MAX)
    {
        return Err(AppError::Validation(format!(
            "Image references must be 1-{IMAGE_REF_MAX} characters"
        )));
    }
    Ok(())
}

fn validate_metafields(metafields: &serde_json::Value) -> Result<(), AppError> {
    if !metafields.is_object() {
        return Err(AppError::Validation(
            "Metafields must be a JSON object".into(),
        ));
    }
    Ok(())
}

/// Map a `sortBy` value onto its column.
pub fn sort_column(sort_by: Option<&str>) -> Result<item::Column, AppError> {
    match sort_by.unwrap_or("createdAt") {
        "createdAt" => Ok(item::Column::CreatedAt),
        "updatedAt" => Ok(item::Column::UpdatedAt),
        "name" => Ok(item::Column::Name),
        "brand" => Ok(item::Column::Brand),
        "status" => Ok(item::Column::Status),
        "purchasePrice" => Ok(item::Column::PurchasePrice),
        "purchaseDate" => Ok(item::Column::PurchaseDate),
        "salePrice" => Ok(item::Column::SalePrice),
        "saleDate" => Ok(item::Column::SaleDate),
        _ => Err(AppError::Validation(format!(
            "sortBy must be one of: {SORT_FIELDS}"
        ))),
    }
}

/// `asc` in any case sorts ascending; everything else (including absence) descends.
pub fn sort_order(sort_order: Option<&str>) -> Order {
    match sort_order {
        Some(o) if o.eq_ignore_ascii_case("asc") => Order::Asc,
        _ => Order::Desc,
    }
}

/// Build the WHERE clause for an item listing, always scoped to `user_id`.
pub fn list_filter(user_id: Uuid, query: &ItemListQuery) -> Result<Condition, AppError> {
    let mut cond = Condition::all().add(item::Column::UserId.eq(user_id));

    if let Some(status) = query.status {
        cond = cond.add(item::Column::Status.eq(status));
    }
    if let Some(category_id) = query.category_id {
        cond = cond.add(item::Column::CategoryId.eq(category_id));
    }

    if let Some(search) = &query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            let pattern = format!("%{}%", term.to_lowercase());
            let any = [
                item::Column::Name,
                item::Column::Brand,
                item::Column::Model,
                item::Column::Description,
            ]
            .into_iter()
            .fold(Condition::any(), |any, col| {
                any.add(
                    Expr::expr(Func::lower(Expr::col(col)))
                        .like(LikeExpr::new(pattern.clone()).escape('\\')),
                )
            });
            cond = cond.add(any);
        }
    }

    if let (Some(min), Some(max)) = (query.min_price, query.max_price)
        && min > max
    {
        return Err(AppError::Validation(
            "minPrice must not exceed maxPrice".into(),
        ));
    }
    if let Some(min) = query.min_price {
        cond = cond.add(item::Column::PurchasePrice.gte(min));
    }
    if let Some(max) = query.max_price {
        cond = cond.add(item::Column::PurchasePrice.lte(max));
    }

    Ok(cond)
}

/// Assemble the response for an item with its joined category and costs.
pub fn to_response(
    item: item::Model,
    category: Option<category::Model>,
    costs: Vec<additional_cost::Model>,
) -> ItemResponse {
    ItemResponse {
        id: item.id,
        user_id: item.user_id,
        category_id: item.category_id,
        name: item.name,
        description: item.description,
        brand: item.brand,
        model: item.model,
        serial_number: item.serial_number,
        condition: item.condition,
        status: item.status,
        purchase_price: item.purchase_price,
        purchase_date: item.purchase_date,
        purchase_location: item.purchase_location,
        sale_price: item.sale_price,
        sale_date: item.sale_date,
        sale_location: item.sale_location,
        notes: item.notes,
        images: item.images,
        metafields: item.metafields,
        category: category.map(Into::into),
        additional_costs: costs.into_iter().map(Into::into).collect(),
        created_at: item.created_at,
        updated_at: item.updated_at,
    }
}
