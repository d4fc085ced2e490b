use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::item::{
    CreateItemRequest, ItemListQuery, ItemListResponse, ItemResponse, ItemStatsResponse,
    StatusSummary, UpdateItemRequest,
};
use common::{ItemStatus, Pagination};
use rust_decimal::Decimal;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{additional_cost, category, item};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::extractors::query::AppQuery;
use crate::models::item::{
    list_filter, sort_column, sort_order, to_response, validate_create_item, validate_update_item,
};
use crate::models::shared::page_window;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Items",
    operation_id = "listItems",
    summary = "List the caller's items with filters and pagination",
    description = "Filters combine with AND; `search` matches name, brand, model or description case-insensitively. Each item carries its category and additional costs.",
    params(ItemListQuery),
    responses(
        (status = 200, description = "Page of items", body = ItemListResponse),
        (status = 400, description = "Invalid filter or sort (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = %auth_user.user_id))]
pub async fn list_items(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ItemListQuery>,
) -> Result<Json<ItemListResponse>, AppError> {
    let (page, limit) = page_window(query.page, query.limit);
    let sort_column = sort_column(query.sort_by.as_deref())?;
    let sort_order = sort_order(query.sort_order.as_deref());

    let select = item::Entity::find().filter(list_filter(auth_user.user_id, &query)?);

    let total = select.clone().paginate(&state.db, limit).num_items().await?;

    let models = select
        .order_by(sort_column, sort_order)
        .order_by_asc(item::Column::Id)
        .offset(Some((page - 1) * limit))
        .limit(Some(limit))
        .all(&state.db)
        .await?;

    Ok(Json(ItemListResponse {
        items: with_relations(&state.db, models).await?,
        pagination: Pagination::new(total, page, limit),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Items",
    operation_id = "getItem",
    summary = "Get an item by ID",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item with category and costs", body = ItemResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id, id = %id))]
pub async fn get_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ItemResponse>, AppError> {
    let model = find_item(&state.db, auth_user.user_id, id).await?;
    Ok(Json(with_relations_one(&state.db, model).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Items",
    operation_id = "createItem",
    summary = "Create an item",
    description = "The owner is always the caller; any `userId` in the body is ignored. `categoryId` must reference one of the caller's categories.",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = validate_create_item(&payload)?;

    let category = match payload.category_id {
        Some(category_id) => Some(owned_category(&state.db, auth_user.user_id, category_id).await?),
        None => None,
    };

    let now = chrono::Utc::now();
    let new_item = item::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(auth_user.user_id),
        category_id: Set(payload.category_id),
        name: Set(name),
        description: Set(payload.description),
        brand: Set(payload.brand),
        model: Set(payload.model),
        serial_number: Set(payload.serial_number),
        condition: Set(payload.condition),
        status: Set(payload.status.unwrap_or_default()),
        purchase_price: Set(payload.purchase_price),
        purchase_date: Set(payload.purchase_date),
        purchase_location: Set(payload.purchase_location),
        sale_price: Set(payload.sale_price),
        sale_date: Set(payload.sale_date),
        sale_location: Set(payload.sale_location),
        notes: Set(payload.notes),
        images: Set(payload.images.unwrap_or_default()),
        metafields: Set(payload
            .metafields
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()))),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_item.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(to_response(model, category, Vec::new()))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Items",
    operation_id = "updateItem",
    summary = "Update an item",
    description = "Partial update over an allow-list of item fields; `null` clears nullable fields. The owner cannot be changed.",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, id = %id))]
pub async fn update_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, AppError> {
    validate_update_item(&payload)?;

    if payload == UpdateItemRequest::default() {
        let existing = find_item(&state.db, auth_user.user_id, id).await?;
        return Ok(Json(with_relations_one(&state.db, existing).await?));
    }

    let txn = state.db.begin().await?;

    let existing = find_item(&txn, auth_user.user_id, id).await?;
    if let Some(Some(category_id)) = payload.category_id {
        owned_category(&txn, auth_user.user_id, category_id).await?;
    }

    let mut active: item::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(brand);
    }
    if let Some(model) = payload.model {
        active.model = Set(model);
    }
    if let Some(serial_number) = payload.serial_number {
        active.serial_number = Set(serial_number);
    }
    if let Some(condition) = payload.condition {
        active.condition = Set(condition);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(purchase_price) = payload.purchase_price {
        active.purchase_price = Set(purchase_price);
    }
    if let Some(purchase_date) = payload.purchase_date {
        active.purchase_date = Set(purchase_date);
    }
    if let Some(purchase_location) = payload.purchase_location {
        active.purchase_location = Set(purchase_location);
    }
    if let Some(sale_price) = payload.sale_price {
        active.sale_price = Set(sale_price);
    }
    if let Some(sale_date) = payload.sale_date {
        active.sale_date = Set(sale_date);
    }
    if let Some(sale_location) = payload.sale_location {
        active.sale_location = Set(sale_location);
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(notes);
    }
    if let Some(images) = payload.images {
        active.images = Set(images);
    }
    if let Some(metafields) = payload.metafields {
        active.metafields = Set(metafields);
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(category_id);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    let response = with_relations_one(&txn, model).await?;
    txn.commit().await?;

    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Items",
    operation_id = "deleteItem",
    summary = "Delete an item",
    description = "Permanently deletes the item; its additional costs are removed with it.",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id, id = %id))]
pub async fn delete_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = item::Entity::delete_many()
        .filter(item::Column::Id.eq(id))
        .filter(item::Column::UserId.eq(auth_user.user_id))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Item not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/stats/summary",
    tag = "Items",
    operation_id = "getItemStats",
    summary = "Aggregate statistics over the caller's items",
    description = "Per-status item counts and price totals, plus the sum of all additional costs. Totals are `0` when there is nothing to sum.",
    responses(
        (status = 200, description = "Statistics", body = ItemStatsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn item_stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ItemStatsResponse>, AppError> {
    let rows: Vec<(String, i64, Option<Decimal>, Option<Decimal>)> = item::Entity::find()
        .filter(item::Column::UserId.eq(auth_user.user_id))
        .select_only()
        .column(item::Column::Status)
        .column_as(item::Column::Id.count(), "count")
        .column_as(item::Column::PurchasePrice.sum(), "total_purchase_price")
        .column_as(item::Column::SalePrice.sum(), "total_sale_price")
        .group_by(item::Column::Status)
        .order_by_asc(item::Column::Status)
        .into_tuple()
        .all(&state.db)
        .await?;

    let stats = rows
        .into_iter()
        .map(|(status, count, purchase, sale)| {
            let status: ItemStatus = status
                .parse()
                .map_err(|e| AppError::Internal(format!("Unexpected item status: {e}")))?;
            Ok(StatusSummary {
                status,
                count: Ord::max(count, 0) as u64,
                total_purchase_price: purchase.unwrap_or(Decimal::ZERO),
                total_sale_price: sale.unwrap_or(Decimal::ZERO),
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let total_additional_costs = additional_cost::Entity::find()
        .filter(
            additional_cost::Column::ItemId.in_subquery(
                SeaQuery::select()
                    .column(item::Column::Id)
                    .from(item::Entity)
                    .and_where(item::Column::UserId.eq(auth_user.user_id))
                    .to_owned(),
            ),
        )
        .select_only()
        .column_as(additional_cost::Column::Amount.sum(), "total")
        .into_tuple::<Option<Decimal>>()
        .one(&state.db)
        .await?
        .flatten()
        .unwrap_or(Decimal::ZERO);

    Ok(Json(ItemStatsResponse {
        stats,
        total_additional_costs,
    }))
}

/// Fetch an item owned by `user_id`; anything else is indistinguishable from absent.
pub(crate) async fn find_item<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    id: Uuid,
) -> Result<item::Model, AppError> {
    item::Entity::find_by_id(id)
        .filter(item::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".into()))
}

/// Like [`find_item`], but holds a row lock until the transaction ends.
pub(crate) async fn find_item_for_update(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    id: Uuid,
) -> Result<item::Model, AppError> {
    use sea_orm::sea_query::LockType;
    item::Entity::find_by_id(id)
        .filter(item::Column::UserId.eq(user_id))
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".into()))
}

/// A category referenced from an item body must belong to the caller.
async fn owned_category<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    category_id: Uuid,
) -> Result<category::Model, AppError> {
    category::Entity::find_by_id(category_id)
        .filter(category::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::Validation("categoryId does not reference one of your categories".into()))
}

async fn with_relations_one<C: ConnectionTrait>(
    db: &C,
    model: item::Model,
) -> Result<ItemResponse, AppError> {
    let mut items = with_relations(db, vec![model]).await?;
    items
        .pop()
        .ok_or_else(|| AppError::Internal("Item vanished while loading relations".into()))
}

/// Join categories and costs onto a page of items with one query each.
async fn with_relations<C: ConnectionTrait>(
    db: &C,
    models: Vec<item::Model>,
) -> Result<Vec<ItemResponse>, AppError> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let category_ids: Vec<Uuid> = models.iter().filter_map(|m| m.category_id).collect();
    let categories: HashMap<Uuid, category::Model> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        category::Entity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
    };

    let item_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut costs: HashMap<Uuid, Vec<additional_cost::Model>> = HashMap::new();
    for cost in additional_cost::Entity::find()
        .filter(additional_cost::Column::ItemId.is_in(item_ids))
        .order_by_desc(additional_cost::Column::Date)
        .all(db)
        .await?
    {
        costs.entry(cost.item_id).or_default().push(cost);
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let category = m.category_id.and_then(|id| categories.get(&id).cloned());
            let item_costs = costs.remove(&m.id).unwrap_or_default();
            to_response(m, category, item_costs)
        })
        .collect())
}
