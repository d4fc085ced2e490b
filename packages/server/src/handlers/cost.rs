use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::cost::{CostResponse, CreateCostRequest, UpdateCostRequest};
use sea_orm::sea_query::{Query as SeaQuery, SelectStatement};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{additional_cost, item};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::handlers::item::{find_item, find_item_for_update};
use crate::models::cost::{validate_create_cost, validate_update_cost};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/item/{item_id}",
    tag = "Additional Costs",
    operation_id = "listCostsForItem",
    summary = "List the additional costs of an item",
    description = "Newest first. The item must belong to the caller.",
    params(("item_id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Costs", body = Vec<CostResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id, item_id = %item_id))]
pub async fn list_costs_for_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(item_id): AppPath<Uuid>,
) -> Result<Json<Vec<CostResponse>>, AppError> {
    find_item(&state.db, auth_user.user_id, item_id).await?;

    let costs = additional_cost::Entity::find()
        .filter(additional_cost::Column::ItemId.eq(item_id))
        .order_by_desc(additional_cost::Column::Date)
        .all(&state.db)
        .await?;

    Ok(Json(costs.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Additional Costs",
    operation_id = "createCost",
    summary = "Attach a cost to an item",
    description = "The parent item is locked while the cost is inserted, so a concurrent item delete either happens first (404) or waits.",
    request_body = CreateCostRequest,
    responses(
        (status = 201, description = "Cost created", body = CostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, item_id = %payload.item_id))]
pub async fn create_cost(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let description = validate_create_cost(&payload)?;

    let txn = state.db.begin().await?;
    find_item_for_update(&txn, auth_user.user_id, payload.item_id).await?;

    let now = chrono::Utc::now();
    let new_cost = additional_cost::ActiveModel {
        id: Set(Uuid::new_v4()),
        item_id: Set(payload.item_id),
        description: Set(description),
        amount: Set(payload.amount),
        date: Set(payload.date.unwrap_or(now)),
        cost_type: Set(payload.cost_type),
        notes: Set(payload.notes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_cost.insert(&txn).await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(CostResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Additional Costs",
    operation_id = "updateCost",
    summary = "Update an additional cost",
    description = "Allow-list: description, amount, date, type, notes. A cost cannot be moved to another item.",
    params(("id" = Uuid, Path, description = "Cost ID")),
    request_body = UpdateCostRequest,
    responses(
        (status = 200, description = "Cost updated", body = CostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
        (status = 404, description = "Cost not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, id = %id))]
pub async fn update_cost(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateCostRequest>,
) -> Result<Json<CostResponse>, AppError> {
    validate_update_cost(&payload)?;

    if payload == UpdateCostRequest::default() {
        let existing = find_cost(&state.db, auth_user.user_id, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;

    let existing = find_cost(&txn, auth_user.user_id, id).await?;
    let mut active: additional_cost::ActiveModel = existing.into();

    if let Some(ref description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(amount) = payload.amount {
        active.amount = Set(amount);
    }
    if let Some(date) = payload.date {
        active.date = Set(date);
    }
    if let Some(cost_type) = payload.cost_type {
        active.cost_type = Set(cost_type);
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(notes);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Additional Costs",
    operation_id = "deleteCost",
    summary = "Delete an additional cost",
    params(("id" = Uuid, Path, description = "Cost ID")),
    responses(
        (status = 204, description = "Cost deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
        (status = 404, description = "Cost not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id, id = %id))]
pub async fn delete_cost(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = additional_cost::Entity::delete_many()
        .filter(additional_cost::Column::Id.eq(id))
        .filter(additional_cost::Column::ItemId.in_subquery(owned_item_ids(auth_user.user_id)))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Cost not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `SELECT id FROM items WHERE user_id = ?`
fn owned_item_ids(user_id: Uuid) -> SelectStatement {
    SeaQuery::select()
        .column(item::Column::Id)
        .from(item::Entity)
        .and_where(item::Column::UserId.eq(user_id))
        .to_owned()
}

/// Fetch a cost whose parent item belongs to `user_id`.
async fn find_cost<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    id: Uuid,
) -> Result<additional_cost::Model, AppError> {
    additional_cost::Entity::find_by_id(id)
        .filter(additional_cost::Column::ItemId.in_subquery(owned_item_ids(user_id)))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Cost not found".into()))
}
