use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::category::{
    CategoryResponse, CreateCategoryRequest, DEFAULT_CATEGORY_COLOR, UpdateCategoryRequest,
};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::category;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::category::{validate_create_category, validate_update_category};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Categories",
    operation_id = "listCategories",
    summary = "List the caller's categories",
    description = "Returns every category owned by the caller, ordered by name.",
    responses(
        (status = 200, description = "Categories", body = Vec<CategoryResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_categories(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = category::Entity::find()
        .filter(category::Column::UserId.eq(auth_user.user_id))
        .order_by_asc(category::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Categories",
    operation_id = "getCategory",
    summary = "Get a category by ID",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id, id = %id))]
pub async fn get_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<CategoryResponse>, AppError> {
    let model = find_category(&state.db, auth_user.user_id, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a category",
    description = "Names are unique per user. Color defaults to `#3B82F6`.",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
        (status = 409, description = "Duplicate name (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, name = %payload.name))]
pub async fn create_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = validate_create_category(&payload)?;

    let now = chrono::Utc::now();
    let new_category = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(auth_user.user_id),
        name: Set(name),
        description: Set(payload.description),
        color: Set(Some(
            payload
                .color
                .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string()),
        )),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_category
        .insert(&state.db)
        .await
        .map_err(map_duplicate_name)?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Categories",
    operation_id = "updateCategory",
    summary = "Update a category",
    description = "Only `name`, `description` and `color` can change; `null` clears the nullable ones. An empty payload returns the category unchanged.",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate name (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, id = %id))]
pub async fn update_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    validate_update_category(&payload)?;

    if payload == UpdateCategoryRequest::default() {
        let existing = find_category(&state.db, auth_user.user_id, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;

    let existing = find_category(&txn, auth_user.user_id, id).await?;
    let mut active: category::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(color) = payload.color {
        active.color = Set(color);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await.map_err(map_duplicate_name)?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category",
    description = "Items in the category are kept and become uncategorized.",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, USER_INACTIVE)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id, id = %id))]
pub async fn delete_category(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = category::Entity::delete_many()
        .filter(category::Column::Id.eq(id))
        .filter(category::Column::UserId.eq(auth_user.user_id))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Category not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch a category owned by `user_id`; anything else is indistinguishable from absent.
pub(crate) async fn find_category<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    id: Uuid,
) -> Result<category::Model, AppError> {
    category::Entity::find_by_id(id)
        .filter(category::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))
}

fn map_duplicate_name(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Category with this name already exists".into())
        }
        _ => err.into(),
    }
}
