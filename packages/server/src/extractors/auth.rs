use axum::{extract::FromRequestParts, http::request::Parts};
use common::auth::UserResponse;
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::entity::user;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. The token is
/// verified and the user re-loaded on every request, so deactivating an
/// account takes effect immediately.
pub struct AuthUser {
    pub user_id: Uuid,
    pub user: UserResponse,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::TokenMissing)?;

        let claims =
            jwt::verify(token, &state.config.auth.jwt_secret).map_err(|_| AppError::TokenInvalid)?;

        let model = user::Entity::find_by_id(claims.sub)
            .one(&state.db)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::UserInactive)?;

        Ok(AuthUser {
            user_id: model.id,
            user: model.into(),
        })
    }
}
