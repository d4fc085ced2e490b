use chrono::Utc;
use common::auth::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::entity::user;
use crate::error::AppError;
use crate::models::auth::{normalize_email, validate_login_request, validate_register_request};
use crate::utils::{hash, jwt};

/// Registration, login and current-user lookup.
pub struct AuthService<'a, C: ConnectionTrait> {
    conn: &'a C,
    config: &'a AuthConfig,
}

impl<'a, C: ConnectionTrait> AuthService<'a, C> {
    pub fn new(conn: &'a C, config: &'a AuthConfig) -> Self {
        Self { conn, config }
    }

    /// Create an account and return it together with a fresh token.
    pub async fn register(&self, payload: RegisterRequest) -> Result<AuthResponse, AppError> {
        validate_register_request(&payload)?;

        let email = normalize_email(&payload.email)?;
        let username = payload.username.trim().to_string();

        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }
        let username_taken = user::Entity::find()
            .filter(user::Column::Username.eq(&username))
            .one(self.conn)
            .await?
            .is_some();
        if username_taken {
            return Err(AppError::UsernameTaken);
        }

        let password_hash = self.hash(payload.password).await?;

        let now = Utc::now();
        let new_user = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            username: Set(username),
            password: Set(password_hash),
            first_name: Set(trimmed(payload.first_name)),
            last_name: Set(trimmed(payload.last_name)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = new_user.insert(self.conn).await.map_err(map_unique_violation)?;
        info!(user_id = %model.id, "User registered");

        self.issue(model)
    }

    /// Exchange credentials for a token.
    ///
    /// Unknown email, inactive account and wrong password are reported identically.
    pub async fn login(&self, payload: LoginRequest) -> Result<AuthResponse, AppError> {
        validate_login_request(&payload)?;
        let email = normalize_email(&payload.email)?;

        let Some(model) = self.find_by_email(&email).await? else {
            return Err(AppError::InvalidCredentials);
        };
        if !model.is_active {
            warn!(user_id = %model.id, "Login attempt on inactive account");
            return Err(AppError::InvalidCredentials);
        }

        let password = payload.password;
        let stored = model.password.clone();
        let matches = tokio::task::spawn_blocking(move || hash::verify_password(&password, &stored))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {e}")))?;
        if !matches {
            return Err(AppError::InvalidCredentials);
        }

        self.issue(model)
    }

    /// Look up the public profile of `user_id`.
    pub async fn current_user(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        user::Entity::find_by_id(user_id)
            .one(self.conn)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn)
            .await
    }

    async fn hash(&self, password: String) -> Result<String, AppError> {
        let cost = self.config.password_hash_cost;
        tokio::task::spawn_blocking(move || hash::hash_password(&password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {e}")))?
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
    }

    fn issue(&self, model: user::Model) -> Result<AuthResponse, AppError> {
        let token = jwt::sign(model.id, &self.config.jwt_secret, self.config.token_ttl())
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))?;
        Ok(AuthResponse {
            user: model.into(),
            token,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A concurrent registration can slip past the existence checks; the unique
/// indexes still reject it.
fn map_unique_violation(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            if detail.contains("email") {
                AppError::EmailTaken
            } else if detail.contains("username") {
                AppError::UsernameTaken
            } else {
                AppError::Conflict("User already exists".into())
            }
        }
        _ => err.into(),
    }
}
