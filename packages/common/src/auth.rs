use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for user registration.
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Account email; stored lower-cased.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Password (6-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    /// Unique username (3-32 chars: letters, digits, `_`, `-`, `.`).
    #[schema(example = "alice")]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Request body for user login.
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

/// Public projection of a user. Never carries the password hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "alice")]
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returned by register and login.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    /// Bearer token for the `Authorization` header.
    pub token: String,
}
