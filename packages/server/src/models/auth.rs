use common::auth::{LoginRequest, RegisterRequest, UserResponse};

use crate::entity::user;
use crate::error::AppError;
use crate::models::shared::optional_text;

/// Lower-case and trim an email, rejecting anything that isn't `local@domain.tld`.
pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    let invalid = || AppError::Validation("Please provide a valid email".into());

    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(email)
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    normalize_email(&payload.email)?;

    let username = payload.username.trim();
    let len = username.chars().count();
    if !(3..=32).contains(&len) {
        return Err(AppError::Validation(
            "Username must be 3-32 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(AppError::Validation(
            "Username may only contain letters, digits, '_', '-' and '.'".into(),
        ));
    }
    if payload.password.len() < 6 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 6-128 characters".into(),
        ));
    }
    optional_text(payload.first_name.as_deref(), "First name", 100)?;
    optional_text(payload.last_name.as_deref(), "Last name", 100)?;
    Ok(())
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    normalize_email(&payload.email)?;
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }
    Ok(())
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
