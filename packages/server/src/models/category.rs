use common::category::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};

use crate::entity::category;
use crate::error::AppError;
use crate::models::shared::{optional_text, required_text};

pub const NAME_MAX: usize = 100;
pub const COLOR_MAX: usize = 32;

pub fn validate_create_category(payload: &CreateCategoryRequest) -> Result<String, AppError> {
    let name = required_text(&payload.name, "Name", NAME_MAX)?;
    optional_text(payload.color.as_deref(), "Color", COLOR_MAX)?;
    Ok(name)
}

pub fn validate_update_category(payload: &UpdateCategoryRequest) -> Result<(), AppError> {
    if let Some(name) = &payload.name {
        required_text(name, "Name", NAME_MAX)?;
    }
    if let Some(color) = &payload.color {
        optional_text(color.as_deref(), "Color", COLOR_MAX)?;
    }
    Ok(())
}

impl From<category::Model> for CategoryResponse {
    fn from(c: category::Model) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            name: c.name,
            description: c.description,
            color: c.color,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
