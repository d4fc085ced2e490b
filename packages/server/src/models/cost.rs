use common::cost::{CostResponse, CreateCostRequest, UpdateCostRequest};

use crate::entity::additional_cost;
use crate::error::AppError;
use crate::models::shared::{money, optional_text, required_text};

pub const DESCRIPTION_MAX: usize = 255;
pub const TYPE_MAX: usize = 64;

pub fn validate_create_cost(payload: &CreateCostRequest) -> Result<String, AppError> {
    let description = required_text(&payload.description, "Description", DESCRIPTION_MAX)?;
    money(payload.amount, "Amount")?;
    optional_text(payload.cost_type.as_deref(), "Type", TYPE_MAX)?;
    Ok(description)
}

pub fn validate_update_cost(payload: &UpdateCostRequest) -> Result<(), AppError> {
    if let Some(description) = &payload.description {
        required_text(description, "Description", DESCRIPTION_MAX)?;
    }
    if let Some(amount) = payload.amount {
        money(amount, "Amount")?;
    }
    if let Some(cost_type) = &payload.cost_type {
        optional_text(cost_type.as_deref(), "Type", TYPE_MAX)?;
    }
    Ok(())
}

impl From<additional_cost::Model> for CostResponse {
    fn from(c: additional_cost::Model) -> Self {
        Self {
            id: c.id,
            item_id: c.item_id,
            description: c.description,
            amount: c.amount,
            date: c.date,
            cost_type: c.cost_type,
            notes: c.notes,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
