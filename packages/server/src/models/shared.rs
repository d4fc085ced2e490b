use rust_decimal::Decimal;

use crate::error::AppError;

pub use common::patch::double_option;

/// Largest value a NUMERIC(10,2) column holds: 99999999.99
/// (mantissa 9_999_999_999 = 2 * 2^32 + 1_410_065_407).
pub const MAX_MONEY: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Resolve `(page, limit)`: page is at least 1, limit defaults to 50 and is clamped to 1-100.
pub fn page_window(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    let page = Ord::max(page.unwrap_or(1), 1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

/// Trim a required text field and check its length (1-`max` Unicode characters).
pub fn required_text(value: &str, field: &str, max: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be 1-{max} characters"
        )));
    }
    Ok(value.to_string())
}

/// Check an optional text field against a maximum length.
pub fn optional_text(value: Option<&str>, field: &str, max: usize) -> Result<(), AppError> {
    if let Some(value) = value
        && value.chars().count() > max
    {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Check a monetary amount fits NUMERIC(10,2) and is not negative.
pub fn money(value: Decimal, field: &str) -> Result<(), AppError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::Validation(format!("{field} must be >= 0")));
    }
    if value > MAX_MONEY {
        return Err(AppError::Validation(format!(
            "{field} must be at most {MAX_MONEY}"
        )));
    }
    Ok(())
}

pub fn optional_money(value: Option<Decimal>, field: &str) -> Result<(), AppError> {
    value.map_or(Ok(()), |v| money(v, field))
}
