use serde::{Deserialize, Deserializer};

/// Serde helper for partial updates on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
///
/// Pair with `#[serde(default, skip_serializing_if = "Option::is_none")]` so
/// the same struct serializes back to the shape it was parsed from.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}
