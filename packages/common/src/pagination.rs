use serde::{Deserialize, Serialize};

/// Pagination metadata included in list responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total number of matching rows across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Page size.
    #[schema(example = 50)]
    pub limit: u64,
    /// `ceil(total / limit)`.
    #[schema(example = 1)]
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}
