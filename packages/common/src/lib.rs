pub mod auth;
pub mod category;
pub mod cost;
pub mod item;
pub mod item_status;
pub mod pagination;
pub mod patch;

pub use item_status::ItemStatus;
pub use pagination::Pagination;
