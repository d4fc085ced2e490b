pub mod additional_cost;
pub mod category;
pub mod item;
pub mod user;
