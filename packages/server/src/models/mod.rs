pub mod auth;
pub mod category;
pub mod cost;
pub mod item;
pub mod shared;
