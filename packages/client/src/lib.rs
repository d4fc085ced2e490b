//! Client-side state for the gear tracker API.
//!
//! [`ApiClient`] talks HTTP; the stores in [`stores`] mirror server resources
//! into `tokio::sync::watch` channels so a UI can subscribe to changes.

pub mod api;
pub mod error;
pub mod router;
pub mod storage;
pub mod stores;

pub use api::ApiClient;
pub use error::{ClientError, Result};
