use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

/// Shared handler state. Built once in `main`; the connection pool inside
/// `db` is closed after the server shuts down.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
}
