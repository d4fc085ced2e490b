use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::DatabaseConfig;

/// Connect to the database and bring the schema in line with the entities.
///
/// SQL statements are logged only when `log_statements` is set.
pub async fn init_db(
    config: &DatabaseConfig,
    log_statements: bool,
) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.connection_url());

    opt.max_connections(config.pool.max_connections)
        .min_connections(config.pool.min_connections)
        .connect_timeout(Duration::from_secs(config.pool.acquire_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.pool.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.pool.idle_timeout_secs))
        .sqlx_logging(log_statements);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}
