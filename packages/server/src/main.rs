use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("server=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = server::database::init_db(&config.database, config.is_development())
        .await
        .context("Failed to initialize database")?;
    server::schema::ensure_schema_extras(&db)
        .await
        .context("Failed to ensure schema extras")?;
    info!("Database ready");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db: db.clone(),
        config,
    };
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, closing database pool");
    db.close().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
