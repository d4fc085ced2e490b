use std::path::Path;

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

use crate::utils::duration::parse_duration;

/// Environment variable that points at an alternative config file (without extension).
pub const CONFIG_PATH_ENV: &str = "GEAR_TRACKER_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `development` turns on SQL statement logging.
    pub environment: String,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the individual fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub pool: PoolConfig,
}

impl DatabaseConfig {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token lifetime such as `7d`, `12h`, `30m` or a bare number of seconds.
    pub jwt_expire: String,
    /// Argon2 time cost (iterations).
    pub password_hash_cost: u32,
}

impl AuthConfig {
    pub fn token_ttl(&self) -> chrono::Duration {
        parse_duration(&self.jwt_expire).unwrap_or_else(|_| chrono::Duration::days(7))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load from `config/config.toml` (or `$GEAR_TRACKER_CONFIG`) and
    /// `GEAR_TRACKER__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config/config".into());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let s = Self::defaults()?
            .add_source(File::from(path).required(false))
            // Override from environment (e.g., GEAR_TRACKER__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("GEAR_TRACKER").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.environment", "development")?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.name", "gear_tracker")?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "")?
            .set_default("database.pool.max_connections", 5)?
            .set_default("database.pool.min_connections", 0)?
            .set_default("database.pool.acquire_timeout_secs", 30)?
            .set_default("database.pool.idle_timeout_secs", 10)?
            .set_default("auth.jwt_expire", "7d")?
            .set_default("auth.password_hash_cost", 2)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("auth.jwt_secret must be set".into()));
        }
        parse_duration(&self.auth.jwt_expire)
            .map_err(|e| ConfigError::Message(format!("auth.jwt_expire: {e}")))?;
        if self.auth.password_hash_cost == 0 {
            return Err(ConfigError::Message(
                "auth.password_hash_cost must be at least 1".into(),
            ));
        }
        if self.database.pool.min_connections > self.database.pool.max_connections {
            return Err(ConfigError::Message(
                "database.pool.min_connections exceeds max_connections".into(),
            ));
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.server.environment.eq_ignore_ascii_case("development")
    }
}
