//! Connection pool management

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Pool tuning on top of the URL and size from the application config
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::from(&pm_core::config::AppConfig::default().database)
    }
}

impl From<&pm_core::config::DatabaseConfig> for DatabaseConfig {
    fn from(config: &pm_core::config::DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.pool_size,
            min_connections: 1,
            acquire_timeout_secs: config.pool_timeout_seconds,
            idle_timeout_secs: 600,
        }
    }
}

impl DatabaseConfig {
    /// Apply `DB_*` tuning variables on top of `self`
    pub fn with_env_overrides(mut self) -> Self {
        self.max_connections = env_or("DB_MAX_CONNECTIONS", self.max_connections);
        self.min_connections = env_or("DB_MIN_CONNECTIONS", self.min_connections);
        self.acquire_timeout_secs = env_or("DB_ACQUIRE_TIMEOUT", self.acquire_timeout_secs);
        self.idle_timeout_secs = env_or("DB_IDLE_TIMEOUT", self.idle_timeout_secs);
        self
    }

    /// Defaults, `DATABASE_URL`, then the `DB_*` tuning variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.url = url;
        }
        config.with_env_overrides()
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
    }
}

fn env_or<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(fallback)
}

/// Shared handle to the PostgreSQL pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open the pool and wait for the first connection
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = config.pool_options().connect(&config.url).await?;
        tracing::info!(
            max_connections = config.max_connections,
            "Database pool created"
        );
        Ok(Self { pool })
    }

    /// Build the pool without connecting; connections are opened on first use
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = config.pool_options().connect_lazy(&config.url)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_app_config() {
        let app = pm_core::config::AppConfig::default();
        let config = DatabaseConfig::from(&app.database);
        assert_eq!(config.url, app.database.url);
        assert_eq!(config.max_connections, app.database.pool_size);
        assert_eq!(config.acquire_timeout_secs, app.database.pool_timeout_seconds);
    }

    #[test]
    fn test_env_or_unset_uses_fallback() {
        assert_eq!(env_or("PM_DB_TEST_UNSET_VARIABLE", 7u32), 7);
    }

    #[tokio::test]
    async fn test_connect_lazy_does_not_touch_the_network() {
        let config = DatabaseConfig {
            url: "postgres://nobody@127.0.0.1:1/none".into(),
            min_connections: 0,
            ..Default::default()
        };
        let db = Database::connect_lazy(&config).unwrap();
        assert_eq!(db.stats().size, 0);
    }
}
