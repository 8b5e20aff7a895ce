use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

use super::migrations::DatabaseMigrations;
use crate::config::DatabaseConfig;
use crate::error::{HealthError, Result};

/// Pooled SQLite connection with the schema migrated
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    /// Open (creating if needed) the configured database and apply migrations
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout());

        let in_memory = config.url.contains(":memory:") || config.url.contains("mode=memory");

        if !in_memory {
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        HealthError::Storage(format!(
                            "cannot create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
        }

        // Every pooled connection to `:memory:` would get its own empty database
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        let applied = DatabaseMigrations::run_all(&pool).await?;

        info!(in_memory, migrations_applied = applied, "Database connection established");

        Ok(Self { pool })
    }

    /// Private in-memory database, for tests and dry runs
    pub async fn in_memory() -> Result<Self> {
        Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..DatabaseConfig::default()
        })
        .await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<bool> {
        let row = sqlx::query("SELECT 1 AS health")
            .fetch_one(&self.pool)
            .await?;

        let health: i64 = row.try_get("health")?;
        debug!(healthy = health == 1, "Database health check");
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
