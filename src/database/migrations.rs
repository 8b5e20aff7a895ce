//! # Database Migration System
//!
//! Versioned schema migrations embedded in the binary at compile time.
//!
//! ## Migration Discovery
//!
//! Migrations live in the `migrations/` directory using a timestamp-based
//! naming convention, `YYYYMMDDHHMMSS_description.sql`, and are listed in
//! [`EMBEDDED_MIGRATIONS`] in version order. Each one runs in its own
//! transaction together with its `schema_migrations` record, so a failed
//! migration leaves no partial schema behind and running the set again is
//! a no-op.

use sqlx::{Row, SqlitePool};
use std::collections::HashSet;
use tracing::info;

use crate::error::Result;

/// A single embedded migration
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Version timestamp (YYYYMMDDHHMMSS format)
    pub version: &'static str,
    /// Human-readable migration name
    pub name: &'static str,
    pub sql: &'static str,
}

pub const EMBEDDED_MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20240601000000",
        name: "create runs",
        sql: include_str!("../../migrations/20240601000000_create_runs.sql"),
    },
    Migration {
        version: "20240601000100",
        name: "create mttr cache",
        sql: include_str!("../../migrations/20240601000100_create_mttr_cache.sql"),
    },
];

pub struct DatabaseMigrations;

impl DatabaseMigrations {
    /// Apply every outstanding migration in order; returns how many ran
    pub async fn run_all(pool: &SqlitePool) -> Result<usize> {
        Self::ensure_migration_table(pool).await?;
        Self::run_outstanding_migrations(pool).await
    }

    async fn run_outstanding_migrations(pool: &SqlitePool) -> Result<usize> {
        let applied_migrations = Self::get_applied_migrations(pool).await?;
        let mut applied = 0;

        for migration in EMBEDDED_MIGRATIONS {
            if applied_migrations.contains(migration.version) {
                continue;
            }

            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );

            let mut tx = pool.begin().await?;
            sqlx::raw_sql(migration.sql).execute(&mut *tx).await?;
            sqlx::query("INSERT INTO schema_migrations (version, name) VALUES (?, ?)")
                .bind(migration.version)
                .bind(migration.name)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            applied += 1;
        }

        Ok(applied)
    }

    /// Ensure migration tracking table exists
    async fn ensure_migration_table(pool: &SqlitePool) -> Result<()> {
        sqlx::raw_sql(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
            )
        "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get list of applied migration versions
    pub async fn get_applied_migrations(pool: &SqlitePool) -> Result<HashSet<String>> {
        let rows = sqlx::query("SELECT version FROM schema_migrations")
            .fetch_all(pool)
            .await?;

        rows.into_iter()
            .map(|row| row.try_get::<String, _>("version").map_err(Into::into))
            .collect()
    }
}
