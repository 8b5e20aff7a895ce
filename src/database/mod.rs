//! # Database Operations
//!
//! SQLite persistence for run history and the MTTR aggregate cache, built on
//! SQLx.
//!
//! ## Key Components
//!
//! - [`connection`] - Pooled connection that migrates on connect
//! - [`migrations`] - Embedded, versioned schema migrations
//! - [`run_repository`] - Workflow and run upserts, run history reads
//! - [`mttr_cache_repository`] - Persisted [`MttrCacheStore`](crate::mttr::MttrCacheStore)
//! - [`metrics_queries`] - Metrics query layer producing raw metric sets
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workflow_health::clock::SystemClock;
//! use workflow_health::database::{DatabaseConnection, SqlMetricsQueries, SqliteMttrStore};
//! use workflow_health::models::MetricsSelection;
//! use workflow_health::services::MetricsSource;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = DatabaseConnection::in_memory().await?;
//! let store = Arc::new(SqliteMttrStore::new(db.pool().clone()));
//! let queries = SqlMetricsQueries::new(db.pool().clone(), store, Arc::new(SystemClock));
//!
//! let metrics = queries
//!     .raw_metrics(&MetricsSelection::repository("octo/app", 30))
//!     .await?;
//! println!("runs in window: {}", metrics.total_runs);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod connection;
pub mod metrics_queries;
pub mod migrations;
pub mod mttr_cache_repository;
pub mod run_repository;

pub use connection::DatabaseConnection;
pub use metrics_queries::{RunAggregates, SqlMetricsQueries};
pub use migrations::DatabaseMigrations;
pub use mttr_cache_repository::SqliteMttrStore;
pub use run_repository::RunRepository;
