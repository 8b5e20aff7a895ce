#![allow(clippy::doc_markdown)] // Allow technical terms like SQLite, SQLx, MTTR in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Workflow Health
//!
//! Reliability metrics, health scoring and caching core for CI/CD workflow
//! run history.
//!
//! ## Overview
//!
//! Run records for each workflow are stored in SQLite. From them the crate
//! derives a set of raw reliability metrics over a rolling window: success
//! rate, mean time to recovery (MTTR), average duration and throughput.
//! These are combined into a single 0-100 health score with a health class,
//! a per-metric breakdown and a data-quality tier.
//!
//! ## Architecture
//!
//! ```text
//! runs (SQLite) --> MttrRefresher (background) --> mttr_cache
//!        |                                              |
//!        +---------> SqlMetricsQueries <----------------+
//!                           |
//!                    MetricsReadCache (TTL)
//!                           |
//!                  HealthScoreCalculator --> HealthReport
//! ```
//!
//! MTTR is expensive to compute, so it is never computed on a request path.
//! The refresher recomputes it on an interval and readers take whatever the
//! last complete refresh produced.
//!
//! ## Module Organization
//!
//! - [`scoring`] - Quality classifier, score functions and the calculator
//! - [`mttr`] - MTTR computation, aggregate cache store and background refresher
//! - [`cache`] - TTL read cache for computed reports
//! - [`database`] - SQLite connection, migrations, repositories and the metrics query layer
//! - [`services`] - Request-path orchestration producing health reports
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - Structured logging setup and helpers
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workflow_health::clock::SystemClock;
//! use workflow_health::config::HealthConfig;
//! use workflow_health::database::{DatabaseConnection, SqlMetricsQueries, SqliteMttrStore};
//! use workflow_health::models::MetricsSelection;
//! use workflow_health::services::HealthScoreService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HealthConfig::for_development();
//! let db = DatabaseConnection::connect(&config.database).await?;
//! let clock = Arc::new(SystemClock);
//! let store = Arc::new(SqliteMttrStore::new(db.pool().clone()));
//! let queries = Arc::new(SqlMetricsQueries::new(db.pool().clone(), store, clock.clone()));
//!
//! let service = HealthScoreService::new(&config, queries, clock)?;
//! let report = service
//!     .health_report(&MetricsSelection::repository("octo/app", 30))
//!     .await;
//! println!(
//!     "{}: {} ({})",
//!     report.selection,
//!     report.result.overall_score,
//!     report.result.health_class
//! );
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod mttr;
pub mod scoring;
pub mod services;
pub mod utils;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigManager, HealthConfig, ScoringConfig};
pub use constants::{DataQuality, HealthClass, RunStatus, SubMetric, SuccessRateBand};
pub use error::{HealthError, Result};
pub use models::{MetricsSelection, MttrCacheEntry, RawMetricSet, Run, Workflow};
pub use scoring::{HealthScoreCalculator, HealthScoreResult};
pub use services::{HealthReport, HealthScoreService, MetricsSource};
