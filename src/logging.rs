//! # Structured Logging Module
//!
//! Environment-aware console logging built on `tracing`. Output goes to
//! stdout, either human readable or as JSON lines, and the filter level is
//! derived from the environment unless `RUST_LOG` or the configuration says
//! otherwise.

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process
pub fn init_structured_logging(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = resolve_filter(config, &environment);

        let fmt_layer = if config.json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(filter)
                .boxed()
        };

        // A subscriber may already be installed by a test harness or an embedding binary
        if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::info!(
            environment = %environment,
            json = config.json,
            "Structured logging initialized"
        );
    });
}

fn resolve_filter(config: &LoggingConfig, environment: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = config
        .level
        .clone()
        .unwrap_or_else(|| get_log_level(environment).to_string());

    EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new(get_log_level(environment)))
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("WORKFLOW_HEALTH_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log structured data for read cache and MTTR cache operations
pub fn log_cache_operation(operation: &str, cache: &str, key: &str, hit: Option<bool>) {
    tracing::debug!(
        operation = %operation,
        cache = %cache,
        key = %key,
        hit = hit,
        timestamp = %Utc::now().to_rfc3339(),
        "CACHE_OPERATION"
    );
}

/// Log the outcome of one MTTR refresh cycle
pub fn log_refresh_cycle(refreshed: usize, cleared: usize, failed: usize, duration_ms: u64) {
    tracing::info!(
        operation = "mttr_refresh_cycle",
        refreshed = refreshed,
        cleared = cleared,
        failed = failed,
        duration_ms = duration_ms,
        timestamp = %Utc::now().to_rfc3339(),
        "REFRESH_CYCLE"
    );
}

/// Log a completed health score computation
pub fn log_scoring_operation(
    repository: &str,
    workflow: Option<&str>,
    overall_score: f64,
    data_quality: &str,
    warnings: usize,
    errors: usize,
) {
    tracing::debug!(
        operation = "health_score",
        repository = %repository,
        workflow = workflow,
        overall_score = overall_score,
        data_quality = %data_quality,
        warnings = warnings,
        errors = errors,
        timestamp = %Utc::now().to_rfc3339(),
        "SCORING_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}

/// Log configuration events with a consistent field layout
#[macro_export]
macro_rules! log_config {
    // Simple form - just operation
    ($level:ident, $operation:expr $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
    // Generic form with additional fields
    ($level:ident, $operation:expr, $($key:ident: $value:expr),+ $(,)?) => {
        tracing::$level!(
            operation = %$operation,
            $($key = ?$value,)*
            timestamp = %chrono::Utc::now().to_rfc3339(),
            "{}", $operation
        );
    };
}
