use thiserror::Error;

use crate::config::ConfigurationError;

/// Errors surfaced by the storage, refresh and configuration layers.
///
/// The scoring layer never returns these: anything that goes wrong below the
/// health score calculator is folded into the result's `warnings`/`errors`.
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("MTTR refresh error: {0}")]
    Refresh(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for HealthError {
    fn from(err: sqlx::Error) -> Self {
        HealthError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for HealthError {
    fn from(err: serde_json::Error) -> Self {
        HealthError::Serialization(err.to_string())
    }
}

impl HealthError {
    /// Storage-side failures that callers are expected to degrade around
    /// rather than propagate.
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, HealthError::Database(_) | HealthError::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, HealthError>;
