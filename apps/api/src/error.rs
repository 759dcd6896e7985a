//! Error handling for the socialgraph API
//!
//! This module provides a unified error type hierarchy using thiserror,
//! with HTTP status code mapping used to decide what GraphQL clients see,
//! plus the error type shared by every batch loader.

use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;

/// Failure delivered to every caller waiting on a loader batch
///
/// Cloned once per waiting slot; all slots of one failed batch share the
/// same underlying source.
#[derive(Error, Debug, Clone)]
pub enum LoaderError {
    /// The batch fetch function returned an error
    #[error("{loader} batch fetch failed: {source}")]
    BatchFetch {
        loader: &'static str,
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The batch never completed (the fetch panicked or its task was dropped)
    #[error("{loader} batch was abandoned before it completed")]
    Abandoned { loader: &'static str },
}

impl LoaderError {
    /// Wrap a fetch error for fan-out to all waiting slots
    pub fn batch_fetch<E>(loader: &'static str, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::BatchFetch {
            loader,
            source: Arc::new(error),
        }
    }

    /// Name of the loader that produced the error
    pub fn loader(&self) -> &'static str {
        match self {
            Self::BatchFetch { loader, .. } | Self::Abandoned { loader } => loader,
        }
    }
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Resource Errors ==========
    /// Requested resource not found
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Resource already exists (conflict)
    #[error("{resource_type} already exists: {id}")]
    Conflict {
        resource_type: &'static str,
        id: String,
    },

    // ========== Validation Errors ==========
    /// Request validation failed
    #[error("validation error: {0}")]
    ValidationError(String),

    // ========== Data Access Errors ==========
    /// Database query failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database migration failed
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Batched load failed
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// Store unavailable (connection lost, backend switched off)
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::Migration(_) | Self::Loader(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Migration(_) => "MIGRATION_ERROR",
            Self::Loader(_) => "LOADER_ERROR",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Create a conflict error for a specific resource
    pub fn conflict(resource_type: &'static str, id: impl ToString) -> Self {
        Self::Conflict {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }

    /// Convert into a GraphQL error, hiding server-side details
    ///
    /// Client errors keep their message; server errors are logged and
    /// replaced with a generic message.
    pub fn into_graphql(self) -> async_graphql::Error {
        if self.status_code().is_server_error() {
            self.log();
            async_graphql::Error::new("An unexpected error occurred")
        } else {
            async_graphql::Error::new(self.to_string())
        }
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
