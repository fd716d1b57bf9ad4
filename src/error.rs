//! Error types and handling for the storefront search service

use serde::Serialize;
use std::fmt;

use crate::catalog::StoreError;

/// Application error types surfaced by the CLI and the HTTP endpoints
#[derive(Debug, Serialize)]
pub enum AppError {
    InvalidInput(String),
    StoreUnavailable(String),
    QueryFailed(String),
    NotFound(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::StoreUnavailable(msg) => write!(f, "Catalog unavailable: {}", msg),
            AppError::QueryFailed(msg) => write!(f, "Query failed: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Get the error code for JSON responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::QueryFailed(_) => "query_failed",
            AppError::NotFound(_) => "not_found",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Convert StoreError to AppError
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => AppError::StoreUnavailable(msg),
            StoreError::Io(e) => AppError::StoreUnavailable(e.to_string()),
            StoreError::Parse(e) => AppError::QueryFailed(e.to_string()),
        }
    }
}

/// Convert anyhow::Error to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert serde_json::Error to AppError
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::QueryFailed(err.to_string())
    }
}

/// Convert std::io::Error to AppError
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

/// Validate a raw search query before it enters the pipeline. Empty input
/// is allowed; it short-circuits to an empty result set downstream.
pub fn validate_query(query: &str) -> Result<(), AppError> {
    if query.chars().count() > 200 {
        return Err(AppError::InvalidInput(
            "Query too long, maximum 200 characters".to_string(),
        ));
    }

    Ok(())
}
