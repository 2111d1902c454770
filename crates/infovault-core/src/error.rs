//! Unified error type for the data-access and caching layers.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for Infovault.
///
/// Query-side and cache-side failures are kept apart so callers can tell a
/// failed read from a cache miss and fall back accordingly.
#[derive(Error, Debug)]
pub enum InfoError {
    // ============ Query Errors ============
    /// The pool could not hand out a connection (closed, timed out, I/O).
    #[error("Database connection unavailable: {0}")]
    ConnectionUnavailable(String),

    /// The server rejected or failed to run the statement.
    #[error("Statement failed: {0}")]
    StatementFailed(String),

    /// A column could not be coerced into the requested shape.
    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    /// A scalar or single-structure read produced zero rows.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A write statement did not produce an auto-increment identifier.
    #[error("Statement produced no generated identifier")]
    NoGeneratedIdentifier,

    /// The caller's deadline elapsed before the outcome arrived.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// The statement was abandoned because its scope was cancelled.
    #[error("Operation cancelled")]
    Cancelled,

    // ============ Cache Errors ============
    /// The cache store is disabled or could not be reached.
    #[error("Cache store unavailable: {0}")]
    StoreUnavailable(String),

    /// No entry is stored under the key (never written, deleted, or expired).
    #[error("Cache key not found: {0}")]
    KeyNotFound(String),

    /// A cached entry could not be deserialized into the requested type.
    #[error("Cache entry could not be deserialized: {0}")]
    DeserializeFailed(String),

    /// A value could not be serialized for caching.
    #[error("Value could not be serialized: {0}")]
    SerializeFailed(String),

    // ============ Request Errors ============
    /// A request failed validation before reaching the data layer.
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Infrastructure Errors ============
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InfoError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) | Self::KeyNotFound(_) => 404,
            Self::ConnectionUnavailable(_) | Self::StoreUnavailable(_) | Self::Timeout(_) => 503,
            Self::StatementFailed(_)
            | Self::DecodeFailed(_)
            | Self::NoGeneratedIdentifier
            | Self::Cancelled
            | Self::DeserializeFailed(_)
            | Self::SerializeFailed(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionUnavailable(_) => "CONNECTION_UNAVAILABLE",
            Self::StatementFailed(_) => "STATEMENT_FAILED",
            Self::DecodeFailed(_) => "DECODE_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::NoGeneratedIdentifier => "NO_GENERATED_IDENTIFIER",
            Self::Timeout(_) => "TIMEOUT",
            Self::Cancelled => "CANCELLED",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::KeyNotFound(_) => "KEY_NOT_FOUND",
            Self::DeserializeFailed(_) => "DESERIALIZE_FAILED",
            Self::SerializeFailed(_) => "SERIALIZE_FAILED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found<T: Into<String>>(what: T) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Checks if this error originated in the cache layer.
    ///
    /// Every cache-side error means "fall back to the database".
    #[must_use]
    pub const fn is_cache_error(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_)
                | Self::KeyNotFound(_)
                | Self::DeserializeFailed(_)
                | Self::SerializeFailed(_)
        )
    }

    /// Checks if this error means "the query ran and found nothing".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for InfoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound("query returned no rows".to_string()),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_) => Self::ConnectionUnavailable(err.to_string()),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. } => Self::DecodeFailed(err.to_string()),
            _ => Self::StatementFailed(err.to_string()),
        }
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Request trace ID for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response from an `InfoError`.
    #[must_use]
    pub fn from_error(error: &InfoError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            trace_id: None,
        }
    }

    /// Sets the trace ID.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

impl From<&InfoError> for ErrorResponse {
    fn from(error: &InfoError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(InfoError::not_found("account 999").status_code(), 404);
        assert_eq!(InfoError::KeyNotFound("k".to_string()).status_code(), 404);
        assert_eq!(InfoError::ConnectionUnavailable("down".to_string()).status_code(), 503);
        assert_eq!(InfoError::StoreUnavailable("down".to_string()).status_code(), 503);
        assert_eq!(InfoError::Timeout("slow".to_string()).status_code(), 503);
        assert_eq!(InfoError::DecodeFailed("bad".to_string()).status_code(), 500);
        assert_eq!(InfoError::NoGeneratedIdentifier.status_code(), 500);
        assert_eq!(InfoError::validation("amount: must not be zero").status_code(), 400);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(InfoError::not_found("x").error_code(), "NOT_FOUND");
        assert_eq!(InfoError::Cancelled.error_code(), "CANCELLED");
        assert_eq!(InfoError::NoGeneratedIdentifier.error_code(), "NO_GENERATED_IDENTIFIER");
        assert_eq!(InfoError::KeyNotFound("k".to_string()).error_code(), "KEY_NOT_FOUND");
        assert_eq!(InfoError::internal("boom").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_cache_error_classification() {
        assert!(InfoError::KeyNotFound("k".to_string()).is_cache_error());
        assert!(InfoError::DeserializeFailed("bad json".to_string()).is_cache_error());
        assert!(InfoError::StoreUnavailable("down".to_string()).is_cache_error());
        assert!(!InfoError::not_found("row").is_cache_error());
        assert!(!InfoError::StatementFailed("syntax".to_string()).is_cache_error());
    }

    #[test]
    fn test_sqlx_row_not_found_maps_to_not_found() {
        let err: InfoError = sqlx::Error::RowNotFound.into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_sqlx_pool_errors_map_to_connection_unavailable() {
        let err: InfoError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, InfoError::ConnectionUnavailable(_)));

        let err: InfoError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, InfoError::ConnectionUnavailable(_)));
    }

    #[test]
    fn test_sqlx_decode_errors_map_to_decode_failed() {
        let err: InfoError = sqlx::Error::Decode("not an integer".into()).into();
        assert!(matches!(err, InfoError::DecodeFailed(_)));

        let err: InfoError = sqlx::Error::ColumnNotFound("balance".to_string()).into();
        assert!(matches!(err, InfoError::DecodeFailed(_)));
    }

    #[test]
    fn test_sqlx_protocol_error_maps_to_statement_failed() {
        let err: InfoError = sqlx::Error::Protocol("unexpected packet".to_string()).into();
        assert!(matches!(err, InfoError::StatementFailed(_)));
    }

    #[test]
    fn test_error_response_from_error() {
        let err = InfoError::not_found("account 999");
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert!(response.message.contains("account 999"));
        assert!(response.trace_id.is_none());
    }

    #[test]
    fn test_error_response_with_trace_id() {
        let response = ErrorResponse::from(&InfoError::Cancelled).with_trace_id("trace-123");
        assert_eq!(response.trace_id, Some("trace-123".to_string()));
    }
}
