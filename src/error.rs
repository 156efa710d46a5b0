//! Crate-wide error type.
//!
//! Uses `thiserror` so driver and serialization errors chain through `?`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// syncboard error type
#[derive(Debug, Error)]
pub enum SyncError {
    /// Document store error (connection, query, write)
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// A path or event carried an id that is not a valid ObjectId
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// BSON conversion error (patch bodies into `$set` documents)
    #[error("BSON error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    /// I/O error (listener bind)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// syncboard Result type alias
pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Create an InvalidId error
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// Status code a REST caller sees for this error
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::invalid_id("zzz");
        assert_eq!(err.to_string(), "invalid identifier: zzz");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: SyncError = io_err.into();
        assert!(matches!(err, SyncError::Io(_)));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            SyncError::invalid_id("x").status(),
            StatusCode::BAD_REQUEST
        );
        let io_err = std::io::Error::other("boom");
        assert_eq!(
            SyncError::from(io_err).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
