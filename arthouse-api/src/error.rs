//! Error Types for the Arthouse API
//!
//! Every failure a handler can produce becomes an [`ApiError`], which renders
//! as `{"message": "..."}` with the status code of its [`ErrorCode`]. Internal
//! details are logged, never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use arthouse_core::StoreError;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error categories and their HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Path identifier is not a well-formed ObjectId
    InvalidId,

    /// Requested record (or the parent of a relation) does not exist.
    ///
    /// Reported as 400, not 404.
    NotFound,

    /// Datastore is unreachable
    ServiceUnavailable,

    /// Anything else
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidId => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::NotFound => StatusCode::BAD_REQUEST,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message sent to clients for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidId => "Invalid ID",
            ErrorCode::NotFound => "Not Found",
            ErrorCode::ServiceUnavailable => "Service Unavailable",
            ErrorCode::InternalError => "Internal Server Error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Category; selects the status code and is not serialized
    #[serde(skip)]
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    pub fn invalid_id() -> Self {
        Self::from_code(ErrorCode::InvalidId)
    }

    pub fn not_found() -> Self {
        Self::from_code(ErrorCode::NotFound)
    }

    pub fn internal_error() -> Self {
        Self::from_code(ErrorCode::InternalError)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM STORE ERRORS
// ============================================================================

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidIdentifier { .. } => ApiError::invalid_id(),
            StoreError::NotFound { .. } => ApiError::not_found(),
            other => {
                // Log the full error; clients get a generic message
                tracing::error!(error = %other, "Store operation failed");
                ApiError::internal_error()
            }
        }
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use arthouse_core::EntityKind;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::InvalidId.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InternalError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ErrorCode::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let err: ApiError = StoreError::InvalidIdentifier { id: "xyz".into() }.into();
        assert_eq!(err, ApiError::new(ErrorCode::InvalidId, "Invalid ID"));

        let err: ApiError = StoreError::not_found(EntityKind::Artwork, "abc").into();
        assert_eq!(err, ApiError::new(ErrorCode::NotFound, "Not Found"));

        let err: ApiError = StoreError::unavailable("connection reset").into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "Internal Server Error");
    }

    #[test]
    fn test_error_body_is_message_only() -> Result<(), serde_json::Error> {
        let json = serde_json::to_value(ApiError::not_found())?;
        assert_eq!(json, serde_json::json!({ "message": "Not Found" }));
        Ok(())
    }

    #[test]
    fn test_error_display() {
        let display = ApiError::invalid_id().to_string();
        assert!(display.contains("InvalidId"));
        assert!(display.contains("Invalid ID"));
    }
}
