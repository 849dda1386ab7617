use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types
///
/// Every failure surfaced by the gateway maps to exactly one of these
/// variants. `counts_toward_breaker` is the single place that decides
/// which variants feed the circuit breaker's failure accounting.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// Upstream returned 404 or a semantically empty payload
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream returned 429
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other upstream 4xx, or a rejected caller input
    #[error("Client error ({status}): {message}")]
    Client { status: u16, message: String },

    /// Upstream 5xx, transport failures, and unexpected local failures
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Request body failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Client { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::RateLimited(_) => "RATE_LIMIT_EXCEEDED",
            ApiError::Client { .. } => "CLIENT_ERROR",
            ApiError::Upstream { .. } => "UPSTREAM_ERROR",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Whether this error feeds circuit breaker failure accounting.
    ///
    /// Business outcomes (404/429/other 4xx) say nothing about upstream
    /// health and are treated as breaker successes; only the
    /// server-error class trips the breaker.
    pub fn counts_toward_breaker(&self) -> bool {
        matches!(self, ApiError::Upstream { .. })
    }

    /// Shorthand for the synthetic-500 class of failures
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Upstream {
            status: 500,
            message: message.into(),
        }
    }
}

/// Convert ApiError to HTTP response
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        tracing::error!(
            error_code = error_code,
            status_code = status.as_u16(),
            message = %message,
            "Request error"
        );

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(format!("Serialization error: {}", err))
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;
