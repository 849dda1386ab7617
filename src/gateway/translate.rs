//! Error Translator: maps transport-level failures into the
//! application error taxonomy.
//!
//! The mapping is pure and total: every [`TransportError`] lands on
//! exactly one [`ApiError`] variant.

use crate::error::ApiError;
use crate::gateway::{EXCEEDED_REQUEST_LIMIT, NO_DATA_FOUND};
use crate::transport::TransportError;
use tracing::warn;

/// Classify a transport failure.
///
/// - 404 becomes `NotFound`
/// - 429 becomes `RateLimited`
/// - any other 4xx passes through as `Client` with its status
/// - everything else (5xx and synthetic local failures) becomes
///   `Upstream`
pub fn translate_transport_error(err: TransportError) -> ApiError {
    warn!(
        status = err.status,
        message = %err.message,
        "Translating upstream failure"
    );

    match err.status {
        404 => ApiError::NotFound(NO_DATA_FOUND.to_string()),
        429 => ApiError::RateLimited(EXCEEDED_REQUEST_LIMIT.to_string()),
        status @ 400..=499 => ApiError::Client {
            status,
            message: err.message,
        },
        status => ApiError::Upstream {
            status,
            message: err.message,
        },
    }
}
