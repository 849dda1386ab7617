//! Transport contract for the upstream employee directory.
//!
//! The gateway only ever talks to the directory through
//! [`DirectoryTransport`], so tests can substitute a stub and the
//! reqwest wiring stays in one place.

mod http;

pub use http::HttpDirectoryTransport;

use crate::models::{
    CreateEmployeeRequest, DeleteEmployeeRequest, EmployeeEnvelope, EmployeeListEnvelope,
};
use async_trait::async_trait;
use thiserror::Error;

/// A transport-level failure. Always carries a numeric HTTP status:
/// real upstream statuses pass through unchanged, local failures
/// (connect, timeout, body decode) are surfaced as synthetic 500s.
#[derive(Debug, Clone, Error)]
#[error("upstream returned {status}: {message}")]
pub struct TransportError {
    pub status: u16,
    pub message: String,
}

impl TransportError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Local failures that never reached (or never heard back from)
    /// the upstream service.
    pub fn synthetic(message: impl Into<String>) -> Self {
        Self::new(500, message)
    }
}

/// Raw GET/POST/DELETE against the upstream directory.
///
/// Implementations perform exactly one HTTP round trip per call and
/// never interpret envelope contents; semantic no-data handling
/// belongs to the gateway.
#[async_trait]
pub trait DirectoryTransport: Send + Sync {
    /// GET the full employee collection.
    async fn fetch_all(&self) -> Result<EmployeeListEnvelope, TransportError>;

    /// GET a single employee by id.
    async fn fetch_by_id(&self, id: &str) -> Result<EmployeeEnvelope, TransportError>;

    /// POST a new employee.
    async fn create(
        &self,
        request: &CreateEmployeeRequest,
    ) -> Result<EmployeeEnvelope, TransportError>;

    /// DELETE an employee by name; returns the upstream status code.
    async fn delete(&self, request: &DeleteEmployeeRequest) -> Result<u16, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::new(404, "no such employee");
        assert_eq!(err.to_string(), "upstream returned 404: no such employee");
    }

    #[test]
    fn test_synthetic_is_server_class() {
        let err = TransportError::synthetic("connection refused");
        assert_eq!(err.status, 500);
    }
}
