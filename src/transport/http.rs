//! reqwest-backed implementation of [`DirectoryTransport`].

use crate::models::{
    CreateEmployeeRequest, DeleteEmployeeRequest, EmployeeEnvelope, EmployeeListEnvelope,
};
use crate::transport::{DirectoryTransport, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP transport for the upstream employee directory.
#[derive(Clone)]
pub struct HttpDirectoryTransport {
    client: Client,
    base_url: String,
}

impl HttpDirectoryTransport {
    /// Create a transport against `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                TransportError::synthetic(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL the transport was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::synthetic(format!("Upstream request timed out: {}", err))
        } else if err.is_connect() {
            TransportError::synthetic(format!("Failed to connect to upstream: {}", err))
        } else {
            TransportError::synthetic(format!("Upstream request failed: {}", err))
        }
    }

    /// Read a typed envelope out of a response, surfacing non-2xx
    /// statuses and decode failures as transport errors.
    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            warn!(status = status.as_u16(), "Upstream returned error status");
            return Err(TransportError::new(
                status.as_u16(),
                if body.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("upstream error")
                        .to_string()
                } else {
                    body
                },
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            TransportError::synthetic(format!("Failed to decode upstream response: {}", e))
        })
    }
}

#[async_trait]
impl DirectoryTransport for HttpDirectoryTransport {
    async fn fetch_all(&self) -> Result<EmployeeListEnvelope, TransportError> {
        debug!(url = %self.base_url, "GET employee collection");
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        Self::read_envelope(response).await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<EmployeeEnvelope, TransportError> {
        let url = format!("{}/{}", self.base_url, id);
        debug!(url = %url, "GET employee by id");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        Self::read_envelope(response).await
    }

    async fn create(
        &self,
        request: &CreateEmployeeRequest,
    ) -> Result<EmployeeEnvelope, TransportError> {
        debug!(url = %self.base_url, name = %request.name, "POST create employee");
        let response = self
            .client
            .post(&self.base_url)
            .json(request)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        Self::read_envelope(response).await
    }

    async fn delete(&self, request: &DeleteEmployeeRequest) -> Result<u16, TransportError> {
        debug!(url = %self.base_url, name = %request.name, "DELETE employee by name");
        let response = self
            .client
            .delete(&self.base_url)
            .json(request)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Upstream delete failed");
            return Err(TransportError::new(
                status.as_u16(),
                if body.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("upstream error")
                        .to_string()
                } else {
                    body
                },
            ));
        }

        Ok(status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let transport = HttpDirectoryTransport::new("http://localhost:8112/api/v1/employee/", 5)
            .unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8112/api/v1/employee");
    }

    #[tokio::test]
    async fn test_fetch_all_decodes_envelope() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(r#"{"data": [{"id": "1", "employee_name": "A", "employee_salary": 10}], "message": "ok"}"#)
            .create_async()
            .await;

        let transport = HttpDirectoryTransport::new(server.url(), 5).unwrap();
        let envelope = transport.fetch_all().await.unwrap();
        let data = envelope.data.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].name, "A");
    }

    #[tokio::test]
    async fn test_fetch_by_id_propagates_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not here")
            .create_async()
            .await;

        let transport = HttpDirectoryTransport::new(server.url(), 5).unwrap();
        let err = transport.fetch_by_id("missing").await.unwrap_err();
        assert_eq!(err.status, 404);
        assert_eq!(err.message, "not here");
    }

    #[tokio::test]
    async fn test_delete_returns_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/")
            .with_status(200)
            .create_async()
            .await;

        let transport = HttpDirectoryTransport::new(server.url(), 5).unwrap();
        let status = transport
            .delete(&DeleteEmployeeRequest {
                name: "A".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn test_delete_error_status_raises() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/")
            .with_status(429)
            .create_async()
            .await;

        let transport = HttpDirectoryTransport::new(server.url(), 5).unwrap();
        let err = transport
            .delete(&DeleteEmployeeRequest {
                name: "A".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status, 429);
    }

    #[tokio::test]
    async fn test_malformed_body_is_synthetic_500() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let transport = HttpDirectoryTransport::new(server.url(), 5).unwrap();
        let err = transport.fetch_all().await.unwrap_err();
        assert_eq!(err.status, 500);
    }
}
