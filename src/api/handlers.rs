use crate::api::AppState;
use crate::circuit_breaker::RegistryHealth;
use crate::error::Result;
use crate::models::{CreateEmployeeRequest, Employee};
use crate::resilience::Served;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use validator::Validate;

/// Map a served value to its response status. Degraded responses are
/// always 503, regardless of the payload shape.
fn respond<T: Serialize>(served: Served<T>) -> (StatusCode, Json<T>) {
    match served {
        Served::Fresh(value) => (StatusCode::OK, Json(value)),
        Served::Degraded(value) => (StatusCode::SERVICE_UNAVAILABLE, Json(value)),
    }
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let breakers = state.directory.breaker_health();
    Json(HealthResponse {
        status: if breakers.healthy {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        breakers,
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub breakers: RegistryHealth,
}

/// List every employee in the directory
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<Employee>>)> {
    let served = state.directory.list_all().await?;
    Ok(respond(served))
}

/// Get a single employee by id
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Option<Employee>>)> {
    let served = state.directory.get_by_id(&id).await?;
    Ok(respond(served))
}

/// Case-insensitive name search
pub async fn search_employees(
    State(state): State<AppState>,
    Path(fragment): Path<String>,
) -> Result<(StatusCode, Json<Vec<Employee>>)> {
    let served = state.directory.search_by_name(&fragment).await?;
    Ok(respond(served))
}

/// Highest salary across the directory
pub async fn highest_salary(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<i64>)> {
    let served = state.directory.highest_salary().await?;
    Ok(respond(served))
}

/// Names of the ten best-paid employees
pub async fn top_earner_names(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<String>>)> {
    let served = state.directory.top_earner_names().await?;
    Ok(respond(served))
}

/// Create a new employee
pub async fn create_employee(
    State(state): State<AppState>,
    Json(request): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Option<Employee>>)> {
    request.validate()?;

    let served = state.directory.create(&request).await?;
    Ok(respond(served))
}

/// Delete an employee by id
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DeleteResponse>)> {
    let served = state.directory.delete_by_id(&id).await?;
    let (status, Json(message)) = respond(served);
    Ok((status, Json(DeleteResponse { message })))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Prometheus metrics endpoint
///
/// Returns metrics in Prometheus text exposition format
pub async fn metrics() -> (StatusCode, String) {
    match crate::metrics::gather_metrics() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to gather metrics: {e}"),
        ),
    }
}
