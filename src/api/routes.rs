use crate::api::{handlers, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health and metrics
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        // Employee directory
        .route("/v1/employees", get(handlers::list_employees))
        .route("/v1/employees", post(handlers::create_employee))
        .route(
            "/v1/employees/highest-salary",
            get(handlers::highest_salary),
        )
        .route(
            "/v1/employees/top-ten-earner-names",
            get(handlers::top_earner_names),
        )
        .route(
            "/v1/employees/search/:fragment",
            get(handlers::search_employees),
        )
        .route("/v1/employees/:id", get(handlers::get_employee))
        .route("/v1/employees/:id", delete(handlers::delete_employee))
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
