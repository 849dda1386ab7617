use employee_directory_gateway::{
    api::{build_router, AppState},
    config::Config,
    gateway::EmployeeGateway,
    resilience::ResilientDirectory,
    transport::HttpDirectoryTransport,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "employee_directory_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    tracing::info!(
        "Starting Employee Directory Gateway v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Upstream directory: {}", config.upstream.base_url);

    // Initialize Prometheus metrics
    if config.observability.prometheus_enabled {
        if let Err(e) = employee_directory_gateway::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        } else {
            tracing::info!("Prometheus metrics initialized");
        }
    } else {
        tracing::info!("Prometheus metrics disabled in configuration");
    }

    // Wire the upstream transport and the breaker-guarded gateway
    let transport =
        HttpDirectoryTransport::new(&config.upstream.base_url, config.upstream.timeout_secs)?;
    let gateway = EmployeeGateway::new(transport);
    let directory = Arc::new(ResilientDirectory::new(
        gateway,
        config.resilience.breaker_config()?,
    ));
    tracing::info!(
        failure_threshold = config.resilience.failure_threshold,
        open_duration_secs = config.resilience.open_duration_secs,
        "Circuit breakers configured"
    );

    let app_state = AppState::new(directory);
    let app = build_router(app_state);

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   REST API: http://{}/v1/employees", http_addr);
    tracing::info!("   Metrics: http://{}/metrics", http_addr);

    let http_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(http_listener, app).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = http_handle => {
            tracing::warn!("HTTP server stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}
