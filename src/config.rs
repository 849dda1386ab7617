use crate::circuit_breaker::CircuitBreakerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Upstream directory configuration
    pub upstream: UpstreamConfig,

    /// Circuit breaker configuration
    pub resilience: ResilienceConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: EDG_)
            .add_source(
                config::Environment::with_prefix("EDG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                http_port: default_http_port(),
            },
            upstream: UpstreamConfig {
                base_url: default_upstream_url(),
                timeout_secs: default_upstream_timeout(),
            },
            resilience: ResilienceConfig {
                failure_threshold: default_failure_threshold(),
                open_duration_secs: default_open_duration(),
            },
            observability: ObservabilityConfig {
                log_level: default_log_level(),
                json_logs: false,
                service_name: default_service_name(),
                prometheus_enabled: default_true(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the upstream employee directory
    #[serde(default = "default_upstream_url")]
    pub base_url: String,

    /// Upstream request timeout (seconds)
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilienceConfig {
    /// Consecutive failures before a breaker opens
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,

    /// How long an open breaker rejects calls (seconds)
    #[serde(default = "default_open_duration")]
    pub open_duration_secs: u64,
}

impl ResilienceConfig {
    /// Build the breaker configuration shared by all operations.
    pub fn breaker_config(&self) -> Result<CircuitBreakerConfig, crate::error::ApiError> {
        CircuitBreakerConfig::builder()
            .failure_threshold(self.failure_threshold)
            .open_duration(Duration::from_secs(self.open_duration_secs))
            .build()
            .map_err(|e| crate::error::ApiError::Configuration(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8111
}

fn default_upstream_url() -> String {
    "http://localhost:8112/api/v1/employee".to_string()
}

fn default_upstream_timeout() -> u64 {
    10
}

fn default_failure_threshold() -> u32 {
    5
}

fn default_open_duration() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "employee-directory-gateway".to_string()
}

fn default_true() -> bool {
    true
}
