//! Prometheus registry wiring and text exposition.

use crate::circuit_breaker::init_circuit_breaker_metrics;
use lazy_static::lazy_static;
use prometheus::{Encoder, Registry, TextEncoder};

lazy_static! {
    /// Process-wide Prometheus registry
    pub static ref METRICS_REGISTRY: Registry = Registry::new();
}

/// Register all metrics with the shared registry. Safe to call once at
/// startup; duplicate registration is reported as an error.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    init_circuit_breaker_metrics(&METRICS_REGISTRY)?;
    Ok(())
}

/// Render the registry in the Prometheus text format.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}
