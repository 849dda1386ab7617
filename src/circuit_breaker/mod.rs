//! Circuit breaker for the upstream employee directory.
//!
//! Each gateway operation runs behind its own named breaker with:
//! - Thread-safe state management
//! - Prometheus metrics integration
//! - Error-kind-aware failure accounting ([`BreakerClassified`])
//! - Single-trial half-open recovery
//! - A lazy per-operation registry
//!
//! # Circuit Breaker States
//!
//! - **Closed**: normal operation, requests pass through, failures
//!   are counted
//! - **Open**: fast-fail mode, all requests are rejected until the
//!   open deadline elapses
//! - **Half-Open**: testing recovery, a single trial request is
//!   allowed through

mod config;
mod core;
mod metrics;
mod registry;
mod state;

pub use config::{CircuitBreakerConfig, CircuitBreakerConfigBuilder};
pub use core::{BreakerVerdict, CircuitBreaker, CircuitBreakerStats};
pub use metrics::{init_circuit_breaker_metrics, BREAKER_METRICS};
pub use registry::{CircuitBreakerRegistry, RegistryHealth};
pub use state::{CircuitState, StateData, StateTransition};

/// Classifies wrapped-call errors for breaker accounting.
///
/// An operation may intentionally return typed business errors (a 404
/// on an unknown id, a 429 from upstream rate limiting). Those are
/// success paths at the breaker level; only errors for which this
/// returns `true` count toward tripping the circuit.
pub trait BreakerClassified {
    fn is_breaker_failure(&self) -> bool;
}

impl BreakerClassified for crate::error::ApiError {
    fn is_breaker_failure(&self) -> bool {
        self.counts_toward_breaker()
    }
}

/// Errors that can occur in circuit breaker operations
#[derive(Debug, thiserror::Error)]
pub enum CircuitBreakerError {
    /// Configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_api_error_classification() {
        assert!(ApiError::internal("x").is_breaker_failure());
        assert!(!ApiError::NotFound("x".to_string()).is_breaker_failure());
        assert!(!ApiError::RateLimited("x".to_string()).is_breaker_failure());
    }
}
