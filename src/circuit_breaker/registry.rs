//! Registry of per-operation circuit breakers.

use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

/// Registry mapping operation names to breaker instances. Breakers
/// are created lazily on first use and live for the process lifetime.
pub struct CircuitBreakerRegistry {
    breakers: DashMap<String, Arc<CircuitBreaker>>,
}

impl CircuitBreakerRegistry {
    /// Create a new registry
    pub fn new() -> Self {
        Self {
            breakers: DashMap::new(),
        }
    }

    /// Get or create a circuit breaker with the given name and config
    pub fn get_or_create(
        &self,
        name: impl Into<String>,
        config: CircuitBreakerConfig,
    ) -> Arc<CircuitBreaker> {
        let name = name.into();

        self.breakers
            .entry(name.clone())
            .or_insert_with(|| {
                info!(name = %name, "Creating new circuit breaker in registry");
                Arc::new(CircuitBreaker::new(name.clone(), config))
            })
            .clone()
    }

    /// Get an existing circuit breaker by name
    pub fn get(&self, name: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers.get(name).map(|entry| entry.value().clone())
    }

    /// Reset all circuit breakers to closed state
    pub fn reset_all(&self) {
        info!("Resetting all circuit breakers");
        for entry in self.breakers.iter() {
            entry.value().reset();
        }
    }

    /// Get health check information
    pub fn health_check(&self) -> RegistryHealth {
        let mut health = RegistryHealth {
            total_breakers: 0,
            closed: 0,
            open: 0,
            half_open: 0,
            healthy: true,
        };

        for entry in self.breakers.iter() {
            health.total_breakers += 1;
            match entry.value().state() {
                CircuitState::Closed => health.closed += 1,
                CircuitState::Open => health.open += 1,
                CircuitState::HalfOpen => health.half_open += 1,
            }
        }

        health.healthy = health.open == 0;
        health
    }

    /// Get the total number of circuit breakers
    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }
}

impl Default for CircuitBreakerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Health information for the circuit breaker registry
#[derive(Debug, Clone, serde::Serialize)]
pub struct RegistryHealth {
    pub total_breakers: usize,
    pub closed: usize,
    pub open: usize,
    pub half_open: usize,
    pub healthy: bool,
}
