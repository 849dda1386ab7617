//! Circuit breaker configuration with builder pattern.

use crate::circuit_breaker::CircuitBreakerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a circuit breaker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Number of consecutive breaker-counted failures before opening
    pub failure_threshold: u32,

    /// How long an open circuit rejects calls before a recovery trial
    pub open_duration: Duration,
}

impl CircuitBreakerConfig {
    /// Create a new builder for CircuitBreakerConfig
    pub fn builder() -> CircuitBreakerConfigBuilder {
        CircuitBreakerConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CircuitBreakerError> {
        if self.failure_threshold == 0 {
            return Err(CircuitBreakerError::InvalidConfig(
                "failure_threshold must be greater than 0".to_string(),
            ));
        }

        if self.open_duration.is_zero() {
            return Err(CircuitBreakerError::InvalidConfig(
                "open_duration must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            open_duration: Duration::from_secs(30),
        }
    }
}

/// Builder for CircuitBreakerConfig with fluent API
#[derive(Debug, Clone, Default)]
pub struct CircuitBreakerConfigBuilder {
    failure_threshold: Option<u32>,
    open_duration: Option<Duration>,
}

impl CircuitBreakerConfigBuilder {
    /// Set the failure threshold
    pub fn failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = Some(threshold);
        self
    }

    /// Set the open duration
    pub fn open_duration(mut self, duration: Duration) -> Self {
        self.open_duration = Some(duration);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<CircuitBreakerConfig, CircuitBreakerError> {
        let default = CircuitBreakerConfig::default();

        let config = CircuitBreakerConfig {
            failure_threshold: self.failure_threshold.unwrap_or(default.failure_threshold),
            open_duration: self.open_duration.unwrap_or(default.open_duration),
        };

        config.validate()?;
        Ok(config)
    }
}
