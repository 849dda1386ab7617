//! Core circuit breaker implementation with async support.

use crate::circuit_breaker::{
    BreakerClassified, CircuitBreakerConfig, CircuitState, StateData, StateTransition,
};
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a breaker-guarded call.
#[derive(Debug)]
pub enum BreakerVerdict<T, E> {
    /// The wrapped operation ran; its result (success or typed error)
    /// has already been recorded against the breaker.
    Executed(Result<T, E>),
    /// The breaker short-circuited; the operation was never invoked.
    Rejected,
}

impl<T, E> BreakerVerdict<T, E> {
    pub fn was_rejected(&self) -> bool {
        matches!(self, BreakerVerdict::Rejected)
    }
}

/// A thread-safe, async circuit breaker keyed by operation name.
///
/// Unlike a plain pass/fail breaker, result classification is
/// delegated to [`BreakerClassified`]: typed business errors the
/// operation contract defines as normal outcomes count as successes,
/// and only server-error-class failures feed the trip accounting.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    /// Unique name for this circuit breaker
    name: String,
    /// Configuration
    config: CircuitBreakerConfig,
    /// Internal state
    state: Arc<RwLock<StateData>>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let name = name.into();
        info!(
            name = %name,
            config = ?config,
            "Creating new circuit breaker"
        );

        Self {
            name,
            config,
            state: Arc::new(RwLock::new(StateData::new())),
        }
    }

    /// Get the name of this circuit breaker
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the current state
    pub fn state(&self) -> CircuitState {
        self.state.read().state
    }

    /// Get the current configuration
    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Execute an async operation guarded by the circuit breaker.
    pub async fn call<F, Fut, T, E>(&self, f: F) -> BreakerVerdict<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: BreakerClassified,
    {
        if !self.admit() {
            return BreakerVerdict::Rejected;
        }

        super::metrics::BREAKER_METRICS
            .calls_total
            .with_label_values(&[&self.name, "allowed"])
            .inc();

        let start = std::time::Instant::now();
        let result = f().await;
        let duration = start.elapsed();

        super::metrics::BREAKER_METRICS
            .call_duration
            .with_label_values(&[&self.name])
            .observe(duration.as_secs_f64());

        match &result {
            Err(err) if err.is_breaker_failure() => {
                self.on_failure();
                super::metrics::BREAKER_METRICS
                    .failed_calls
                    .with_label_values(&[&self.name])
                    .inc();
            }
            _ => {
                // Business errors are normal outcomes at the breaker level
                self.on_success();
                super::metrics::BREAKER_METRICS
                    .successful_calls
                    .with_label_values(&[&self.name])
                    .inc();
            }
        }

        BreakerVerdict::Executed(result)
    }

    /// Check state and decide whether a call may proceed. Admission
    /// and the open-to-half-open transition happen under one lock so
    /// at most one trial call is admitted per deadline expiry.
    fn admit(&self) -> bool {
        let mut state = self.state.write();

        if state.should_attempt_reset(self.config.open_duration) {
            let transition = state.transition_to(CircuitState::HalfOpen);
            self.log_transition(&transition);
        }

        match state.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                self.record_rejection();
                false
            }
            CircuitState::HalfOpen => {
                if state.trial_in_flight {
                    self.record_rejection();
                    false
                } else {
                    state.trial_in_flight = true;
                    true
                }
            }
        }
    }

    fn record_rejection(&self) {
        super::metrics::BREAKER_METRICS
            .rejected_calls
            .with_label_values(&[&self.name])
            .inc();
    }

    /// Handle successful operation
    fn on_success(&self) {
        let mut state = self.state.write();
        state.record_success();

        debug!(
            name = %self.name,
            current_state = %state.state,
            consecutive_successes = state.consecutive_successes,
            "Operation succeeded"
        );

        // A single successful trial closes the circuit
        if state.state == CircuitState::HalfOpen {
            let transition = state.transition_to(CircuitState::Closed);
            self.log_transition(&transition);
        }
    }

    /// Handle failed operation
    fn on_failure(&self) {
        let mut state = self.state.write();
        state.record_failure();

        warn!(
            name = %self.name,
            current_state = %state.state,
            consecutive_failures = state.consecutive_failures,
            "Operation failed"
        );

        if state.state == CircuitState::Closed
            && state.consecutive_failures >= self.config.failure_threshold
        {
            let transition = state.transition_to(CircuitState::Open);
            self.log_transition(&transition);
        } else if state.state == CircuitState::HalfOpen {
            // A failed trial reopens the circuit and resets the deadline
            let transition = state.transition_to(CircuitState::Open);
            self.log_transition(&transition);
        }
    }

    /// Log and record state transition
    fn log_transition(&self, transition: &StateTransition) {
        info!(
            name = %self.name,
            from = %transition.from,
            to = %transition.to,
            reason = %transition.reason,
            "Circuit breaker state transition"
        );

        super::metrics::BREAKER_METRICS
            .state
            .with_label_values(&[&self.name])
            .set(transition.to.to_metric_value());

        super::metrics::BREAKER_METRICS
            .state_transitions
            .with_label_values(&[
                &self.name,
                &transition.from.to_string(),
                &transition.to.to_string(),
            ])
            .inc();
    }

    /// Get statistics for this circuit breaker
    pub fn stats(&self) -> CircuitBreakerStats {
        let state = self.state.read();
        CircuitBreakerStats {
            name: self.name.clone(),
            state: state.state,
            consecutive_failures: state.consecutive_failures,
            consecutive_successes: state.consecutive_successes,
            transition_count: state.transition_count,
            last_state_change: state.last_state_change,
        }
    }

    /// Manually reset the circuit breaker to closed state
    pub fn reset(&self) {
        let mut state = self.state.write();
        if state.state != CircuitState::Closed {
            let transition = state.transition_to(CircuitState::Closed);
            self.log_transition(&transition);
        }
    }

    /// Force the circuit breaker to open state
    pub fn force_open(&self) {
        let mut state = self.state.write();
        if state.state != CircuitState::Open {
            let transition = state.transition_to(CircuitState::Open);
            self.log_transition(&transition);
        }
    }
}

/// Statistics for a circuit breaker
#[derive(Debug, Clone, serde::Serialize)]
pub struct CircuitBreakerStats {
    pub name: String,
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
    pub transition_count: u64,
    pub last_state_change: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::time::Duration;

    fn upstream_err() -> ApiError {
        ApiError::internal("boom")
    }

    #[tokio::test]
    async fn test_circuit_breaker_starts_closed() {
        let config = CircuitBreakerConfig::builder()
            .failure_threshold(3)
            .build()
            .unwrap();
        let breaker = CircuitBreaker::new("test", config);

        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_successful_call() {
        let breaker = CircuitBreaker::new("test", CircuitBreakerConfig::default());

        let verdict = breaker
            .call(|| async { Ok::<i32, ApiError>(42) })
            .await;

        match verdict {
            BreakerVerdict::Executed(Ok(v)) => assert_eq!(v, 42),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_circuit_opens_after_failures() {
        let config = CircuitBreakerConfig::builder()
            .failure_threshold(3)
            .build()
            .unwrap();
        let breaker = CircuitBreaker::new("test", config);

        for _ in 0..3 {
            let _ = breaker
                .call(|| async { Err::<i32, ApiError>(upstream_err()) })
                .await;
        }

        assert_eq!(breaker.state(), CircuitState::Open);

        let verdict = breaker.call(|| async { Ok::<i32, ApiError>(42) }).await;
        assert!(verdict.was_rejected());
    }

    #[tokio::test]
    async fn test_business_errors_do_not_trip_breaker() {
        let config = CircuitBreakerConfig::builder()
            .failure_threshold(2)
            .build()
            .unwrap();
        let breaker = CircuitBreaker::new("test", config);

        for _ in 0..5 {
            let _ = breaker
                .call(|| async {
                    Err::<i32, ApiError>(ApiError::NotFound("missing".to_string()))
                })
                .await;
        }

        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_business_error_resets_failure_streak() {
        let config = CircuitBreakerConfig::builder()
            .failure_threshold(2)
            .build()
            .unwrap();
        let breaker = CircuitBreaker::new("test", config);

        let _ = breaker
            .call(|| async { Err::<i32, ApiError>(upstream_err()) })
            .await;
        let _ = breaker
            .call(|| async { Err::<i32, ApiError>(ApiError::NotFound("x".to_string())) })
            .await;
        let _ = breaker
            .call(|| async { Err::<i32, ApiError>(upstream_err()) })
            .await;

        // The streak broke at one, so two consecutive failures never
        // accumulated
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_half_open_after_deadline_then_close_on_success() {
        let config = CircuitBreakerConfig::builder()
            .failure_threshold(2)
            .open_duration(Duration::from_millis(50))
            .build()
            .unwrap();
        let breaker = CircuitBreaker::new("test", config);

        for _ in 0..2 {
            let _ = breaker
                .call(|| async { Err::<i32, ApiError>(upstream_err()) })
                .await;
        }
        assert_eq!(breaker.state(), CircuitState::Open);

        tokio::time::sleep(Duration::from_millis(80)).await;

        let verdict = breaker.call(|| async { Ok::<i32, ApiError>(1) }).await;
        assert!(!verdict.was_rejected());
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_half_open_failure_reopens() {
        let config = CircuitBreakerConfig::builder()
            .failure_threshold(2)
            .open_duration(Duration::from_millis(50))
            .build()
            .unwrap();
        let breaker = CircuitBreaker::new("test", config);

        for _ in 0..2 {
            let _ = breaker
                .call(|| async { Err::<i32, ApiError>(upstream_err()) })
                .await;
        }

        tokio::time::sleep(Duration::from_millis(80)).await;

        let _ = breaker
            .call(|| async { Err::<i32, ApiError>(upstream_err()) })
            .await;
        assert_eq!(breaker.state(), CircuitState::Open);

        // Deadline was reset; an immediate call is rejected again
        let verdict = breaker.call(|| async { Ok::<i32, ApiError>(1) }).await;
        assert!(verdict.was_rejected());
    }

    #[tokio::test]
    async fn test_half_open_admits_single_trial() {
        let config = CircuitBreakerConfig::builder()
            .failure_threshold(1)
            .open_duration(Duration::from_millis(20))
            .build()
            .unwrap();
        let breaker = CircuitBreaker::new("test", config);

        let _ = breaker
            .call(|| async { Err::<i32, ApiError>(upstream_err()) })
            .await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        let (trial_tx, trial_rx) = tokio::sync::oneshot::channel::<()>();
        let slow_breaker = breaker.clone();
        let trial = tokio::spawn(async move {
            slow_breaker
                .call(|| async {
                    let _ = trial_rx.await;
                    Ok::<i32, ApiError>(1)
                })
                .await
        });

        // Let the trial call claim the half-open slot
        tokio::time::sleep(Duration::from_millis(20)).await;

        // A concurrent caller must be rejected while the trial is in
        // flight
        let verdict = breaker.call(|| async { Ok::<i32, ApiError>(2) }).await;
        assert!(verdict.was_rejected());

        trial_tx.send(()).unwrap();
        let trial_verdict = trial.await.unwrap();
        assert!(!trial_verdict.was_rejected());
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_manual_reset() {
        let config = CircuitBreakerConfig::builder()
            .failure_threshold(2)
            .build()
            .unwrap();
        let breaker = CircuitBreaker::new("test", config);

        breaker.force_open();
        assert_eq!(breaker.state(), CircuitState::Open);

        breaker.reset();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_stats() {
        let breaker = CircuitBreaker::new("test", CircuitBreakerConfig::default());

        let stats = breaker.stats();
        assert_eq!(stats.name, "test");
        assert_eq!(stats.state, CircuitState::Closed);
        assert_eq!(stats.consecutive_failures, 0);
    }
}
