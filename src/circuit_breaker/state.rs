//! Circuit breaker state machine.
//!
//! This module handles state transitions and state-specific behavior.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The current state of a circuit breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircuitState {
    /// Requests are allowed through, failures are counted
    Closed,
    /// All requests are rejected, waiting for the open deadline
    Open,
    /// Testing recovery with a single trial request
    HalfOpen,
}

impl CircuitState {
    /// Convert state to numeric value for the Prometheus gauge
    pub fn to_metric_value(&self) -> f64 {
        match self {
            CircuitState::Closed => 0.0,
            CircuitState::Open => 1.0,
            CircuitState::HalfOpen => 2.0,
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
            CircuitState::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// A recorded state transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: CircuitState,
    pub to: CircuitState,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
}

impl StateTransition {
    pub fn new(from: CircuitState, to: CircuitState, reason: String) -> Self {
        Self {
            from,
            to,
            timestamp: Utc::now(),
            reason,
        }
    }
}

/// Internal state data for the circuit breaker.
///
/// Mutated only under the breaker's lock; `trial_in_flight` gates
/// half-open admission so exactly one trial call reaches upstream per
/// open-deadline expiry.
#[derive(Debug, Clone)]
pub struct StateData {
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
    pub last_state_change: DateTime<Utc>,
    /// When the circuit was opened (if in Open state)
    pub opened_at: Option<DateTime<Utc>>,
    pub transition_count: u64,
    /// Whether a half-open trial call is currently in flight
    pub trial_in_flight: bool,
}

impl StateData {
    /// Create new state data in Closed state
    pub fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            consecutive_successes: 0,
            last_state_change: Utc::now(),
            opened_at: None,
            transition_count: 0,
            trial_in_flight: false,
        }
    }

    /// Record a successful request
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.consecutive_successes += 1;
    }

    /// Record a failed request
    pub fn record_failure(&mut self) {
        self.consecutive_successes = 0;
        self.consecutive_failures += 1;
    }

    /// Transition to a new state
    pub fn transition_to(&mut self, new_state: CircuitState) -> StateTransition {
        let transition =
            StateTransition::new(self.state, new_state, self.transition_reason(new_state));

        self.state = new_state;
        self.last_state_change = Utc::now();
        self.transition_count += 1;
        self.trial_in_flight = false;

        if new_state == CircuitState::Open {
            self.opened_at = Some(Utc::now());
        } else if new_state == CircuitState::Closed {
            self.opened_at = None;
            self.consecutive_failures = 0;
            self.consecutive_successes = 0;
        }

        transition
    }

    fn transition_reason(&self, new_state: CircuitState) -> String {
        match (self.state, new_state) {
            (CircuitState::Closed, CircuitState::Open) => format!(
                "Failure threshold exceeded ({} consecutive failures)",
                self.consecutive_failures
            ),
            (CircuitState::Open, CircuitState::HalfOpen) => {
                "Open deadline elapsed, testing recovery".to_string()
            }
            (CircuitState::HalfOpen, CircuitState::Closed) => {
                "Recovery trial succeeded".to_string()
            }
            (CircuitState::HalfOpen, CircuitState::Open) => "Recovery trial failed".to_string(),
            _ => format!("Transitioned from {} to {}", self.state, new_state),
        }
    }

    /// Check if the open deadline has elapsed and a recovery trial may
    /// be attempted
    pub fn should_attempt_reset(&self, open_duration: std::time::Duration) -> bool {
        if self.state != CircuitState::Open {
            return false;
        }

        if let Some(opened_at) = self.opened_at {
            // A backward wall-clock step yields a negative duration;
            // clamp so it never wraps into an early trial admission
            let elapsed = Utc::now().signed_duration_since(opened_at);
            elapsed.num_milliseconds().max(0) as u64 >= open_duration.as_millis() as u64
        } else {
            false
        }
    }
}

impl Default for StateData {
    fn default() -> Self {
        Self::new()
    }
}
