//! Circuit breaker state-machine and registry properties.

use employee_directory_gateway::circuit_breaker::{
    BreakerVerdict, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerRegistry, CircuitState,
};
use employee_directory_gateway::error::ApiError;
use std::time::Duration;

fn config(threshold: u32, open_ms: u64) -> CircuitBreakerConfig {
    CircuitBreakerConfig::builder()
        .failure_threshold(threshold)
        .open_duration(Duration::from_millis(open_ms))
        .build()
        .unwrap()
}

fn upstream_err() -> ApiError {
    ApiError::internal("upstream exploded")
}

async fn fail(breaker: &CircuitBreaker) {
    let _ = breaker
        .call(|| async { Err::<(), ApiError>(upstream_err()) })
        .await;
}

async fn succeed(breaker: &CircuitBreaker) -> BreakerVerdict<(), ApiError> {
    breaker.call(|| async { Ok::<(), ApiError>(()) }).await
}

#[tokio::test]
async fn opens_exactly_at_threshold() {
    let breaker = CircuitBreaker::new("threshold", config(3, 60_000));

    fail(&breaker).await;
    fail(&breaker).await;
    assert_eq!(breaker.state(), CircuitState::Closed);

    fail(&breaker).await;
    assert_eq!(breaker.state(), CircuitState::Open);
}

#[tokio::test]
async fn open_circuit_rejects_without_invoking_operation() {
    let breaker = CircuitBreaker::new("rejecting", config(1, 60_000));
    fail(&breaker).await;

    let mut invoked = false;
    let verdict = breaker
        .call(|| {
            invoked = true;
            async { Ok::<(), ApiError>(()) }
        })
        .await;

    assert!(verdict.was_rejected());
    assert!(!invoked);
}

#[tokio::test]
async fn success_resets_failure_streak() {
    let breaker = CircuitBreaker::new("streak", config(3, 60_000));

    fail(&breaker).await;
    fail(&breaker).await;
    let _ = succeed(&breaker).await;
    fail(&breaker).await;
    fail(&breaker).await;

    // Never three in a row
    assert_eq!(breaker.state(), CircuitState::Closed);
}

#[tokio::test]
async fn business_errors_count_as_breaker_successes() {
    let breaker = CircuitBreaker::new("classified", config(2, 60_000));

    for _ in 0..6 {
        let verdict = breaker
            .call(|| async { Err::<(), ApiError>(ApiError::NotFound("nobody".to_string())) })
            .await;
        // Propagated to the caller, not swallowed
        assert!(matches!(
            verdict,
            BreakerVerdict::Executed(Err(ApiError::NotFound(_)))
        ));
    }

    assert_eq!(breaker.state(), CircuitState::Closed);
}

#[tokio::test]
async fn half_open_trial_success_closes() {
    let breaker = CircuitBreaker::new("recovering", config(1, 30));
    fail(&breaker).await;
    assert_eq!(breaker.state(), CircuitState::Open);

    tokio::time::sleep(Duration::from_millis(60)).await;

    let verdict = succeed(&breaker).await;
    assert!(!verdict.was_rejected());
    assert_eq!(breaker.state(), CircuitState::Closed);
}

#[tokio::test]
async fn half_open_trial_failure_reopens_with_fresh_deadline() {
    let breaker = CircuitBreaker::new("relapsing", config(1, 30));
    fail(&breaker).await;

    tokio::time::sleep(Duration::from_millis(60)).await;
    fail(&breaker).await;
    assert_eq!(breaker.state(), CircuitState::Open);

    // Deadline restarted; an immediate retry is still rejected
    let verdict = succeed(&breaker).await;
    assert!(verdict.was_rejected());
}

#[tokio::test]
async fn half_open_admits_exactly_one_trial() {
    let breaker = CircuitBreaker::new("single-trial", config(1, 20));
    fail(&breaker).await;
    tokio::time::sleep(Duration::from_millis(40)).await;

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let trial_breaker = breaker.clone();
    let trial = tokio::spawn(async move {
        trial_breaker
            .call(|| async {
                let _ = rx.await;
                Ok::<(), ApiError>(())
            })
            .await
    });

    tokio::time::sleep(Duration::from_millis(20)).await;

    // Second caller while the trial is still in flight
    let concurrent = succeed(&breaker).await;
    assert!(concurrent.was_rejected());

    tx.send(()).unwrap();
    let trial_verdict = trial.await.unwrap();
    assert!(!trial_verdict.was_rejected());
    assert_eq!(breaker.state(), CircuitState::Closed);
}

#[tokio::test]
async fn manual_reset_and_force_open() {
    let breaker = CircuitBreaker::new("manual", config(5, 60_000));

    breaker.force_open();
    assert_eq!(breaker.state(), CircuitState::Open);
    assert!(succeed(&breaker).await.was_rejected());

    breaker.reset();
    assert_eq!(breaker.state(), CircuitState::Closed);
    assert!(!succeed(&breaker).await.was_rejected());
}

#[tokio::test]
async fn registry_returns_same_breaker_for_same_name() {
    let registry = CircuitBreakerRegistry::new();

    let a = registry.get_or_create("list_all", config(2, 60_000));
    let b = registry.get_or_create("list_all", config(2, 60_000));

    fail(&a).await;
    fail(&a).await;
    assert_eq!(b.state(), CircuitState::Open);
}

#[tokio::test]
async fn registry_breakers_are_independent() {
    let registry = CircuitBreakerRegistry::new();

    let list = registry.get_or_create("list_all", config(1, 60_000));
    let create = registry.get_or_create("create", config(1, 60_000));

    fail(&list).await;
    assert_eq!(list.state(), CircuitState::Open);
    assert_eq!(create.state(), CircuitState::Closed);
}

#[tokio::test]
async fn registry_health_reflects_open_circuits() {
    let registry = CircuitBreakerRegistry::new();

    let a = registry.get_or_create("a", config(1, 60_000));
    let _b = registry.get_or_create("b", config(1, 60_000));

    let health = registry.health_check();
    assert!(health.healthy);
    assert_eq!(health.total_breakers, 2);

    fail(&a).await;
    let health = registry.health_check();
    assert!(!health.healthy);
    assert_eq!(health.open, 1);
    assert_eq!(health.closed, 1);

    registry.reset_all();
    assert!(registry.health_check().healthy);
}
