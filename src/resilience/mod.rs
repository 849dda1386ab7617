//! Resilience Wrapper: breaker-guarded gateway operations.
//!
//! Each of the seven operations runs behind an independent circuit
//! breaker keyed by operation name, paired with its fallback. The
//! routing policy:
//!
//! - breaker open (or half-open with a trial already in flight):
//!   the upstream call is skipped and the fallback value is served;
//! - a server-error-class failure inside the call: the failure is
//!   recorded against the breaker and that same call is served the
//!   fallback value;
//! - typed business errors (404/429/other 4xx): breaker successes,
//!   propagated to the caller unchanged.
//!
//! A fallback result is final; it is never re-classified.

use crate::circuit_breaker::{
    BreakerVerdict, CircuitBreakerConfig, CircuitBreakerRegistry, RegistryHealth, BREAKER_METRICS,
};
use crate::error::Result;
use crate::fallback::FallbackProvider;
use crate::gateway::EmployeeGateway;
use crate::models::{CreateEmployeeRequest, Employee};
use crate::transport::DirectoryTransport;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

pub const OP_LIST_ALL: &str = "list_all";
pub const OP_GET_BY_ID: &str = "get_by_id";
pub const OP_SEARCH_BY_NAME: &str = "search_by_name";
pub const OP_HIGHEST_SALARY: &str = "highest_salary";
pub const OP_TOP_EARNER_NAMES: &str = "top_earner_names";
pub const OP_CREATE: &str = "create";
pub const OP_DELETE: &str = "delete";

const CIRCUIT_OPEN_CAUSE: &str = "circuit open";

/// How a response was produced.
///
/// `Degraded` carries a fallback value and is surfaced to callers as
/// HTTP 503; a response is always entirely one or the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Served<T> {
    Fresh(T),
    Degraded(T),
}

impl<T> Served<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Served::Degraded(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Served::Fresh(value) | Served::Degraded(value) => value,
        }
    }
}

/// The seven gateway operations, each wrapped in its own breaker with
/// a dedicated fallback.
pub struct ResilientDirectory<T> {
    gateway: EmployeeGateway<T>,
    fallback: FallbackProvider,
    breaker_config: CircuitBreakerConfig,
    registry: Arc<CircuitBreakerRegistry>,
}

impl<T: DirectoryTransport> ResilientDirectory<T> {
    pub fn new(gateway: EmployeeGateway<T>, breaker_config: CircuitBreakerConfig) -> Self {
        Self {
            gateway,
            fallback: FallbackProvider::new(),
            breaker_config,
            registry: Arc::new(CircuitBreakerRegistry::new()),
        }
    }

    /// Breaker health across all operations, for the health endpoint.
    pub fn breaker_health(&self) -> RegistryHealth {
        self.registry.health_check()
    }

    /// Registry handle, exposed for tests and operational tooling.
    pub fn registry(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.registry
    }

    /// Run one operation through its named breaker.
    ///
    /// `op` performs the real call; `fallback` builds the degraded
    /// value from the trigger description.
    async fn guard<V, Fut, Op, Fb>(&self, name: &str, op: Op, fallback: Fb) -> Result<Served<V>>
    where
        Op: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
        Fb: FnOnce(&str) -> V,
    {
        let breaker = self
            .registry
            .get_or_create(name, self.breaker_config.clone());

        match breaker.call(op).await {
            BreakerVerdict::Rejected => {
                debug!(operation = name, "Circuit open, serving fallback");
                BREAKER_METRICS
                    .fallback_total
                    .with_label_values(&[name])
                    .inc();
                Ok(Served::Degraded(fallback(CIRCUIT_OPEN_CAUSE)))
            }
            BreakerVerdict::Executed(Ok(value)) => Ok(Served::Fresh(value)),
            BreakerVerdict::Executed(Err(err)) if err.counts_toward_breaker() => {
                BREAKER_METRICS
                    .fallback_total
                    .with_label_values(&[name])
                    .inc();
                Ok(Served::Degraded(fallback(&err.to_string())))
            }
            BreakerVerdict::Executed(Err(err)) => Err(err),
        }
    }

    pub async fn list_all(&self) -> Result<Served<Vec<Employee>>> {
        self.guard(
            OP_LIST_ALL,
            || self.gateway.list_all(),
            |cause| self.fallback.list_all(cause),
        )
        .await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Served<Option<Employee>>> {
        self.guard(
            OP_GET_BY_ID,
            || async { self.gateway.get_by_id(id).await.map(Some) },
            |cause| self.fallback.get_by_id(cause),
        )
        .await
    }

    pub async fn search_by_name(&self, fragment: &str) -> Result<Served<Vec<Employee>>> {
        self.guard(
            OP_SEARCH_BY_NAME,
            || self.gateway.search_by_name(fragment),
            |cause| self.fallback.search_by_name(cause),
        )
        .await
    }

    pub async fn highest_salary(&self) -> Result<Served<i64>> {
        self.guard(
            OP_HIGHEST_SALARY,
            || self.gateway.highest_salary(),
            |cause| self.fallback.highest_salary(cause),
        )
        .await
    }

    pub async fn top_earner_names(&self) -> Result<Served<Vec<String>>> {
        self.guard(
            OP_TOP_EARNER_NAMES,
            || self.gateway.top_earner_names(),
            |cause| self.fallback.top_earner_names(cause),
        )
        .await
    }

    pub async fn create(&self, request: &CreateEmployeeRequest) -> Result<Served<Option<Employee>>> {
        self.guard(
            OP_CREATE,
            || async { self.gateway.create(request).await.map(Some) },
            |cause| self.fallback.create(cause),
        )
        .await
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<Served<String>> {
        self.guard(
            OP_DELETE,
            || self.gateway.delete_by_id(id),
            |cause| self.fallback.delete(cause),
        )
        .await
    }
}
