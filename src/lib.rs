//! Employee Directory Gateway
//!
//! A resilient HTTP façade over an upstream employee directory. Every
//! read and write goes through the upstream service; each operation is
//! guarded by its own circuit breaker and backed by a deterministic
//! fallback, so a flapping upstream degrades responses instead of
//! taking the surface down.

pub mod api;
pub mod circuit_breaker;
pub mod config;
pub mod error;
pub mod fallback;
pub mod gateway;
pub mod metrics;
pub mod models;
pub mod resilience;
pub mod transport;

pub use config::Config;
pub use error::{ApiError, Result};
pub use gateway::EmployeeGateway;
pub use resilience::{ResilientDirectory, Served};
pub use transport::{DirectoryTransport, HttpDirectoryTransport};
