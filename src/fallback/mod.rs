//! Fallback Provider: deterministic degraded responses.
//!
//! One method per gateway operation. Fallbacks never fail and carry
//! no state; logging the trigger is their only side effect. Whatever
//! they return replaces the entire response for that call, so fallback
//! and real data are never mixed.

use crate::models::Employee;
use tracing::error;

pub const DELETE_FALLBACK_MESSAGE: &str = "Failed to delete employee. Please try again later.";

/// Degraded per-operation responses served when the circuit breaker
/// short-circuits.
#[derive(Debug, Clone, Default)]
pub struct FallbackProvider;

impl FallbackProvider {
    pub fn new() -> Self {
        Self
    }

    /// A single placeholder record, standing in for the collection.
    pub fn list_all(&self, cause: &str) -> Vec<Employee> {
        error!(cause = %cause, "Fallback triggered for list_all");
        vec![Employee::default()]
    }

    /// No record can be produced for the requested id.
    pub fn get_by_id(&self, cause: &str) -> Option<Employee> {
        error!(cause = %cause, "Fallback triggered for get_by_id");
        None
    }

    pub fn search_by_name(&self, cause: &str) -> Vec<Employee> {
        error!(cause = %cause, "Fallback triggered for search_by_name");
        Vec::new()
    }

    pub fn highest_salary(&self, cause: &str) -> i64 {
        error!(cause = %cause, "Fallback triggered for highest_salary");
        0
    }

    pub fn top_earner_names(&self, cause: &str) -> Vec<String> {
        error!(cause = %cause, "Fallback triggered for top_earner_names");
        Vec::new()
    }

    pub fn create(&self, cause: &str) -> Option<Employee> {
        error!(cause = %cause, "Fallback triggered for create");
        None
    }

    pub fn delete(&self, cause: &str) -> String {
        error!(cause = %cause, "Fallback triggered for delete");
        DELETE_FALLBACK_MESSAGE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_all_returns_single_placeholder() {
        let fallback = FallbackProvider::new();
        let employees = fallback.list_all("circuit open");
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0], Employee::default());
    }

    #[test]
    fn test_empty_and_zero_fallbacks() {
        let fallback = FallbackProvider::new();
        assert!(fallback.get_by_id("circuit open").is_none());
        assert!(fallback.search_by_name("circuit open").is_empty());
        assert_eq!(fallback.highest_salary("circuit open"), 0);
        assert!(fallback.top_earner_names("circuit open").is_empty());
        assert!(fallback.create("circuit open").is_none());
    }

    #[test]
    fn test_delete_fallback_message() {
        let fallback = FallbackProvider::new();
        assert_eq!(fallback.delete("circuit open"), DELETE_FALLBACK_MESSAGE);
    }
}
