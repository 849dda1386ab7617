//! Wire-level data model for the upstream employee directory.
//!
//! The upstream service wraps every payload in a `{ data, message }`
//! envelope and uses `employee_*` prefixed keys on employee records.
//! Both shapes are preserved byte-for-semantics here.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// An employee record as returned by the upstream directory.
///
/// Immutable from this layer's perspective: read from or written to
/// upstream, never mutated locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "employee_name", default)]
    pub name: String,

    #[serde(rename = "employee_salary", default)]
    pub salary: i64,

    #[serde(rename = "employee_age", default)]
    pub age: u32,

    #[serde(rename = "employee_title", default)]
    pub title: String,

    #[serde(rename = "employee_email", default)]
    pub email: String,
}

/// Upstream envelope for list reads: `{ data: [Employee...], message }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeListEnvelope {
    #[serde(default)]
    pub data: Option<Vec<Employee>>,
    #[serde(default)]
    pub message: String,
}

/// Upstream envelope for single reads and creates:
/// `{ data: Employee, message, status }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeEnvelope {
    #[serde(default)]
    pub data: Option<Employee>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Caller-supplied input for employee creation, forwarded upstream
/// with plain (un-prefixed) keys.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = 0))]
    pub salary: i64,

    #[validate(range(min = 1))]
    pub age: u32,

    #[serde(default)]
    pub title: String,
}

/// Upstream delete requests are keyed by name, not id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEmployeeRequest {
    pub name: String,
}
