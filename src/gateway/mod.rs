//! Upstream Gateway: the normalized operation set over the employee
//! directory.
//!
//! Each operation validates its input, performs exactly one upstream
//! round trip (two for delete, which resolves the employee's name
//! before deleting by name), and returns a typed result. Transport
//! failures pass through the Error Translator; unexpected local
//! failures escalate as server errors, never silently.

mod translate;

pub use translate::translate_transport_error;

use crate::error::{ApiError, Result};
use crate::models::{CreateEmployeeRequest, DeleteEmployeeRequest, Employee};
use crate::transport::DirectoryTransport;
use tracing::{debug, info};

pub const NO_DATA_FOUND: &str = "No data found";
pub const STRING_IS_NULL_OR_EMPTY: &str = "String is null or empty.";
pub const CREATE_EMPLOYEE_FAILED: &str = "Failed to create employee.";
pub const DELETE_EMPLOYEE_SUCCESS: &str =
    "Employee has been successfully deleted for given id. deleted Employee :";
pub const DELETE_EMPLOYEE_FAILED: &str = "Failed to delete employee for id ";
pub const EXCEEDED_REQUEST_LIMIT: &str =
    "You have exceeded the allowed number of requests. Please try again later.";

/// How many earners the top-earners projection returns.
const TOP_EARNER_COUNT: usize = 10;

/// The seven directory operations, composed from the transport and
/// the error translator.
pub struct EmployeeGateway<T> {
    transport: T,
}

impl<T: DirectoryTransport> EmployeeGateway<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Underlying transport, exposed for tests and diagnostics.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch the full collection; absent or empty data is a business
    /// `NotFound`, distinct from transport errors.
    async fn fetch_all_required(&self) -> Result<Vec<Employee>> {
        let employees = self.fetch_all_or_empty().await?;
        if employees.is_empty() {
            return Err(ApiError::NotFound(NO_DATA_FOUND.to_string()));
        }
        Ok(employees)
    }

    /// Fetch the full collection, treating absent data as an empty
    /// list. Aggregations and search are defined over the empty list.
    async fn fetch_all_or_empty(&self) -> Result<Vec<Employee>> {
        let envelope = self
            .transport
            .fetch_all()
            .await
            .map_err(translate_transport_error)?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// List every employee in the directory.
    pub async fn list_all(&self) -> Result<Vec<Employee>> {
        let employees = self.fetch_all_required().await?;
        debug!(count = employees.len(), "Fetched employee collection");
        Ok(employees)
    }

    /// Fetch a single employee by id.
    pub async fn get_by_id(&self, id: &str) -> Result<Employee> {
        if id.trim().is_empty() {
            return Err(ApiError::Client {
                status: 400,
                message: STRING_IS_NULL_OR_EMPTY.to_string(),
            });
        }

        let envelope = self
            .transport
            .fetch_by_id(id)
            .await
            .map_err(translate_transport_error)?;

        envelope
            .data
            .ok_or_else(|| ApiError::NotFound(NO_DATA_FOUND.to_string()))
    }

    /// Case-insensitive substring match over employee names.
    ///
    /// A blank search string is the caller's error; no matches is a
    /// normal empty result.
    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<Employee>> {
        if fragment.trim().is_empty() {
            return Err(ApiError::Client {
                status: 400,
                message: STRING_IS_NULL_OR_EMPTY.to_string(),
            });
        }

        let needle = fragment.to_lowercase();
        let employees = self.fetch_all_or_empty().await?;
        let matched: Vec<Employee> = employees
            .into_iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .collect();

        info!(count = matched.len(), "Matching employees");
        Ok(matched)
    }

    /// Highest salary across the directory; `0` for an empty directory.
    pub async fn highest_salary(&self) -> Result<i64> {
        let employees = self.fetch_all_or_empty().await?;
        let highest = employees.iter().map(|e| e.salary).max().unwrap_or(0);
        info!(highest_salary = highest, "Computed highest salary");
        Ok(highest)
    }

    /// Names of the ten highest-paid employees, salary descending.
    /// The sort is stable, so ties keep upstream order.
    pub async fn top_earner_names(&self) -> Result<Vec<String>> {
        let mut employees = self.fetch_all_or_empty().await?;
        employees.sort_by(|a, b| b.salary.cmp(&a.salary));
        let names: Vec<String> = employees
            .into_iter()
            .take(TOP_EARNER_COUNT)
            .map(|e| e.name)
            .collect();

        info!(count = names.len(), "Computed top earner names");
        Ok(names)
    }

    /// Create an employee upstream and return the stored record.
    pub async fn create(&self, request: &CreateEmployeeRequest) -> Result<Employee> {
        info!(name = %request.name, "Create employee started");
        let envelope = self
            .transport
            .create(request)
            .await
            .map_err(translate_transport_error)?;

        envelope
            .data
            .ok_or_else(|| ApiError::internal(CREATE_EMPLOYEE_FAILED))
    }

    /// Delete an employee by id.
    ///
    /// The upstream delete endpoint is keyed by name, so the name is
    /// first resolved with a GET; a 404 on that step propagates and
    /// the DELETE is never issued.
    pub async fn delete_by_id(&self, id: &str) -> Result<String> {
        info!(id = %id, "Employee delete started");
        let employee = self.get_by_id(id).await?;

        let request = DeleteEmployeeRequest {
            name: employee.name.clone(),
        };
        let status = self
            .transport
            .delete(&request)
            .await
            .map_err(translate_transport_error)?;

        if (200..300).contains(&status) {
            info!(id = %id, "Employee deleted successfully");
            Ok(format!("{}{}", DELETE_EMPLOYEE_SUCCESS, employee.name))
        } else {
            Err(ApiError::internal(format!(
                "{}{}",
                DELETE_EMPLOYEE_FAILED, id
            )))
        }
    }
}
