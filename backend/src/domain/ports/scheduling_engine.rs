//! Port for the external scheduling engine.
use async_trait::async_trait;
use serde_json::Value;

use crate::domain::TaskRecord;

use super::define_port_error;

define_port_error! {
    /// Errors raised by scheduling engine adapters.
    pub enum SchedulingEngineError {
        /// The engine could not be started or reached.
        Unavailable { message: String } =>
            ServiceUnavailable: "scheduling engine unavailable: {message}",
        /// The engine ran but reported failure.
        Failed { message: String } => InternalError: "scheduling engine failed: {message}",
        /// The engine output was not a JSON array of task objects.
        InvalidOutput { message: String } =>
            InternalError: "scheduling engine output invalid: {message}",
    }
}

/// Computes an assignment of tasks to resources with time windows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchedulingEngine: Send + Sync {
    async fn compute(
        &self,
        request_description: &Value,
        travel_matrix: &Value,
        epoch_date: &Value,
    ) -> Result<Vec<TaskRecord>, SchedulingEngineError>;

    /// Fit `new_task` into `current_schedule` and return the updated tasks.
    async fn add_task(
        &self,
        request_description: &Value,
        travel_matrix: &Value,
        epoch_date: &Value,
        current_schedule: &[TaskRecord],
        new_task: &TaskRecord,
    ) -> Result<Vec<TaskRecord>, SchedulingEngineError>;
}
