//! Port for saved schedule storage.
use async_trait::async_trait;

use crate::domain::SavedSchedule;

use super::define_port_error;

define_port_error! {
    /// Errors raised by saved schedule repository adapters.
    pub enum SavedScheduleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable: "saved schedule repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            InternalError: "saved schedule repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SavedScheduleRepository: Send + Sync {
    /// Append a saved schedule.
    async fn insert(&self, schedule: &SavedSchedule) -> Result<(), SavedScheduleRepositoryError>;
}
