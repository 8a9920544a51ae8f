//! Port for scenario storage.
use async_trait::async_trait;

use crate::domain::Scenario;

use super::define_port_error;

define_port_error! {
    /// Errors raised by scenario repository adapters.
    pub enum ScenarioRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable: "scenario repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            InternalError: "scenario repository query failed: {message}",
        /// A scenario with the same name already exists.
        Conflict { name: String } =>
            Conflict: "scenario '{name}' already exists; upload with replace to overwrite it",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScenarioRepository: Send + Sync {
    /// Insert a new scenario, failing with `Conflict` if the name is taken.
    async fn insert(&self, scenario: &Scenario) -> Result<(), ScenarioRepositoryError>;

    /// Insert or overwrite the scenario with the same name.
    async fn replace(&self, scenario: &Scenario) -> Result<(), ScenarioRepositoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Scenario>, ScenarioRepositoryError>;
}
