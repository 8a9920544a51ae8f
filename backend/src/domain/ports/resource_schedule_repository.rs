//! Port for per-resource schedule snapshot storage.
//!
//! Snapshots are append-only between ingestion runs; a run replaces every
//! snapshot of its scenario. Adapters may pre-filter reads, but the domain
//! applies latest-wins itself and never relies on result order beyond
//! tie-breaking.

use async_trait::async_trait;

use crate::domain::{NewResourceSchedule, ResourceScheduleSnapshot};

use super::define_port_error;

define_port_error! {
    /// Errors raised by resource schedule repository adapters.
    pub enum ResourceScheduleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable: "resource schedule repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            InternalError: "resource schedule repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceScheduleRepository: Send + Sync {
    /// Snapshots whose resource name equals `resource_name` ignoring case.
    async fn find_by_resource(
        &self,
        resource_name: &str,
    ) -> Result<Vec<ResourceScheduleSnapshot>, ResourceScheduleRepositoryError>;

    /// At least the newest snapshot of every resource, in store order.
    async fn find_latest_per_resource(
        &self,
    ) -> Result<Vec<ResourceScheduleSnapshot>, ResourceScheduleRepositoryError>;

    /// Every snapshot stored for `scenario_name`, in store order.
    async fn find_by_scenario(
        &self,
        scenario_name: &str,
    ) -> Result<Vec<ResourceScheduleSnapshot>, ResourceScheduleRepositoryError>;

    /// Delete every snapshot of `scenario_name` in one statement.
    async fn delete_by_scenario(
        &self,
        scenario_name: &str,
    ) -> Result<u64, ResourceScheduleRepositoryError>;

    /// Append one snapshot in one statement.
    async fn insert(
        &self,
        snapshot: &NewResourceSchedule,
    ) -> Result<ResourceScheduleSnapshot, ResourceScheduleRepositoryError>;
}
