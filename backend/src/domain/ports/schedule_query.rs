//! Driving port for schedule views.
use async_trait::async_trait;

use crate::domain::{AllResourceSchedules, CurrentSchedule, Error, TaskRecord};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleQuery: Send + Sync {
    /// Newest schedule of the resource named like `username`, ignoring case.
    async fn current_schedule(&self, username: &str) -> Result<CurrentSchedule, Error>;

    /// Newest schedule of every resource, merged.
    async fn all_current_schedules(&self) -> Result<AllResourceSchedules, Error>;

    /// Normalised tasks of every snapshot stored for `scenario_name`.
    async fn scenario_tasks(&self, scenario_name: &str) -> Result<Vec<TaskRecord>, Error>;
}
