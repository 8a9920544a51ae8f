//! Read side of the schedule: per-user, global and per-scenario views.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{ResourceScheduleRepository, ScheduleQuery};
use crate::domain::{
    AllResourceSchedules, CurrentSchedule, Error, TaskRecord, all_current_schedules,
    current_schedule, normalize,
};

/// Schedule query service implementing [`ScheduleQuery`].
///
/// Each view is built from a single repository read, so a concurrent
/// ingestion is observed either wholly before or wholly after per resource.
#[derive(Clone)]
pub struct ScheduleQueryService<R> {
    snapshots: Arc<R>,
}

impl<R> ScheduleQueryService<R> {
    pub fn new(snapshots: Arc<R>) -> Self {
        Self { snapshots }
    }
}

#[async_trait]
impl<R> ScheduleQuery for ScheduleQueryService<R>
where
    R: ResourceScheduleRepository,
{
    async fn current_schedule(&self, username: &str) -> Result<CurrentSchedule, Error> {
        let snapshots = self
            .snapshots
            .find_by_resource(username)
            .await
            .map_err(Error::from)?;
        debug!(username, snapshots = snapshots.len(), "loaded resource snapshots");
        Ok(current_schedule(username, snapshots))
    }

    async fn all_current_schedules(&self) -> Result<AllResourceSchedules, Error> {
        let snapshots = self
            .snapshots
            .find_latest_per_resource()
            .await
            .map_err(Error::from)?;
        Ok(all_current_schedules(snapshots))
    }

    async fn scenario_tasks(&self, scenario_name: &str) -> Result<Vec<TaskRecord>, Error> {
        let snapshots = self
            .snapshots
            .find_by_scenario(scenario_name)
            .await
            .map_err(Error::from)?;
        Ok(normalize(&snapshots))
    }
}
