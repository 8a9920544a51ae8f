//! Replaces a scenario's stored schedule with a freshly computed result.
//!
//! The run is not transactional. The scenario delete is one statement and
//! each resource write is one statement; a failed write is reported and the
//! remaining resources are still written.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::ports::{
    IngestionReport, ResourceIngestion, ResourceOutcome, ResourceScheduleRepository,
    ScheduleIngestion,
};
use crate::domain::{Error, NewResourceSchedule, TaskRecord};

/// Ingestion service implementing [`ScheduleIngestion`].
#[derive(Clone)]
pub struct ScheduleIngestionService<R> {
    snapshots: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ScheduleIngestionService<R> {
    pub fn new(snapshots: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { snapshots, clock }
    }
}

/// Group `tasks` by resource, keeping task order within each group and
/// ordering groups by first appearance. Returns the groups and the number of
/// tasks with no resource.
fn partition_by_resource(tasks: Vec<TaskRecord>) -> (Vec<(String, Vec<TaskRecord>)>, usize) {
    let mut partitions: Vec<(String, Vec<TaskRecord>)> = Vec::new();
    let mut unassigned = 0;
    for task in tasks {
        let Some(resource) = task.resource().map(str::to_owned) else {
            unassigned += 1;
            continue;
        };
        match partitions.iter_mut().find(|(name, _)| *name == resource) {
            Some((_, group)) => group.push(task),
            None => partitions.push((resource, vec![task])),
        }
    }
    (partitions, unassigned)
}

#[async_trait]
impl<R> ScheduleIngestion for ScheduleIngestionService<R>
where
    R: ResourceScheduleRepository,
{
    async fn ingest(
        &self,
        scenario_name: &str,
        tasks: Vec<TaskRecord>,
    ) -> Result<IngestionReport, Error> {
        if scenario_name.trim().is_empty() {
            return Err(Error::invalid_request("scenario name must not be empty"));
        }
        let created_at = self.clock.utc();

        let replaced_snapshots = self
            .snapshots
            .delete_by_scenario(scenario_name)
            .await
            .map_err(Error::from)?;

        let (partitions, unassigned_tasks) = partition_by_resource(tasks);
        if unassigned_tasks > 0 {
            warn!(scenario_name, unassigned_tasks, "skipped tasks without a resource");
        }

        let mut resources = Vec::with_capacity(partitions.len());
        for (resource_name, tasks) in partitions {
            let task_count = tasks.len();
            let snapshot = NewResourceSchedule {
                scenario_name: scenario_name.to_owned(),
                resource_name: resource_name.clone(),
                tasks,
                created_at,
            };
            let outcome = match self.snapshots.insert(&snapshot).await {
                Ok(_) => ResourceOutcome::Written,
                Err(err) => {
                    error!(
                        scenario_name,
                        resource_name = %resource_name,
                        error = %err,
                        "failed to store snapshot"
                    );
                    ResourceOutcome::Failed {
                        message: err.to_string(),
                    }
                }
            };
            resources.push(ResourceIngestion {
                resource_name,
                task_count,
                outcome,
            });
        }

        let report = IngestionReport {
            scenario_name: scenario_name.to_owned(),
            replaced_snapshots,
            resources,
            unassigned_tasks,
            created_at,
        };
        info!(
            scenario_name,
            replaced = report.replaced_snapshots,
            resources = report.resources.len(),
            failed = report.failed_resources().count(),
            "ingested schedule"
        );
        Ok(report)
    }
}
