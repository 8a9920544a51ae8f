//! Driving port for replacing a scenario's stored schedule.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, TaskRecord};

/// What happened to one resource during ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOutcome {
    Written,
    Failed { message: String },
}

/// Per-resource line of an [`IngestionReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIngestion {
    pub resource_name: String,
    pub task_count: usize,
    pub outcome: ResourceOutcome,
}

/// Summary of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionReport {
    pub scenario_name: String,
    /// Snapshots removed before writing.
    pub replaced_snapshots: u64,
    pub resources: Vec<ResourceIngestion>,
    /// Tasks without a resource; counted but not stored.
    pub unassigned_tasks: usize,
    pub created_at: DateTime<Utc>,
}

impl IngestionReport {
    /// Resources whose snapshot could not be written.
    pub fn failed_resources(&self) -> impl Iterator<Item = &ResourceIngestion> {
        self.resources
            .iter()
            .filter(|resource| matches!(resource.outcome, ResourceOutcome::Failed { .. }))
    }

    /// Whether every resource was written.
    pub fn is_complete(&self) -> bool {
        self.failed_resources().next().is_none()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleIngestion: Send + Sync {
    /// Replace every snapshot of `scenario_name` with `tasks`, one snapshot
    /// per resource.
    async fn ingest(
        &self,
        scenario_name: &str,
        tasks: Vec<TaskRecord>,
    ) -> Result<IngestionReport, Error>;
}
