//! Stored per-resource schedule documents.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::TaskRecord;

/// One resource's schedule as written by a single ingestion run.
///
/// Snapshots are append-only. The current schedule of a resource is the
/// snapshot with the greatest `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceScheduleSnapshot {
    pub id: Uuid,
    pub scenario_name: String,
    pub resource_name: String,
    pub tasks: Vec<TaskRecord>,
    pub created_at: DateTime<Utc>,
}

/// Snapshot awaiting insertion; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResourceSchedule {
    pub scenario_name: String,
    pub resource_name: String,
    pub tasks: Vec<TaskRecord>,
    pub created_at: DateTime<Utc>,
}

impl NewResourceSchedule {
    /// Attach a store identifier.
    pub fn into_snapshot(self, id: Uuid) -> ResourceScheduleSnapshot {
        ResourceScheduleSnapshot {
            id,
            scenario_name: self.scenario_name,
            resource_name: self.resource_name,
            tasks: self.tasks,
            created_at: self.created_at,
        }
    }
}
