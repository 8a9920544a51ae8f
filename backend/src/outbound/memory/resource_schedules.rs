//! In-memory `ResourceScheduleRepository`.
//!
//! The backing vector is the store order used to break `created_at` ties.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{ResourceScheduleRepository, ResourceScheduleRepositoryError};
use crate::domain::{NewResourceSchedule, ResourceScheduleSnapshot, latest_per_resource};

use super::lock;

#[derive(Debug, Default)]
pub struct InMemoryResourceScheduleRepository {
    snapshots: Mutex<Vec<ResourceScheduleSnapshot>>,
}

impl InMemoryResourceScheduleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing snapshots, preserving their order.
    pub fn with_snapshots(snapshots: Vec<ResourceScheduleSnapshot>) -> Self {
        Self {
            snapshots: Mutex::new(snapshots),
        }
    }

    fn filtered(
        &self,
        keep: impl Fn(&ResourceScheduleSnapshot) -> bool,
    ) -> Vec<ResourceScheduleSnapshot> {
        lock(&self.snapshots)
            .iter()
            .filter(|snapshot| keep(snapshot))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ResourceScheduleRepository for InMemoryResourceScheduleRepository {
    async fn find_by_resource(
        &self,
        resource_name: &str,
    ) -> Result<Vec<ResourceScheduleSnapshot>, ResourceScheduleRepositoryError> {
        let wanted = resource_name.to_lowercase();
        Ok(self.filtered(|snapshot| snapshot.resource_name.to_lowercase() == wanted))
    }

    async fn find_latest_per_resource(
        &self,
    ) -> Result<Vec<ResourceScheduleSnapshot>, ResourceScheduleRepositoryError> {
        let all = lock(&self.snapshots).clone();
        Ok(latest_per_resource(all))
    }

    async fn find_by_scenario(
        &self,
        scenario_name: &str,
    ) -> Result<Vec<ResourceScheduleSnapshot>, ResourceScheduleRepositoryError> {
        Ok(self.filtered(|snapshot| snapshot.scenario_name == scenario_name))
    }

    async fn delete_by_scenario(
        &self,
        scenario_name: &str,
    ) -> Result<u64, ResourceScheduleRepositoryError> {
        let mut snapshots = lock(&self.snapshots);
        let before = snapshots.len();
        snapshots.retain(|snapshot| snapshot.scenario_name != scenario_name);
        u64::try_from(before - snapshots.len())
            .map_err(|_| ResourceScheduleRepositoryError::query("deleted count out of range"))
    }

    async fn insert(
        &self,
        snapshot: &NewResourceSchedule,
    ) -> Result<ResourceScheduleSnapshot, ResourceScheduleRepositoryError> {
        let stored = snapshot.clone().into_snapshot(Uuid::new_v4());
        lock(&self.snapshots).push(stored.clone());
        Ok(stored)
    }
}
