//! In-memory `SavedScheduleRepository`.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::SavedSchedule;
use crate::domain::ports::{SavedScheduleRepository, SavedScheduleRepositoryError};

use super::lock;

#[derive(Debug, Default)]
pub struct InMemorySavedScheduleRepository {
    saved: Mutex<Vec<SavedSchedule>>,
}

impl InMemorySavedScheduleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every saved schedule, oldest first.
    pub fn saved(&self) -> Vec<SavedSchedule> {
        lock(&self.saved).clone()
    }
}

#[async_trait]
impl SavedScheduleRepository for InMemorySavedScheduleRepository {
    async fn insert(&self, schedule: &SavedSchedule) -> Result<(), SavedScheduleRepositoryError> {
        lock(&self.saved).push(schedule.clone());
        Ok(())
    }
}
