//! Appends schedules users have chosen.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{SavedScheduleCommand, SavedScheduleRepository};
use crate::domain::{Error, SavedSchedule, Username};

#[derive(Clone)]
pub struct SavedScheduleService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> SavedScheduleService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

#[async_trait]
impl<R> SavedScheduleCommand for SavedScheduleService<R>
where
    R: SavedScheduleRepository,
{
    async fn save(&self, username: &Username, schedule: Value) -> Result<SavedSchedule, Error> {
        if schedule.is_null() {
            return Err(Error::invalid_request("schedule is required").with_details(
                serde_json::json!({ "field": "schedule", "code": "required" }),
            ));
        }
        let saved = SavedSchedule {
            id: Uuid::new_v4(),
            username: username.as_str().to_owned(),
            schedule,
            created_at: self.clock.utc(),
        };
        self.repo.insert(&saved).await.map_err(Error::from)?;
        info!(username = %username, schedule_id = %saved.id, "saved schedule");
        Ok(saved)
    }
}
