//! Driving port for saving a chosen schedule.
use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Error, SavedSchedule, Username};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SavedScheduleCommand: Send + Sync {
    /// Append `schedule` on behalf of `username`.
    async fn save(&self, username: &Username, schedule: Value) -> Result<SavedSchedule, Error>;
}
