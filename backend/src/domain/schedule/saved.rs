//! Schedules chosen and saved by users.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// An append-only record of a schedule a user picked.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedSchedule {
    pub id: Uuid,
    pub username: String,
    pub schedule: Value,
    pub created_at: DateTime<Utc>,
}
