//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{resource_schedules, saved_schedules, scenarios, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_digest: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = scenarios)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScenarioRow {
    pub name: String,
    pub request_description: serde_json::Value,
    pub travel_matrix: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = scenarios)]
pub(crate) struct NewScenarioRow<'a> {
    pub name: &'a str,
    pub request_description: &'a serde_json::Value,
    pub travel_matrix: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = resource_schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ResourceScheduleRow {
    pub id: Uuid,
    pub scenario_name: String,
    pub resource_name: String,
    pub tasks: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// `seq` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = resource_schedules)]
pub(crate) struct NewResourceScheduleRow<'a> {
    pub id: Uuid,
    pub scenario_name: &'a str,
    pub resource_name: &'a str,
    pub tasks: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = saved_schedules)]
pub(crate) struct NewSavedScheduleRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub schedule: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
}
