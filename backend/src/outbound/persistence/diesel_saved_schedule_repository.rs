//! PostgreSQL-backed `SavedScheduleRepository` using Diesel ORM.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::SavedSchedule;
use crate::domain::ports::{SavedScheduleRepository, SavedScheduleRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewSavedScheduleRow;
use super::pool::DbPool;
use super::schema::saved_schedules;

/// Diesel-backed implementation of the `SavedScheduleRepository` port.
#[derive(Clone)]
pub struct DieselSavedScheduleRepository {
    pool: DbPool,
}

impl DieselSavedScheduleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SavedScheduleRepository for DieselSavedScheduleRepository {
    async fn insert(&self, schedule: &SavedSchedule) -> Result<(), SavedScheduleRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, SavedScheduleRepositoryError::connection))?;
        let row = NewSavedScheduleRow {
            id: schedule.id,
            username: schedule.username.as_str(),
            schedule: &schedule.schedule,
            created_at: schedule.created_at,
        };

        diesel::insert_into(saved_schedules::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                map_basic_diesel_error(
                    err,
                    SavedScheduleRepositoryError::query,
                    SavedScheduleRepositoryError::connection,
                )
            })
    }
}
