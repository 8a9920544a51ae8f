//! PostgreSQL-backed `ResourceScheduleRepository` using Diesel ORM.
//!
//! Tasks are stored as a JSONB array per snapshot. `seq` records insertion
//! order so ties on `created_at` resolve the same way the domain does.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::min;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ResourceScheduleRepository, ResourceScheduleRepositoryError};
use crate::domain::{NewResourceSchedule, ResourceScheduleSnapshot, TaskRecord};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewResourceScheduleRow, ResourceScheduleRow};
use super::pool::{DbPool, PoolError};
use super::schema::resource_schedules;

diesel::define_sql_function! {
    fn lower(value: Text) -> Text;
}

/// Diesel-backed implementation of the `ResourceScheduleRepository` port.
#[derive(Clone)]
pub struct DieselResourceScheduleRepository {
    pool: DbPool,
}

impl DieselResourceScheduleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ResourceScheduleRepositoryError {
    map_basic_pool_error(error, ResourceScheduleRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ResourceScheduleRepositoryError {
    map_basic_diesel_error(
        error,
        ResourceScheduleRepositoryError::query,
        ResourceScheduleRepositoryError::connection,
    )
}

fn row_to_snapshot(
    row: ResourceScheduleRow,
) -> Result<ResourceScheduleSnapshot, ResourceScheduleRepositoryError> {
    let tasks: Vec<TaskRecord> = serde_json::from_value(row.tasks).map_err(|err| {
        ResourceScheduleRepositoryError::query(format!(
            "snapshot {} tasks are not an array of objects: {err}",
            row.id
        ))
    })?;
    Ok(ResourceScheduleSnapshot {
        id: row.id,
        scenario_name: row.scenario_name,
        resource_name: row.resource_name,
        tasks,
        created_at: row.created_at,
    })
}

fn rows_to_snapshots(
    rows: Vec<ResourceScheduleRow>,
) -> Result<Vec<ResourceScheduleSnapshot>, ResourceScheduleRepositoryError> {
    rows.into_iter().map(row_to_snapshot).collect()
}

#[async_trait]
impl ResourceScheduleRepository for DieselResourceScheduleRepository {
    async fn find_by_resource(
        &self,
        resource_name: &str,
    ) -> Result<Vec<ResourceScheduleSnapshot>, ResourceScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ResourceScheduleRow> = resource_schedules::table
            .filter(lower(resource_schedules::resource_name).eq(lower(resource_name)))
            .order_by(resource_schedules::seq.asc())
            .select(ResourceScheduleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_snapshots(rows)
    }

    async fn find_latest_per_resource(
        &self,
    ) -> Result<Vec<ResourceScheduleSnapshot>, ResourceScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut rows: Vec<ResourceScheduleRow> = resource_schedules::table
            .distinct_on(resource_schedules::resource_name)
            .order_by((
                resource_schedules::resource_name,
                resource_schedules::created_at.desc(),
                resource_schedules::seq.asc(),
            ))
            .select(ResourceScheduleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // DISTINCT ON sorts by name; restore first-appearance order.
        let first_seen: HashMap<String, i64> = resource_schedules::table
            .group_by(resource_schedules::resource_name)
            .select((resource_schedules::resource_name, min(resource_schedules::seq)))
            .load::<(String, Option<i64>)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .filter_map(|(name, seq)| seq.map(|seq| (name, seq)))
            .collect();
        rows.sort_by_key(|row| {
            first_seen
                .get(&row.resource_name)
                .copied()
                .unwrap_or(i64::MAX)
        });

        rows_to_snapshots(rows)
    }

    async fn find_by_scenario(
        &self,
        scenario_name: &str,
    ) -> Result<Vec<ResourceScheduleSnapshot>, ResourceScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ResourceScheduleRow> = resource_schedules::table
            .filter(resource_schedules::scenario_name.eq(scenario_name))
            .order_by(resource_schedules::seq.asc())
            .select(ResourceScheduleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_snapshots(rows)
    }

    async fn delete_by_scenario(
        &self,
        scenario_name: &str,
    ) -> Result<u64, ResourceScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            resource_schedules::table.filter(resource_schedules::scenario_name.eq(scenario_name)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        u64::try_from(deleted)
            .map_err(|_| ResourceScheduleRepositoryError::query("deleted row count out of range"))
    }

    async fn insert(
        &self,
        snapshot: &NewResourceSchedule,
    ) -> Result<ResourceScheduleSnapshot, ResourceScheduleRepositoryError> {
        let tasks = serde_json::to_value(&snapshot.tasks).map_err(|err| {
            ResourceScheduleRepositoryError::query(format!("failed to encode tasks: {err}"))
        })?;
        let id = Uuid::new_v4();
        let row = NewResourceScheduleRow {
            id,
            scenario_name: snapshot.scenario_name.as_str(),
            resource_name: snapshot.resource_name.as_str(),
            tasks,
            created_at: snapshot.created_at,
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(resource_schedules::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(snapshot.clone().into_snapshot(id))
    }
}
