//! PostgreSQL-backed `ScenarioRepository` using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::Scenario;
use crate::domain::ports::{ScenarioRepository, ScenarioRepositoryError};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewScenarioRow, ScenarioRow};
use super::pool::{DbPool, PoolError};
use super::schema::scenarios;

/// Diesel-backed implementation of the `ScenarioRepository` port.
#[derive(Clone)]
pub struct DieselScenarioRepository {
    pool: DbPool,
}

impl DieselScenarioRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ScenarioRepositoryError {
    map_basic_pool_error(error, ScenarioRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ScenarioRepositoryError {
    map_basic_diesel_error(
        error,
        ScenarioRepositoryError::query,
        ScenarioRepositoryError::connection,
    )
}

fn new_row(scenario: &Scenario) -> NewScenarioRow<'_> {
    NewScenarioRow {
        name: scenario.name(),
        request_description: scenario.request_description(),
        travel_matrix: scenario.travel_matrix(),
        created_at: scenario.created_at(),
    }
}

#[async_trait]
impl ScenarioRepository for DieselScenarioRepository {
    async fn insert(&self, scenario: &Scenario) -> Result<(), ScenarioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(scenarios::table)
            .values(&new_row(scenario))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    ScenarioRepositoryError::conflict(scenario.name())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn replace(&self, scenario: &Scenario) -> Result<(), ScenarioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(scenarios::table)
            .values(&new_row(scenario))
            .on_conflict(scenarios::name)
            .do_update()
            .set((
                scenarios::request_description.eq(excluded(scenarios::request_description)),
                scenarios::travel_matrix.eq(excluded(scenarios::travel_matrix)),
                scenarios::created_at.eq(excluded(scenarios::created_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Scenario>, ScenarioRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ScenarioRow> = scenarios::table
            .filter(scenarios::name.eq(name))
            .select(ScenarioRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            Scenario::try_new(
                row.name,
                row.request_description,
                row.travel_matrix,
                row.created_at,
            )
            .map_err(|err| ScenarioRepositoryError::query(format!("stored scenario invalid: {err}")))
        })
        .transpose()
    }
}
