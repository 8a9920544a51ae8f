//! Scenario administration: upload, lookup and running the engine.

use std::sync::Arc;

use mockable::Clock;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::ports::{ScenarioRepository, SchedulingEngine};
use crate::domain::{Error, Scenario, TaskRecord, Username};

/// Whether an upload created a scenario or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Created,
    Replaced,
}

/// Scenario storage use-cases backing the admin CLI.
#[derive(Clone)]
pub struct ScenarioService<S> {
    scenarios: Arc<S>,
    clock: Arc<dyn Clock>,
}


impl<S> ScenarioService<S>
where
    S: ScenarioRepository,
{
    pub fn new(scenarios: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { scenarios, clock }
    }

    /// Store a scenario. Existing names are refused unless `replace` is set.
    pub async fn upload(
        &self,
        name: &str,
        request_description: Value,
        travel_matrix: Value,
        replace: bool,
    ) -> Result<UploadOutcome, Error> {
        let scenario = Scenario::try_new(name, request_description, travel_matrix, self.clock.utc())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        if scenario.parameters().is_none() {
            warn!(scenario = scenario.name(), "request description has no parameters");
        }

        if !replace {
            self.scenarios
                .insert(&scenario)
                .await
                .map_err(Error::from)?;
            info!(scenario = scenario.name(), "uploaded scenario");
            return Ok(UploadOutcome::Created);
        }

        let existed = self
            .scenarios
            .find_by_name(scenario.name())
            .await
            .map_err(Error::from)?
            .is_some();
        self.scenarios
            .replace(&scenario)
            .await
            .map_err(Error::from)?;
        info!(scenario = scenario.name(), replaced = existed, "uploaded scenario");
        Ok(if existed {
            UploadOutcome::Replaced
        } else {
            UploadOutcome::Created
        })
    }

    /// Load a scenario, failing with `NotFound` when absent.
    pub async fn find(&self, name: &str) -> Result<Scenario, Error> {
        self.scenarios
            .find_by_name(name)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| Error::not_found(format!("scenario '{name}' not found")))
    }

    /// Account names for every resource of a scenario.
    pub async fn resource_usernames(&self, name: &str) -> Result<Vec<Username>, Error> {
        let scenario = self.find(name).await?;
        scenario
            .resource_names()
            .into_iter()
            .map(|resource| {
                Username::new(resource).map_err(|err| {
                    Error::invalid_request(format!("resource name '{resource}' is unusable: {err}"))
                })
            })
            .collect()
    }
}

/// Runs the external engine against a stored scenario.
#[derive(Clone)]
pub struct ScheduleRunner<E> {
    engine: Arc<E>,
}

impl<E> ScheduleRunner<E>
where
    E: SchedulingEngine,
{
    pub fn new(engine: Arc<E>) -> Self {
        Self { engine }
    }

    /// Compute task assignments for `scenario`. The scenario must carry
    /// `parameters.epoch_date`.
    pub async fn run(&self, scenario: &Scenario) -> Result<Vec<TaskRecord>, Error> {
        let epoch_date = required_epoch_date(scenario)?;
        let tasks = self
            .engine
            .compute(
                scenario.request_description(),
                scenario.travel_matrix(),
                epoch_date,
            )
            .await
            .map_err(Error::from)?;
        info!(scenario = scenario.name(), tasks = tasks.len(), "scheduling engine finished");
        Ok(tasks)
    }

    /// Ask the engine to fit `new_task` into `current_schedule`.
    ///
    /// The result is returned, not stored.
    pub async fn add_task(
        &self,
        scenario: &Scenario,
        current_schedule: &[TaskRecord],
        new_task: Value,
    ) -> Result<Vec<TaskRecord>, Error> {
        let epoch_date = required_epoch_date(scenario)?;
        let new_task = TaskRecord::try_from(new_task)
            .map_err(|err| Error::invalid_request(format!("new task: {err}")))?;
        let tasks = self
            .engine
            .add_task(
                scenario.request_description(),
                scenario.travel_matrix(),
                epoch_date,
                current_schedule,
                &new_task,
            )
            .await
            .map_err(Error::from)?;
        info!(
            scenario = scenario.name(),
            current = current_schedule.len(),
            tasks = tasks.len(),
            "scheduling engine added task"
        );
        Ok(tasks)
    }
}

fn required_epoch_date(scenario: &Scenario) -> Result<&Value, Error> {
    if scenario.parameters().is_none() {
        return Err(Error::invalid_request(format!(
            "scenario '{}' has no parameters",
            scenario.name()
        )));
    }
    scenario.epoch_date().ok_or_else(|| {
        Error::invalid_request(format!(
            "scenario '{}' has no parameters.epoch_date",
            scenario.name()
        ))
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        MockScenarioRepository, MockSchedulingEngine, ScenarioRepositoryError,
        SchedulingEngineError,
    };
    use chrono::Utc;
    use mockable::DefaultClock;
    use rstest::rstest;
    use serde_json::json;

    fn request() -> Value {
        json!({
            "resourceTypes": [{ "name": "R1" }],
            "parameters": { "epoch_date": "2026-01-05" },
        })
    }

    fn service(repo: MockScenarioRepository) -> ScenarioService<MockScenarioRepository> {
        ScenarioService::new(Arc::new(repo), Arc::new(DefaultClock))
    }

    #[rstest]
    #[tokio::test]
    async fn upload_without_replace_refuses_existing_names() {
        let mut repo = MockScenarioRepository::new();
        repo.expect_insert()
            .return_once(|_| Err(ScenarioRepositoryError::conflict("S")));
        repo.expect_replace().times(0);

        let err = service(repo)
            .upload("S", request(), json!({}), false)
            .await
            .expect_err("conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[case(true, UploadOutcome::Replaced)]
    #[case(false, UploadOutcome::Created)]
    #[tokio::test]
    async fn upload_with_replace_overwrites(
        #[case] exists: bool,
        #[case] expected: UploadOutcome,
    ) {
        let mut repo = MockScenarioRepository::new();
        repo.expect_find_by_name().return_once(move |_| {
            Ok(exists.then(|| {
                Scenario::try_new("S", request(), json!({}), Utc::now()).expect("scenario")
            }))
        });
        repo.expect_replace().times(1).return_once(|_| Ok(()));
        repo.expect_insert().times(0);

        let outcome = service(repo)
            .upload("S", request(), json!({}), true)
            .await
            .expect("upload");
        assert_eq!(outcome, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn upload_rejects_requests_without_resource_types() {
        let repo = MockScenarioRepository::new();
        let err = service(repo)
            .upload("S", json!({ "orders": [] }), json!({}), false)
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_scenario_is_not_found() {
        let mut repo = MockScenarioRepository::new();
        repo.expect_find_by_name().return_once(|_| Ok(None));
        let err = service(repo).find("ghost").await.expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn runner_passes_epoch_date_to_engine() {
        let mut engine = MockSchedulingEngine::new();
        engine
            .expect_compute()
            .withf(|_, _, epoch| *epoch == json!("2026-01-05"))
            .return_once(|_, _, _| {
                Ok(vec![
                    TaskRecord::try_from(json!({ "task_name": "t1", "resource": "R1" }))
                        .expect("task"),
                ])
            });
        let scenario = Scenario::try_new("S", request(), json!({}), Utc::now()).expect("scenario");

        let tasks = ScheduleRunner::new(Arc::new(engine))
            .run(&scenario)
            .await
            .expect("run");
        assert_eq!(tasks.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn runner_requires_parameters() {
        let mut engine = MockSchedulingEngine::new();
        engine.expect_compute().times(0);
        let scenario = Scenario::try_new(
            "S",
            json!({ "resourceTypes": [] }),
            json!({}),
            Utc::now(),
        )
        .expect("scenario");

        let err = ScheduleRunner::new(Arc::new(engine))
            .run(&scenario)
            .await
            .expect_err("missing parameters");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn runner_add_task_forwards_schedule_and_new_task() {
        let mut engine = MockSchedulingEngine::new();
        engine
            .expect_add_task()
            .withf(|_, _, epoch, current, new_task| {
                *epoch == json!("2026-01-05")
                    && current.len() == 1
                    && new_task.label() == Some("n1")
            })
            .return_once(|_, _, _, current, new_task| {
                let mut tasks = current.to_vec();
                tasks.push(new_task.clone());
                Ok(tasks)
            });
        let scenario = Scenario::try_new("S", request(), json!({}), Utc::now()).expect("scenario");
        let current = vec![TaskRecord::try_from(json!({ "order": "t1" })).expect("task")];

        let tasks = ScheduleRunner::new(Arc::new(engine))
            .add_task(&scenario, &current, json!({ "task_name": "n1", "duration": 30 }))
            .await
            .expect("add task");
        let labels: Vec<_> = tasks.iter().filter_map(TaskRecord::label).collect();
        assert_eq!(labels, vec!["t1", "n1"]);
    }

    #[rstest]
    #[case::not_an_object(json!(["n1"]))]
    #[case::null(json!(null))]
    #[tokio::test]
    async fn runner_add_task_rejects_non_object_tasks(#[case] new_task: Value) {
        let mut engine = MockSchedulingEngine::new();
        engine.expect_add_task().times(0);
        let scenario = Scenario::try_new("S", request(), json!({}), Utc::now()).expect("scenario");

        let err = ScheduleRunner::new(Arc::new(engine))
            .add_task(&scenario, &[], new_task)
            .await
            .expect_err("invalid task");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn engine_outage_is_service_unavailable() {
        let mut engine = MockSchedulingEngine::new();
        engine
            .expect_compute()
            .return_once(|_, _, _| Err(SchedulingEngineError::unavailable("no such file")));
        let scenario = Scenario::try_new("S", request(), json!({}), Utc::now()).expect("scenario");

        let err = ScheduleRunner::new(Arc::new(engine))
            .run(&scenario)
            .await
            .expect_err("engine down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
