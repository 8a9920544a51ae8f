//! Scheduling engine adapter that shells out to an external solver.
//!
//! The solver receives `{mode, request, travel_matrix, epoch_date}` as JSON
//! on stdin and must print a JSON array of task objects on stdout. `mode` is
//! `compute` or `add_task`; the latter also carries `current_schedule` and
//! `new_task`.

use std::ffi::OsString;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::TaskRecord;
use crate::domain::ports::{SchedulingEngine, SchedulingEngineError};

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum EngineMode {
    Compute,
    AddTask,
}

#[derive(Serialize)]
struct EngineInput<'a> {
    mode: EngineMode,
    request: &'a Value,
    travel_matrix: &'a Value,
    epoch_date: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_schedule: Option<&'a [TaskRecord]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_task: Option<&'a TaskRecord>,
}

/// Runs a configured program once per computation.
#[derive(Debug, Clone)]
pub struct CommandSchedulingEngine {
    command: Vec<OsString>,
}

impl CommandSchedulingEngine {
    /// Build an engine from a program and its arguments.
    pub fn new(
        program: impl Into<OsString>,
        args: impl IntoIterator<Item = impl Into<OsString>>,
    ) -> Self {
        let mut command = vec![program.into()];
        command.extend(args.into_iter().map(Into::into));
        Self { command }
    }

    fn command_label(&self) -> String {
        self.command
            .iter()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn parse_tasks(stdout: &[u8]) -> Result<Vec<TaskRecord>, SchedulingEngineError> {
    let value: Value = serde_json::from_slice(stdout)
        .map_err(|err| SchedulingEngineError::invalid_output(err.to_string()))?;
    let Value::Array(items) = value else {
        return Err(SchedulingEngineError::invalid_output(
            "expected a JSON array of tasks",
        ));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            TaskRecord::try_from(item).map_err(|err| {
                SchedulingEngineError::invalid_output(format!("task {index}: {err}"))
            })
        })
        .collect()
}

impl CommandSchedulingEngine {
    async fn run(&self, input: &EngineInput<'_>) -> Result<Vec<TaskRecord>, SchedulingEngineError> {
        let Some(program) = self.command.first() else {
            return Err(SchedulingEngineError::unavailable(
                "engine command is empty",
            ));
        };
        let payload = serde_json::to_vec(input)
            .map_err(|err| SchedulingEngineError::failed(err.to_string()))?;

        let label = self.command_label();
        let mut child = Command::new(program)
            .args(self.command.iter().skip(1))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| SchedulingEngineError::unavailable(format!("{label}: {err}")))?;

        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&payload).await,
            None => Ok(()),
        };

        let output = child
            .wait_with_output()
            .await
            .map_err(|err| SchedulingEngineError::failed(format!("{label}: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            warn!(command = %label, status = ?output.status.code(), "scheduling engine failed");
            return Err(SchedulingEngineError::failed(format!(
                "{label} exited with {:?}: {stderr}",
                output.status.code()
            )));
        }
        if let Err(err) = write_result {
            return Err(SchedulingEngineError::failed(format!(
                "{label}: failed to send input: {err}"
            )));
        }

        let tasks = parse_tasks(&output.stdout)?;
        debug!(command = %label, tasks = tasks.len(), "scheduling engine finished");
        Ok(tasks)
    }
}

#[async_trait]
impl SchedulingEngine for CommandSchedulingEngine {
    async fn compute(
        &self,
        request_description: &Value,
        travel_matrix: &Value,
        epoch_date: &Value,
    ) -> Result<Vec<TaskRecord>, SchedulingEngineError> {
        self.run(&EngineInput {
            mode: EngineMode::Compute,
            request: request_description,
            travel_matrix,
            epoch_date,
            current_schedule: None,
            new_task: None,
        })
        .await
    }

    async fn add_task(
        &self,
        request_description: &Value,
        travel_matrix: &Value,
        epoch_date: &Value,
        current_schedule: &[TaskRecord],
        new_task: &TaskRecord,
    ) -> Result<Vec<TaskRecord>, SchedulingEngineError> {
        self.run(&EngineInput {
            mode: EngineMode::AddTask,
            request: request_description,
            travel_matrix,
            epoch_date,
            current_schedule: Some(current_schedule),
            new_task: Some(new_task),
        })
        .await
    }
}
