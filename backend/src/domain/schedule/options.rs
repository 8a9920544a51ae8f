//! Candidate placements for a newly requested task.
//!
//! This is a placeholder heuristic: it offers a morning and an afternoon
//! slot for the requesting user. Real optimisation belongs to the external
//! scheduling engine.

use serde::Serialize;
use serde_json::Value;

use crate::domain::Error;

/// Hours from the start of the day for the morning slot.
const MORNING_START_HOURS: f64 = 1.0;
/// Hours from the start of the day for the afternoon slot.
const AFTERNOON_START_HOURS: f64 = 4.0;

/// Validated description of the task to place.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRequest {
    task_name: String,
    duration_minutes: f64,
}

impl TaskRequest {
    /// Parse the `taskData` payload: `{taskName, duration}` with the duration
    /// in minutes as a number or numeric string.
    pub fn from_task_data(task_data: &Value) -> Result<Self, Error> {
        let task_name = task_data
            .get("taskName")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                Error::invalid_request("taskData.taskName is required").with_details(
                    serde_json::json!({ "field": "taskData.taskName", "code": "required" }),
                )
            })?;

        let duration_minutes = match task_data.get("duration") {
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|minutes| minutes.is_finite() && *minutes > 0.0)
        .ok_or_else(|| {
            Error::invalid_request("taskData.duration must be a positive number of minutes")
                .with_details(
                    serde_json::json!({ "field": "taskData.duration", "code": "invalid_duration" }),
                )
        })?;

        Ok(Self {
            task_name: task_name.to_owned(),
            duration_minutes,
        })
    }

    pub fn task_name(&self) -> &str {
        self.task_name.as_str()
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_minutes / 60.0
    }
}

/// One placed task inside a [`ScheduleOption`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedTask {
    pub person: String,
    pub task_name: String,
    pub start: f64,
    pub duration: f64,
    pub color: String,
}

/// A candidate schedule offered to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleOption {
    pub id: u32,
    pub name: String,
    pub tasks: Vec<PlannedTask>,
}

/// Offer a morning and an afternoon placement of `request` for `username`.
pub fn placeholder_options(username: &str, request: &TaskRequest) -> Vec<ScheduleOption> {
    [
        (1, MORNING_START_HOURS, "#3b82f6"),
        (2, AFTERNOON_START_HOURS, "#10b981"),
    ]
    .into_iter()
    .map(|(id, start, color)| ScheduleOption {
        id,
        name: format!("Schedule Option {id}"),
        tasks: vec![PlannedTask {
            person: username.to_owned(),
            task_name: request.task_name().to_owned(),
            start,
            duration: request.duration_hours(),
            color: color.to_owned(),
        }],
    })
    .collect()
}
