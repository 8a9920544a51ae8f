//! Session-gated schedule handlers.
//!
//! ```text
//! POST /api/current-schedule {"token":"..."}
//! POST /api/all-resource-schedules {"token":"..."}
//! POST /api/save-schedule {"token":"...","schedule":{...}}
//! POST /api/schedule {"token":"...","taskData":{"taskName":"Inspect","duration":60}}
//! ```

use std::collections::BTreeMap;

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    AllResourceSchedules, CurrentSchedule, ScheduleOption, TaskRecord,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::{BearerToken, require_user};
use crate::inbound::http::state::HttpState;

/// Body carrying only a session token.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TokenRequest {
    #[serde(default)]
    pub token: Option<String>,
}

/// Current schedule of the authenticated resource.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CurrentScheduleResponse {
    pub username: String,
    /// Scenario of the winning snapshot; `null` when nothing is stored.
    pub scenario_name: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub tasks: Vec<TaskRecord>,
}

impl From<CurrentSchedule> for CurrentScheduleResponse {
    fn from(value: CurrentSchedule) -> Self {
        Self {
            username: value.username,
            scenario_name: value.scenario_name,
            tasks: value.tasks,
        }
    }
}

/// Latest schedule of every resource.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AllResourceSchedulesResponse {
    /// Set only when every winning snapshot comes from one scenario.
    pub scenario_name: Option<String>,
    pub resource_names: Vec<String>,
    pub resource_scenarios: BTreeMap<String, String>,
    #[schema(value_type = Vec<Object>)]
    pub tasks: Vec<TaskRecord>,
}

impl From<AllResourceSchedules> for AllResourceSchedulesResponse {
    fn from(value: AllResourceSchedules) -> Self {
        Self {
            scenario_name: value.scenario_name,
            resource_names: value.resource_names,
            resource_scenarios: value.resource_scenarios,
            tasks: value.tasks,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SaveScheduleRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub schedule: Value,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SaveScheduleResponse {
    pub message: String,
    pub schedule_id: Uuid,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ScheduleOptionsRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, rename = "taskData")]
    #[schema(value_type = Object)]
    pub task_data: Value,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ScheduleOptionsResponse {
    #[schema(value_type = Vec<Object>)]
    pub schedules: Vec<ScheduleOption>,
}

fn body_token(payload: &Option<web::Json<TokenRequest>>) -> Option<&str> {
    payload.as_ref().and_then(|body| body.token.as_deref())
}

/// Latest non-synthetic tasks of the caller's resource.
#[utoipa::path(
    post,
    path = "/api/current-schedule",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Current schedule", body = CurrentScheduleResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "currentSchedule"
)]
#[post("/current-schedule")]
pub async fn current_schedule(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    payload: Option<web::Json<TokenRequest>>,
) -> ApiResult<web::Json<CurrentScheduleResponse>> {
    let user = require_user(&state.tokens, body_token(&payload), &bearer)?;
    let schedule = state
        .schedules
        .current_schedule(user.username.as_str())
        .await?;
    Ok(web::Json(schedule.into()))
}

/// Latest tasks of every resource, annotated with `person`.
#[utoipa::path(
    post,
    path = "/api/all-resource-schedules",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "All current schedules", body = AllResourceSchedulesResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "allResourceSchedules"
)]
#[post("/all-resource-schedules")]
pub async fn all_resource_schedules(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    payload: Option<web::Json<TokenRequest>>,
) -> ApiResult<web::Json<AllResourceSchedulesResponse>> {
    require_user(&state.tokens, body_token(&payload), &bearer)?;
    let schedules = state.schedules.all_current_schedules().await?;
    Ok(web::Json(schedules.into()))
}

/// Append a schedule picked by the caller.
#[utoipa::path(
    post,
    path = "/api/save-schedule",
    request_body = SaveScheduleRequest,
    responses(
        (status = 200, description = "Schedule saved", body = SaveScheduleResponse),
        (status = 400, description = "Missing schedule", body = ErrorSchema),
        (status = 401, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "saveSchedule"
)]
#[post("/save-schedule")]
pub async fn save_schedule(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    payload: web::Json<SaveScheduleRequest>,
) -> ApiResult<web::Json<SaveScheduleResponse>> {
    let SaveScheduleRequest { token, schedule } = payload.into_inner();
    let user = require_user(&state.tokens, token.as_deref(), &bearer)?;
    let saved = state.saved_schedules.save(&user.username, schedule).await?;
    Ok(web::Json(SaveScheduleResponse {
        message: "Schedule saved successfully".to_owned(),
        schedule_id: saved.id,
    }))
}

/// Candidate placements for a new task.
#[utoipa::path(
    post,
    path = "/api/schedule",
    request_body = ScheduleOptionsRequest,
    responses(
        (status = 200, description = "Schedule options", body = ScheduleOptionsResponse),
        (status = 400, description = "Invalid task data", body = ErrorSchema),
        (status = 401, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "createScheduleOptions"
)]
#[post("/schedule")]
pub async fn create_schedule_options(
    state: web::Data<HttpState>,
    bearer: BearerToken,
    payload: web::Json<ScheduleOptionsRequest>,
) -> ApiResult<web::Json<ScheduleOptionsResponse>> {
    let ScheduleOptionsRequest { token, task_data } = payload.into_inner();
    let user = require_user(&state.tokens, token.as_deref(), &bearer)?;
    let schedules = state
        .options
        .create_options(&user.username, &task_data)
        .await?;
    Ok(web::Json(ScheduleOptionsResponse { schedules }))
}

#[cfg(test)]
#[path = "schedules_tests.rs"]
mod tests;
