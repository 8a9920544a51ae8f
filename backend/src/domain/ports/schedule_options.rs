//! Driving port for proposing placements of a new task.
use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Error, ScheduleOption, TaskRequest, Username, placeholder_options};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleOptions: Send + Sync {
    /// Candidate schedules for the task described by `task_data`.
    async fn create_options(
        &self,
        username: &Username,
        task_data: &Value,
    ) -> Result<Vec<ScheduleOption>, Error>;
}

/// Default options generator backed by the placeholder heuristic.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderScheduleOptions;

#[async_trait]
impl ScheduleOptions for PlaceholderScheduleOptions {
    async fn create_options(
        &self,
        username: &Username,
        task_data: &Value,
    ) -> Result<Vec<ScheduleOption>, Error> {
        let request = TaskRequest::from_task_data(task_data)?;
        Ok(placeholder_options(username.as_str(), &request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[tokio::test]
    async fn placeholder_validates_task_data() {
        let username = Username::new("R1").expect("username");
        let err = PlaceholderScheduleOptions
            .create_options(&username, &json!({}))
            .await
            .expect_err("missing task data");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);

        let options = PlaceholderScheduleOptions
            .create_options(&username, &json!({ "taskName": "Inspect", "duration": 60 }))
            .await
            .expect("options");
        assert_eq!(options.len(), 2);
    }
}
