//! Scenario inputs handed to the scheduling engine.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Validation errors raised when building a [`Scenario`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioValidationError {
    #[error("scenario name must not be empty")]
    EmptyName,
    #[error("request description must be a JSON object")]
    RequestNotObject,
    #[error("request description must contain a resourceTypes array")]
    MissingResourceTypes,
}

/// Named scheduling problem: request description plus travel matrix.
///
/// ## Invariants
/// - `name` is non-blank once trimmed.
/// - `request_description` is an object holding a `resourceTypes` array.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    name: String,
    request_description: Value,
    travel_matrix: Value,
    created_at: DateTime<Utc>,
}

impl Scenario {
    pub fn try_new(
        name: impl Into<String>,
        request_description: Value,
        travel_matrix: Value,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ScenarioValidationError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(ScenarioValidationError::EmptyName);
        }
        let Some(request) = request_description.as_object() else {
            return Err(ScenarioValidationError::RequestNotObject);
        };
        if !request.get("resourceTypes").is_some_and(Value::is_array) {
            return Err(ScenarioValidationError::MissingResourceTypes);
        }

        Ok(Self {
            name,
            request_description,
            travel_matrix,
            created_at,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn request_description(&self) -> &Value {
        &self.request_description
    }

    pub fn travel_matrix(&self) -> &Value {
        &self.travel_matrix
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Solver parameters such as `epoch_date`, `global_start` and `global_end`.
    pub fn parameters(&self) -> Option<&Map<String, Value>> {
        self.request_description
            .get("parameters")
            .and_then(Value::as_object)
            .filter(|parameters| !parameters.is_empty())
    }

    pub fn epoch_date(&self) -> Option<&Value> {
        self.parameters()
            .and_then(|parameters| parameters.get("epoch_date"))
            .filter(|value| !value.is_null())
    }

    /// Names of every resource type, in request order.
    pub fn resource_names(&self) -> Vec<&str> {
        self.request_description
            .get("resourceTypes")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|resource| resource.get("name").and_then(Value::as_str))
            .collect()
    }
}
