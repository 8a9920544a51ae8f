//! Open JSON task rows produced by the scheduling engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the task label once normalised.
pub const ORDER_KEY: &str = "order";
/// Engine-side alias of [`ORDER_KEY`].
pub const TASK_NAME_KEY: &str = "task_name";
/// Key holding the owning resource once normalised.
pub const RESOURCE_NAME_KEY: &str = "resource_name";
/// Engine-side alias of [`RESOURCE_NAME_KEY`].
pub const RESOURCE_KEY: &str = "resource";
/// Display owner of a task.
pub const PERSON_KEY: &str = "person";

/// Error raised when a JSON value cannot be used as a task row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("task record must be a JSON object, got {kind}")]
pub struct TaskRecordError {
    kind: &'static str,
}

/// A single schedule row.
///
/// Rows are open JSON objects. Known keys get typed accessors; every other
/// key is carried through untouched.
///
/// # Examples
/// ```
/// use schedule_backend::domain::TaskRecord;
/// use serde_json::json;
///
/// let task = TaskRecord::try_from(json!({ "task_name": "t1", "resource": "R1" })).unwrap();
/// assert_eq!(task.label(), Some("t1"));
/// assert_eq!(task.resource(), Some("R1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskRecord(Map<String, Value>);

impl TaskRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Task label: `order`, falling back to `task_name`.
    pub fn label(&self) -> Option<&str> {
        self.str_field(ORDER_KEY)
            .or_else(|| self.str_field(TASK_NAME_KEY))
    }

    /// Owning resource: `resource`, falling back to `resource_name`.
    pub fn resource(&self) -> Option<&str> {
        self.str_field(RESOURCE_KEY)
            .or_else(|| self.str_field(RESOURCE_NAME_KEY))
    }

    pub fn resource_name(&self) -> Option<&str> {
        self.str_field(RESOURCE_NAME_KEY)
    }

    /// Display owner when it is a string.
    pub fn person(&self) -> Option<&str> {
        self.str_field(PERSON_KEY)
    }

    /// Whether the row already names an owner. Only a missing key, `null` or
    /// `""` count as unset; any other value is kept as-is.
    pub fn has_person(&self) -> bool {
        match self.0.get(PERSON_KEY) {
            None | Some(Value::Null) => false,
            Some(Value::String(person)) => !person.is_empty(),
            Some(_) => true,
        }
    }

    pub fn set_person(&mut self, person: impl Into<String>) {
        self.0.insert(PERSON_KEY.to_owned(), Value::String(person.into()));
    }

    pub fn set_resource_name(&mut self, resource_name: impl Into<String>) {
        self.0
            .insert(RESOURCE_NAME_KEY.to_owned(), Value::String(resource_name.into()));
    }

    /// Move `from` to `to`. An existing `to` value wins and `from` is dropped.
    pub fn rename_key(&mut self, from: &str, to: &str) {
        if let Some(value) = self.0.remove(from) {
            self.0.entry(to.to_owned()).or_insert(value);
        }
    }

    /// Raw field access for keys without a typed accessor.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl TryFrom<Value> for TaskRecord {
    type Error = TaskRecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let kind = match value {
            Value::Object(fields) => return Ok(Self(fields)),
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
        };
        Err(TaskRecordError { kind })
    }
}

impl From<TaskRecord> for Value {
    fn from(value: TaskRecord) -> Self {
        Value::Object(value.0)
    }
}
