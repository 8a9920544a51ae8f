//! Turns raw snapshots into the user-visible task table.
//!
//! Engines emit placeholder rows alongside real work: travel legs and a
//! header/footer pair per resource. Those rows are stripped here and the
//! engine's key names are mapped onto the names the viewer expects.

use super::{
    ORDER_KEY, RESOURCE_KEY, RESOURCE_NAME_KEY, ResourceScheduleSnapshot, TASK_NAME_KEY,
    TaskRecord,
};

/// Flatten `snapshots` into normalised tasks, in document then task order.
///
/// Renames `resource` to `resource_name` and `task_name` to `order` (an
/// existing `order` wins), stamps `resource_name` from the owning snapshot,
/// then drops synthetic rows.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use schedule_backend::domain::{ResourceScheduleSnapshot, TaskRecord, normalize};
/// use serde_json::json;
/// use uuid::Uuid;
///
/// let tasks = ["R1_header", "t1", "travel_to_x"]
///     .into_iter()
///     .map(|name| TaskRecord::try_from(json!({ "task_name": name })).unwrap())
///     .collect();
/// let snapshot = ResourceScheduleSnapshot {
///     id: Uuid::new_v4(),
///     scenario_name: "S".into(),
///     resource_name: "R1".into(),
///     tasks,
///     created_at: Utc::now(),
/// };
/// let normalized = normalize(&[snapshot]);
/// assert_eq!(normalized.len(), 1);
/// assert_eq!(normalized[0].label(), Some("t1"));
/// ```
pub fn normalize<'a, I>(snapshots: I) -> Vec<TaskRecord>
where
    I: IntoIterator<Item = &'a ResourceScheduleSnapshot>,
{
    snapshots
        .into_iter()
        .flat_map(|snapshot| {
            let resource_name = snapshot.resource_name.as_str();
            snapshot
                .tasks
                .iter()
                .cloned()
                .map(move |task| normalize_task(task, resource_name))
                .filter(move |task| !is_synthetic(task, resource_name))
        })
        .collect()
}

fn normalize_task(mut task: TaskRecord, resource_name: &str) -> TaskRecord {
    task.rename_key(TASK_NAME_KEY, ORDER_KEY);
    task.rename_key(RESOURCE_KEY, RESOURCE_NAME_KEY);
    task.set_resource_name(resource_name);
    task
}

/// Whether `task` is a placeholder row for `resource_name`.
///
/// Labels containing `travel` in any case are synthetic, as are the exact
/// labels `{resource_name}_header` and `{resource_name}_footer`. Tasks
/// without a string label are never synthetic.
pub fn is_synthetic(task: &TaskRecord, resource_name: &str) -> bool {
    let Some(label) = task.label() else {
        return false;
    };
    if label.to_lowercase().contains("travel") {
        return true;
    }
    label
        .strip_prefix(resource_name)
        .is_some_and(|suffix| suffix == "_header" || suffix == "_footer")
}
