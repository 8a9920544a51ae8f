//! Latest-wins selection across per-resource snapshots.
//!
//! Every function here reduces explicitly by `created_at`; callers may pass
//! snapshots in any order and with any amount of history.

use std::collections::BTreeMap;

use super::{ResourceScheduleSnapshot, TaskRecord, normalize};

/// Schedule view for a single resource account.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSchedule {
    pub username: String,
    pub scenario_name: Option<String>,
    pub tasks: Vec<TaskRecord>,
}

/// Global schedule view across every resource.
#[derive(Debug, Clone, PartialEq)]
pub struct AllResourceSchedules {
    /// Set only when every winning snapshot belongs to the same scenario.
    pub scenario_name: Option<String>,
    pub resource_names: Vec<String>,
    pub resource_scenarios: BTreeMap<String, String>,
    pub tasks: Vec<TaskRecord>,
}

/// Keep the newest snapshot of each resource.
///
/// Resources appear in the order of their first snapshot. Equal timestamps
/// keep the earlier snapshot.
pub fn latest_per_resource(
    snapshots: impl IntoIterator<Item = ResourceScheduleSnapshot>,
) -> Vec<ResourceScheduleSnapshot> {
    let mut winners: Vec<ResourceScheduleSnapshot> = Vec::new();
    for snapshot in snapshots {
        match winners
            .iter_mut()
            .find(|winner| winner.resource_name == snapshot.resource_name)
        {
            Some(winner) => {
                if snapshot.created_at > winner.created_at {
                    *winner = snapshot;
                }
            }
            None => winners.push(snapshot),
        }
    }
    winners
}

/// Build the schedule for `username` from the resource snapshots.
///
/// Only snapshots whose resource name equals `username` ignoring case are
/// considered. No match yields an empty schedule.
pub fn current_schedule(
    username: &str,
    snapshots: impl IntoIterator<Item = ResourceScheduleSnapshot>,
) -> CurrentSchedule {
    let wanted = username.to_lowercase();
    let latest = snapshots
        .into_iter()
        .filter(|snapshot| snapshot.resource_name.to_lowercase() == wanted)
        .fold(None::<ResourceScheduleSnapshot>, |best, snapshot| match best {
            Some(current) if snapshot.created_at <= current.created_at => Some(current),
            _ => Some(snapshot),
        });

    match latest {
        Some(snapshot) => CurrentSchedule {
            username: username.to_owned(),
            tasks: annotated_tasks(std::slice::from_ref(&snapshot)),
            scenario_name: Some(snapshot.scenario_name),
        },
        None => CurrentSchedule {
            username: username.to_owned(),
            scenario_name: None,
            tasks: Vec::new(),
        },
    }
}

/// Merge the newest snapshot of every resource into one view.
pub fn all_current_schedules(
    snapshots: impl IntoIterator<Item = ResourceScheduleSnapshot>,
) -> AllResourceSchedules {
    let winners = latest_per_resource(snapshots);

    let resource_names = winners
        .iter()
        .map(|snapshot| snapshot.resource_name.clone())
        .collect();
    let resource_scenarios: BTreeMap<String, String> = winners
        .iter()
        .map(|snapshot| (snapshot.resource_name.clone(), snapshot.scenario_name.clone()))
        .collect();
    let scenario_name = match winners.split_first() {
        Some((first, rest))
            if rest
                .iter()
                .all(|snapshot| snapshot.scenario_name == first.scenario_name) =>
        {
            Some(first.scenario_name.clone())
        }
        _ => None,
    };

    AllResourceSchedules {
        scenario_name,
        resource_names,
        resource_scenarios,
        tasks: annotated_tasks(&winners),
    }
}

fn annotated_tasks(snapshots: &[ResourceScheduleSnapshot]) -> Vec<TaskRecord> {
    let mut tasks = normalize(snapshots);
    for task in &mut tasks {
        if !task.has_person() {
            let owner = task.resource_name().map(str::to_owned);
            if let Some(owner) = owner {
                task.set_person(owner);
            }
        }
    }
    tasks
}
