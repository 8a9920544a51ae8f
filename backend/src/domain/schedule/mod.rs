//! Schedule model: task rows, snapshots, scenarios and the views built on them.

mod aggregator;
mod normalizer;
mod options;
mod saved;
mod scenario;
mod snapshot;
mod task_record;

pub use aggregator::{
    AllResourceSchedules, CurrentSchedule, all_current_schedules, current_schedule,
    latest_per_resource,
};
pub use normalizer::{is_synthetic, normalize};
pub use options::{PlannedTask, ScheduleOption, TaskRequest, placeholder_options};
pub use saved::SavedSchedule;
pub use scenario::{Scenario, ScenarioValidationError};
pub use snapshot::{NewResourceSchedule, ResourceScheduleSnapshot};
pub use task_record::{
    ORDER_KEY, PERSON_KEY, RESOURCE_KEY, RESOURCE_NAME_KEY, TASK_NAME_KEY, TaskRecord,
    TaskRecordError,
};
