//! In-memory adapters for every repository port.
//!
//! Used by tests and when the server starts without a database. State lives
//! behind a `std::sync::Mutex`; a poisoned lock is recovered rather than
//! propagated because every mutation leaves the collections consistent.

mod resource_schedules;
mod saved_schedules;
mod scenarios;
mod users;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use resource_schedules::InMemoryResourceScheduleRepository;
pub use saved_schedules::InMemorySavedScheduleRepository;
pub use scenarios::InMemoryScenarioRepository;
pub use users::InMemoryUserRepository;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
