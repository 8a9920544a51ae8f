//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs and the schema stay private to this
//!   module.
//! - **Typed errors**: driver errors are mapped to port error enums and never
//!   leak SQL text.

mod diesel_basic_error_mapping;
mod diesel_resource_schedule_repository;
mod diesel_saved_schedule_repository;
mod diesel_scenario_repository;
mod diesel_store_health;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_resource_schedule_repository::DieselResourceScheduleRepository;
pub use diesel_saved_schedule_repository::DieselSavedScheduleRepository;
pub use diesel_scenario_repository::DieselScenarioRepository;
pub use diesel_store_health::DieselStoreHealth;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
