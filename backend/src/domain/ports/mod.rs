//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hasher, engine, health) are implemented by
//! outbound adapters. Driving ports are implemented by domain services and
//! called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod password_hasher;
mod resource_schedule_repository;
mod saved_schedule_command;
mod saved_schedule_repository;
mod scenario_repository;
mod schedule_ingestion;
mod schedule_options;
mod schedule_query;
mod scheduling_engine;
mod store_health;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use account_command::{MockAccountCommand, MockAccountProvisioning};
pub use account_command::{AccountCommand, AccountProvisioning, ProvisioningReport, SessionGrant};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use resource_schedule_repository::MockResourceScheduleRepository;
pub use resource_schedule_repository::{
    ResourceScheduleRepository, ResourceScheduleRepositoryError,
};
#[cfg(test)]
pub use saved_schedule_command::MockSavedScheduleCommand;
pub use saved_schedule_command::SavedScheduleCommand;
#[cfg(test)]
pub use saved_schedule_repository::MockSavedScheduleRepository;
pub use saved_schedule_repository::{SavedScheduleRepository, SavedScheduleRepositoryError};
#[cfg(test)]
pub use scenario_repository::MockScenarioRepository;
pub use scenario_repository::{ScenarioRepository, ScenarioRepositoryError};
#[cfg(test)]
pub use schedule_ingestion::MockScheduleIngestion;
pub use schedule_ingestion::{
    IngestionReport, ResourceIngestion, ResourceOutcome, ScheduleIngestion,
};
#[cfg(test)]
pub use schedule_options::MockScheduleOptions;
pub use schedule_options::{PlaceholderScheduleOptions, ScheduleOptions};
#[cfg(test)]
pub use schedule_query::MockScheduleQuery;
pub use schedule_query::ScheduleQuery;
#[cfg(test)]
pub use scheduling_engine::MockSchedulingEngine;
pub use scheduling_engine::{SchedulingEngine, SchedulingEngineError};
#[cfg(test)]
pub use store_health::MockStoreHealth;
pub use store_health::{FixtureStoreHealth, StoreHealth, StoreHealthError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
