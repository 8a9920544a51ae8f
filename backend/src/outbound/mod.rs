//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process repositories for tests and database-less runs
//! - **argon2_hasher**: password digests
//! - **command_engine**: the external scheduling solver
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod argon2_hasher;
pub mod command_engine;
pub mod memory;
pub mod persistence;

pub use argon2_hasher::Argon2PasswordHasher;
pub use command_engine::CommandSchedulingEngine;
