//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable: "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            InternalError: "user repository query failed: {message}",
        /// The username is already taken.
        DuplicateUsername { username: String } =>
            InvalidRequest: "username already exists: {username}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `DuplicateUsername` when the name exists.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by exact (case-sensitive) username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Remove a user by username, reporting whether a row was deleted.
    async fn delete_by_username(&self, username: &Username) -> Result<bool, UserPersistenceError>;

    /// List every user ordered by creation time.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;
}
