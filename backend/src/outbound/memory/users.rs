//! In-memory `UserRepository`.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, Username};

use super::lock;

/// Users kept in insertion order; usernames are unique.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = lock(&self.users);
        if users.iter().any(|existing| existing.username() == user.username()) {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_str(),
            ));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.users)
            .iter()
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn delete_by_username(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        let mut users = lock(&self.users);
        let before = users.len();
        users.retain(|user| user.username() != username);
        Ok(users.len() != before)
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(lock(&self.users).clone())
    }
}
