//! Account registration, login and resource provisioning.
//!
//! Digest work is pushed onto Tokio's blocking pool so slow hashing never
//! stalls an async worker.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, AccountProvisioning, PasswordHasher, ProvisioningReport, SessionGrant,
    UserPersistenceError, UserRepository, UsersQuery,
};
use crate::domain::{
    Error, LoginCredentials, PasswordDigest, RegistrationCredentials, SessionTokenService, User,
    UserId, Username,
};

/// Uniform message for every failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: SessionTokenService,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountService<U, H> {
    /// Create a new service over the given repository and hasher.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        tokens: SessionTokenService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::DuplicateUsername { username } => {
                Self::username_taken(&username)
            }
            other => Error::from(other),
        }
    }

    fn username_taken(username: &str) -> Error {
        Error::invalid_request("Username already exists").with_details(json!({
            "field": "username",
            "code": "username_taken",
            "username": username,
        }))
    }

    async fn hash_password(&self, password: Zeroizing<String>) -> Result<PasswordDigest, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(Error::from)
    }

    async fn verify_password(
        &self,
        password: Zeroizing<String>,
        digest: PasswordDigest,
    ) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &digest))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(Error::from)
    }

    fn grant(&self, user: &User) -> Result<SessionGrant, Error> {
        let token = self.tokens.issue(user.id(), user.username())?;
        Ok(SessionGrant {
            user_id: *user.id(),
            username: user.username().clone(),
            token,
        })
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, credentials: RegistrationCredentials) -> Result<SessionGrant, Error> {
        let username = credentials.username().clone();
        if self
            .users
            .find_by_username(&username)
            .await
            .map_err(Self::map_user_error)?
            .is_some()
        {
            return Err(Self::username_taken(username.as_str()));
        }

        let digest = self
            .hash_password(Zeroizing::new(credentials.password().to_owned()))
            .await?;
        let user = User::new(UserId::random(), username, digest, self.clock.utc());
        self.users
            .insert(&user)
            .await
            .map_err(Self::map_user_error)?;

        info!(username = %user.username(), user_id = %user.id(), "registered user");
        self.grant(&user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<SessionGrant, Error> {
        let Some(user) = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(Self::map_user_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        };

        let matches = self
            .verify_password(
                Zeroizing::new(credentials.password().to_owned()),
                user.password_digest().clone(),
            )
            .await?;
        if !matches {
            warn!(username = %user.username(), "rejected login");
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }

        self.grant(&user)
    }
}

#[async_trait]
impl<U, H> AccountProvisioning for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn provision(
        &self,
        usernames: Vec<Username>,
        password: Zeroizing<String>,
    ) -> Result<ProvisioningReport, Error> {
        let digest = self.hash_password(password).await?;
        let mut report = ProvisioningReport::default();

        for username in usernames {
            let existed = self
                .users
                .delete_by_username(&username)
                .await
                .map_err(Self::map_user_error)?;
            let user = User::new(
                UserId::random(),
                username.clone(),
                digest.clone(),
                self.clock.utc(),
            );
            self.users
                .insert(&user)
                .await
                .map_err(Self::map_user_error)?;

            info!(username = %username, recreated = existed, "provisioned resource account");
            if existed {
                report.recreated.push(username);
            } else {
                report.created.push(username);
            }
        }

        Ok(report)
    }
}

#[async_trait]
impl<U, H> UsersQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(Self::map_user_error)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
