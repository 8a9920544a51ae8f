//! Driving ports for account registration, login and provisioning.
//!
//! Inbound adapters call these to authenticate without knowing how users or
//! digests are stored. Handler tests substitute doubles.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{
    Error, LoginCredentials, RegistrationCredentials, SessionToken, UserId, Username,
};

/// Identity and token handed back after registration or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    pub user_id: UserId,
    pub username: Username,
    pub token: SessionToken,
}

/// Domain use-case port for self-service accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a user and issue a token. Taken usernames yield `InvalidRequest`.
    async fn register(&self, credentials: RegistrationCredentials) -> Result<SessionGrant, Error>;

    /// Check credentials and issue a token. Unknown users and wrong passwords
    /// yield the same `Unauthorized` error.
    async fn login(&self, credentials: LoginCredentials) -> Result<SessionGrant, Error>;
}

/// Result of provisioning one account per resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisioningReport {
    pub created: Vec<Username>,
    pub recreated: Vec<Username>,
}

/// Administrative port creating resource accounts with a shared password.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountProvisioning: Send + Sync {
    /// Create one account per name, replacing any existing account.
    async fn provision(
        &self,
        usernames: Vec<Username>,
        password: Zeroizing<String>,
    ) -> Result<ProvisioningReport, Error>;
}
