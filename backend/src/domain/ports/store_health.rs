//! Port for backing store liveness checks.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised when probing the backing store.
    pub enum StoreHealthError {
        /// The store could not be reached.
        Unavailable { message: String } => ServiceUnavailable: "store unavailable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Run a trivial round trip against the store.
    async fn ping(&self) -> Result<(), StoreHealthError>;
}

/// Health probe for deployments without a database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStoreHealth;

#[async_trait]
impl StoreHealth for FixtureStoreHealth {
    async fn ping(&self) -> Result<(), StoreHealthError> {
        Ok(())
    }
}
