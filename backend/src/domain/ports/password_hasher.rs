//! Port for password hashing primitives.
//!
//! Hashing is deliberately slow; callers run these methods on a blocking
//! thread rather than an async worker.

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Digest could not be produced.
        Hash { message: String } => InternalError: "password hashing failed: {message}",
        /// Stored digest could not be parsed.
        MalformedDigest { message: String } =>
            InternalError: "stored password digest is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest of `password`.
    fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashError>;

    /// Check `password` against a digest produced by [`PasswordHasher::hash`].
    fn verify(&self, password: &str, digest: &PasswordDigest) -> Result<bool, PasswordHashError>;
}
