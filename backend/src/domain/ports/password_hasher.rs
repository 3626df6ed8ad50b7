//! Port abstraction for slow, salted password hashing.
use async_trait::async_trait;

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing could not complete.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash is not in a format the adapter understands.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// One-way password hashing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password with a fresh salt.
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError>;

    /// Check a plaintext password against a stored hash.
    async fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;

    /// Precomputed hash compared against when no account matches, so a
    /// failed lookup costs the same as a wrong password.
    fn dummy_hash(&self) -> PasswordHash;
}
