//! Argon2id implementation of the [`PasswordHasher`] port.
//!
//! Hashing and verification are CPU bound and run on the blocking pool.
//! Hashes are stored in PHC string format, so the parameters travel with
//! each hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use tokio::task;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{Password, PasswordHash};

const DUMMY_PASSWORD: &str = "timing-equaliser";

/// Argon2id password hasher.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
    dummy: PasswordHash,
}

impl Argon2PasswordHasher {
    /// Create a hasher with the crate's default Argon2id parameters.
    ///
    /// # Errors
    ///
    /// Fails only if the dummy hash cannot be computed.
    pub fn new() -> Result<Self, PasswordHasherError> {
        Self::from_argon2(Argon2::default())
    }

    /// Create a hasher with explicit cost parameters.
    ///
    /// Low costs keep tests fast; production should use [`Self::new`].
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHasherError::Hash`] when the parameters are rejected.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordHasherError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| PasswordHasherError::hash(err.to_string()))?;
        Self::from_argon2(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn from_argon2(argon2: Argon2<'static>) -> Result<Self, PasswordHasherError> {
        let dummy = hash_blocking(&argon2, DUMMY_PASSWORD)?;
        Ok(Self { argon2, dummy })
    }
}

fn hash_blocking(argon2: &Argon2<'_>, password: &str) -> Result<PasswordHash, PasswordHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| PasswordHash::new(hash.to_string()))
        .map_err(|err| PasswordHasherError::hash(err.to_string()))
}

fn verify_blocking(
    argon2: &Argon2<'_>,
    password: &str,
    encoded: &str,
) -> Result<bool, PasswordHasherError> {
    let parsed =
        PhcHash::new(encoded).map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
    match argon2.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHasherError::malformed_hash(err.to_string())),
    }
}

fn join_error(err: task::JoinError) -> PasswordHasherError {
    PasswordHasherError::hash(format!("hashing task failed: {err}"))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHasherError> {
        let argon2 = self.argon2.clone();
        let password = password.clone();
        task::spawn_blocking(move || hash_blocking(&argon2, password.expose()))
            .await
            .map_err(join_error)?
    }

    async fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let argon2 = self.argon2.clone();
        let password = password.clone();
        let encoded = hash.as_str().to_owned();
        task::spawn_blocking(move || verify_blocking(&argon2, password.expose(), &encoded))
            .await
            .map_err(join_error)?
    }

    fn dummy_hash(&self) -> PasswordHash {
        self.dummy.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_params(8, 1, 1).expect("cheap params")
    }

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("password")
    }

    #[rstest]
    #[tokio::test]
    async fn hash_verifies_the_original_password(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash(&password("correct horse")).await.expect("hash");
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify(&password("correct horse"), &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_does_not_verify(hasher: Argon2PasswordHasher) {
        let hash = hasher.hash(&password("correct horse")).await.expect("hash");
        assert!(!hasher.verify(&password("battery staple"), &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_are_salted(hasher: Argon2PasswordHasher) {
        let first = hasher.hash(&password("same")).await.expect("hash");
        let second = hasher.hash(&password("same")).await.expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hash_is_an_error(hasher: Argon2PasswordHasher) {
        let err = hasher
            .verify(&password("anything"), &PasswordHash::new("plaintext"))
            .await
            .expect_err("not a PHC string");
        assert!(matches!(err, PasswordHasherError::MalformedHash { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn dummy_hash_rejects_real_passwords(hasher: Argon2PasswordHasher) {
        let ok = hasher
            .verify(&password("hunter2"), &hasher.dummy_hash())
            .await
            .expect("dummy hash is well formed");
        assert!(!ok);
    }

    #[rstest]
    fn invalid_params_are_rejected() {
        assert!(Argon2PasswordHasher::with_params(0, 0, 0).is_err());
    }
}
