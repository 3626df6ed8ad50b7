//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to exchange credentials for an access
//! token without knowing how accounts are stored or tokens are signed.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue an access token.
    ///
    /// Unknown emails and wrong passwords fail with the same unauthorized
    /// error.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error>;
}
