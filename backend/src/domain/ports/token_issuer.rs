//! Port abstraction for signing and verifying access tokens.
use crate::domain::{AccessClaims, AccessToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The token is malformed, badly signed or uses another algorithm.
        Invalid { message: String } => "access token rejected: {message}",
        /// The token's expiry has passed.
        Expired => "access token expired",
        /// Signing failed.
        Signing { message: String } => "access token signing failed: {message}",
    }
}

/// Issues and validates symmetric-key signed access tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign `claims` into an opaque token.
    fn issue(&self, claims: &AccessClaims) -> Result<AccessToken, TokenError>;

    /// Validate a token and return its claims.
    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError>;
}
