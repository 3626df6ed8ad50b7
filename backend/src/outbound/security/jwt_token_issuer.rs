//! HS256 JSON Web Token implementation of the [`TokenIssuer`] port.
//!
//! The library checks the signature and algorithm only. Expiry is checked
//! here against the injected clock, with no leeway.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::DateTime;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{TokenError, TokenIssuer};
use crate::domain::{AccessClaims, AccessToken, UserId, Username};

/// HMAC secret used to sign tokens.
#[derive(Clone)]
pub struct JwtSecret(Zeroizing<String>);

impl JwtSecret {
    /// Wrap a secret, rejecting blank values.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            None
        } else {
            Some(Self(Zeroizing::new(secret)))
        }
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(***)")
    }
}

/// Registered and private claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies HS256 access tokens.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtTokenIssuer {
    /// Create an issuer signing with `secret` and reading time from `clock`.
    pub fn new(secret: &JwtSecret, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.required_spec_claims =
            HashSet::from(["exp".to_owned(), "sub".to_owned()]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, claims: &AccessClaims) -> Result<AccessToken, TokenError> {
        let body = Claims {
            sub: claims.user_id.to_string(),
            username: claims.username.to_string(),
            iat: self.clock.utc().timestamp(),
            exp: claims.expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &body, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| TokenError::invalid(err.to_string()))?;
        let claims = data.claims;

        if self.clock.utc().timestamp() >= claims.exp {
            return Err(TokenError::expired());
        }

        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::invalid("subject is not a user id"))?;
        let username = Username::new(claims.username)
            .map_err(|err| TokenError::invalid(err.to_string()))?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenError::invalid("expiry out of range"))?;

        Ok(AccessClaims {
            user_id,
            username,
            expires_at,
        })
    }
}
