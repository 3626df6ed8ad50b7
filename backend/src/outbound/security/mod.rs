//! Credential adapters: Argon2 password hashing and HS256 access tokens.

mod argon2_password_hasher;
mod jwt_token_issuer;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_token_issuer::{JwtSecret, JwtTokenIssuer};
