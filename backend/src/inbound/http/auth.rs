//! Bearer-token extractors used by HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! token checks and authorization-level checks here. Handlers take an
//! [`AuthenticatedUser`] or an [`AdminUser`] argument and never read the
//! `Authorization` header themselves.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::ports::TokenError;
use crate::domain::{Error, UserId, Username};

use super::state::HttpState;

const BEARER_PREFIX: &str = "bearer ";

/// Caller identity taken from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: Username,
}

/// Authenticated caller whose effective level meets the admin threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser(pub AuthenticatedUser);

fn http_state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("http state is not configured"))
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    match value.split_at_checked(BEARER_PREFIX.len()) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(BEARER_PREFIX) => {
            let token = rest.trim();
            if token.is_empty() {
                Err(Error::unauthorized("missing bearer token"))
            } else {
                Ok(token)
            }
        }
        _ => Err(Error::unauthorized("missing bearer token")),
    }
}

fn map_token_error(err: TokenError) -> Error {
    debug!(error = %err, "access token rejected");
    match err {
        TokenError::Expired => Error::unauthorized("access token expired"),
        TokenError::Invalid { .. } => Error::unauthorized("invalid access token"),
        TokenError::Signing { message } => Error::internal(message),
    }
}

fn authenticate(req: &HttpRequest, state: &HttpState) -> Result<AuthenticatedUser, Error> {
    let token = bearer_token(req)?;
    let claims = state.tokens.verify(token).map_err(map_token_error)?;
    Ok(AuthenticatedUser {
        user_id: claims.user_id,
        username: claims.username,
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(http_state(req).and_then(|state| authenticate(req, &state)))
    }
}

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolved = http_state(req)
            .and_then(|state| authenticate(req, &state).map(|user| (state, user)));
        Box::pin(async move {
            let (state, user) = resolved?;
            let level = state
                .authorization
                .effective_auth_level(&user.user_id)
                .await?;
            if level < state.admin_level {
                debug!(user_id = %user.user_id, %level, "admin route refused");
                return Err(Error::forbidden("insufficient permission"));
            }
            Ok(AdminUser(user))
        })
    }
}
