//! Translation of driven-port failures into domain errors.
//!
//! Backend details are logged here and never reach clients: unavailable
//! backends surface as a generic service-unavailable error and failed queries
//! as an internal error that the HTTP adapter redacts.

use serde_json::json;
use tracing::warn;

use super::Error;
use super::ports::{CacheError, PasswordHasherError, StoreError};

pub(crate) fn map_store_error(error: StoreError) -> Error {
    match error {
        StoreError::Connection { message } => {
            warn!(%message, "store connection failed");
            Error::service_unavailable("store unavailable")
        }
        StoreError::Query { message } => {
            warn!(%message, "store query failed");
            Error::internal(format!("store error: {message}"))
        }
        StoreError::Conflict { field } => {
            Error::conflict(format!("{field} already exists")).with_details(json!({ "field": field }))
        }
        StoreError::MissingReference { field } => {
            Error::not_found(format!("referenced {field} does not exist"))
                .with_details(json!({ "field": field }))
        }
    }
}

pub(crate) fn map_cache_error(error: CacheError) -> Error {
    match error {
        CacheError::Backend { message } => {
            warn!(%message, "cache backend failed");
            Error::service_unavailable("cache unavailable")
        }
    }
}

pub(crate) fn map_hasher_error(error: PasswordHasherError) -> Error {
    warn!(%error, "password hashing failed");
    Error::internal(error.to_string())
}
