//! Diesel and pool error mapping shared by every repository.

use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::StoreError;

use super::pool::PoolError;

/// Map pool failures into connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> StoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StoreError::connection(message)
        }
    }
}

/// Map Diesel errors into store errors.
///
/// Unique violations become [`StoreError::Conflict`] and foreign key
/// violations [`StoreError::MissingReference`], both naming the offending
/// column; closed connections become [`StoreError::Connection`]; everything
/// else is a query error with a generic message.
pub(crate) fn map_diesel_error(error: DieselError) -> StoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => StoreError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StoreError::conflict(offending_field(info.as_ref(), "_key"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            StoreError::missing_reference(offending_field(info.as_ref(), "_fkey"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => StoreError::query("database error"),
        _ => StoreError::query("database error"),
    }
}

/// Name the column behind a constraint violation.
///
/// PostgreSQL reports it in the detail as `Key (email)=(...) already
/// exists.`; the constraint name (`users_email_key`, `todos_user_id_fkey`)
/// is the fallback.
fn offending_field(
    info: &(dyn DatabaseErrorInformation + Send + Sync),
    constraint_suffix: &str,
) -> String {
    if let Some(field) = info.details().and_then(field_from_details) {
        return field;
    }
    info.constraint_name()
        .and_then(|constraint| field_from_constraint(constraint, constraint_suffix))
        .unwrap_or_else(|| "record".to_owned())
}

fn field_from_details(details: &str) -> Option<String> {
    let (_, rest) = details.split_once("Key (")?;
    let (field, _) = rest.split_once(')')?;
    let field = field.trim();
    (!field.is_empty()).then(|| field.to_owned())
}

fn field_from_constraint(constraint: &str, suffix: &str) -> Option<String> {
    let stem = constraint.strip_suffix(suffix)?;
    let (_, field) = stem.split_once('_')?;
    (!field.is_empty()).then(|| field.to_owned())
}
