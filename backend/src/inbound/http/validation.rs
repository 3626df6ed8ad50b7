//! Shared validation helpers for inbound HTTP adapters.
//!
//! Handlers parse raw path segments and request bodies here so every
//! validation failure carries the same `invalid_request` shape with a
//! `{ field, code }` details object.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, RoleValidationError, TodoValidationError, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

/// Parse a path or body value into a typed identifier.
pub(crate) fn parse_id<T: From<Uuid>>(value: &str, field: FieldName) -> Result<T, Error> {
    Uuid::parse_str(value)
        .map(T::from)
        .map_err(|_| invalid_uuid_error(field, value))
}

fn invalid_value(field: &'static str, message: String) -> Error {
    ValidationError::new(field, message).with_code(ErrorCode::InvalidValue)
}

pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    let field = match err {
        UserValidationError::EmptyUsername | UserValidationError::UsernameTooLong { .. } => {
            "username"
        }
        UserValidationError::EmptyEmail
        | UserValidationError::EmailTooLong { .. }
        | UserValidationError::InvalidEmail => "email",
        UserValidationError::EmptyPassword => "password",
    };
    invalid_value(field, err.to_string())
}

pub(crate) fn role_validation_error(err: RoleValidationError) -> Error {
    let field = match err {
        RoleValidationError::EmptyName | RoleValidationError::NameTooLong { .. } => "name",
        RoleValidationError::NegativeAuthLevel => "auth_level",
    };
    invalid_value(field, err.to_string())
}

pub(crate) fn todo_validation_error(err: TodoValidationError) -> Error {
    let field = match err {
        TodoValidationError::EmptyTitle | TodoValidationError::TitleTooLong { .. } => "title",
        TodoValidationError::DescriptionTooLong { .. } => "description",
    };
    invalid_value(field, err.to_string())
}
