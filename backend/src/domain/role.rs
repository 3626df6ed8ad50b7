//! Role data model and authorization levels.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::entity_id::define_entity_id;

define_entity_id!(
    /// Stable role identifier.
    RoleId,
    "role"
);

/// Validation errors returned by the role value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleValidationError {
    #[error("role name must not be empty")]
    EmptyName,
    #[error("role name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("authorization level must not be negative")]
    NegativeAuthLevel,
}

/// Maximum length of a role name.
pub const ROLE_NAME_MAX: usize = 255;

/// Display name of a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// Validate and construct a [`RoleName`].
    pub fn new(name: impl Into<String>) -> Result<Self, RoleValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RoleValidationError::EmptyName);
        }
        if name.chars().count() > ROLE_NAME_MAX {
            return Err(RoleValidationError::NameTooLong { max: ROLE_NAME_MAX });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

impl TryFrom<String> for RoleName {
    type Error = RoleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Integer rank of a role; higher is more privileged.
///
/// A user's effective level is the maximum over their roles, or
/// [`AuthLevel::NONE`] when they hold none.
///
/// # Examples
/// ```
/// use todo_backend::domain::AuthLevel;
///
/// let levels = [AuthLevel::new(1).unwrap(), AuthLevel::new(3).unwrap()];
/// let effective = levels.into_iter().max().unwrap_or(AuthLevel::NONE);
/// assert_eq!(effective.value(), 3);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct AuthLevel(i32);

impl AuthLevel {
    /// Level of a user without any role.
    pub const NONE: Self = Self(0);

    /// Validate and construct an [`AuthLevel`].
    pub const fn new(level: i32) -> Result<Self, RoleValidationError> {
        if level < 0 {
            return Err(RoleValidationError::NegativeAuthLevel);
        }
        Ok(Self(level))
    }

    /// Raw integer rank.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for AuthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AuthLevel> for i32 {
    fn from(value: AuthLevel) -> Self {
        value.0
    }
}

impl TryFrom<i32> for AuthLevel {
    type Error = RoleValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authorization role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    #[schema(value_type = String, format = Uuid)]
    pub id: RoleId,
    #[schema(value_type = String, example = "Admin")]
    pub name: RoleName,
    #[schema(value_type = i32, example = 2)]
    pub auth_level: AuthLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated role attributes used for both create and full replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    pub name: RoleName,
    pub auth_level: AuthLevel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(i32::MAX)]
    fn auth_level_accepts_non_negative(#[case] raw: i32) {
        assert_eq!(AuthLevel::new(raw).map(AuthLevel::value), Ok(raw));
    }

    #[rstest]
    fn auth_level_rejects_negative() {
        assert_eq!(
            AuthLevel::new(-1),
            Err(RoleValidationError::NegativeAuthLevel)
        );
    }

    #[rstest]
    fn effective_level_defaults_to_none() {
        let effective = Vec::<AuthLevel>::new()
            .into_iter()
            .max()
            .unwrap_or(AuthLevel::NONE);
        assert_eq!(effective, AuthLevel::NONE);
    }

    #[rstest]
    fn role_name_rejects_blank() {
        assert_eq!(RoleName::new(" "), Err(RoleValidationError::EmptyName));
    }
}
