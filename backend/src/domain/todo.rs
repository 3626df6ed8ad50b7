//! Todo data model.
//!
//! Every todo belongs to exactly one user. Reads and writes are scoped to the
//! owner; a todo owned by someone else is indistinguishable from a missing one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::entity_id::define_entity_id;
use super::UserId;

define_entity_id!(
    /// Stable todo identifier.
    TodoId,
    "todo"
);

/// Maximum length of the title and description columns.
pub const TODO_FIELD_MAX: usize = 255;

/// Validation errors returned by the todo value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
}

/// Non-empty todo title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoTitle(String);

impl TodoTitle {
    /// Validate and construct a [`TodoTitle`].
    pub fn new(title: impl Into<String>) -> Result<Self, TodoValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TodoValidationError::EmptyTitle);
        }
        if title.chars().count() > TODO_FIELD_MAX {
            return Err(TodoValidationError::TitleTooLong {
                max: TODO_FIELD_MAX,
            });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for TodoTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TodoTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<TodoTitle> for String {
    fn from(value: TodoTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for TodoTitle {
    type Error = TodoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-form todo description; may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoDescription(String);

impl TodoDescription {
    /// Validate and construct a [`TodoDescription`].
    pub fn new(description: impl Into<String>) -> Result<Self, TodoValidationError> {
        let description = description.into();
        if description.chars().count() > TODO_FIELD_MAX {
            return Err(TodoValidationError::DescriptionTooLong {
                max: TODO_FIELD_MAX,
            });
        }
        Ok(Self(description))
    }
}

impl AsRef<str> for TodoDescription {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<TodoDescription> for String {
    fn from(value: TodoDescription) -> Self {
        value.0
    }
}

impl TryFrom<String> for TodoDescription {
    type Error = TodoValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A task owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Todo {
    #[schema(value_type = String, format = Uuid)]
    pub id: TodoId,
    #[schema(value_type = String, example = "Buy milk")]
    pub title: TodoTitle,
    #[schema(value_type = String, example = "Semi-skimmed")]
    pub description: TodoDescription,
    pub is_completed: bool,
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Whether `user` owns this todo.
    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.user_id == *user
    }
}

/// Validated input for creating a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: TodoTitle,
    pub description: TodoDescription,
    pub is_completed: bool,
}

/// Partial update of a todo; `None` fields keep their stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoChanges {
    pub title: Option<TodoTitle>,
    pub description: Option<TodoDescription>,
    pub is_completed: Option<bool>,
}

impl TodoChanges {
    /// Apply the supplied fields to `todo`, leaving the rest untouched.
    pub fn apply_to(self, todo: &mut Todo) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(description) = self.description {
            todo.description = description;
        }
        if let Some(is_completed) = self.is_completed {
            todo.is_completed = is_completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_todo() -> Todo {
        let now = Utc::now();
        Todo {
            id: TodoId::generate(),
            title: TodoTitle::new("x").expect("valid title"),
            description: TodoDescription::default(),
            is_completed: false,
            user_id: UserId::generate(),
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn title_rejects_blank() {
        assert_eq!(TodoTitle::new("  "), Err(TodoValidationError::EmptyTitle));
    }

    #[rstest]
    fn description_accepts_empty() {
        assert!(TodoDescription::new("").is_ok());
    }

    #[rstest]
    fn changes_only_touch_supplied_fields() {
        let mut todo = sample_todo();
        let original_description = todo.description.clone();

        TodoChanges {
            title: Some(TodoTitle::new("y").expect("valid title")),
            description: None,
            is_completed: Some(true),
        }
        .apply_to(&mut todo);

        assert_eq!(todo.title.as_ref(), "y");
        assert_eq!(todo.description, original_description);
        assert!(todo.is_completed);
    }

    #[rstest]
    fn ownership_compares_user_ids() {
        let todo = sample_todo();
        assert!(todo.is_owned_by(&todo.user_id));
        assert!(!todo.is_owned_by(&UserId::generate()));
    }
}
