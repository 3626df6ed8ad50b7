//! Deterministic cache keys for entity and collection projections.
//!
//! Keys follow `<entity-plural>:<id>` for single entities,
//! `<entity-plural>:all` for full collections and
//! `<entity-plural>:all:<owner>` for owner-scoped collections.

use std::fmt;

/// Entity family a cache key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// `users:<id>` and `users:all`.
    Users,
    /// `roles:<id>` and `roles:all`.
    Roles,
    /// `todos:<id>`, `todos:all` and `todos:all:<owner>`.
    Todos,
}

impl CacheNamespace {
    /// Key prefix for the namespace.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Roles => "roles",
            Self::Todos => "todos",
        }
    }
}

/// Cache key used to store and retrieve serialised projections.
///
/// # Examples
/// ```
/// use todo_backend::domain::ports::{CacheKey, CacheNamespace};
///
/// assert_eq!(CacheKey::collection(CacheNamespace::Roles).as_str(), "roles:all");
/// assert_eq!(CacheKey::owned_collection(CacheNamespace::Todos, "u1").as_str(), "todos:all:u1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a single entity.
    pub fn entity(namespace: CacheNamespace, id: impl fmt::Display) -> Self {
        Self(format!("{}:{id}", namespace.as_str()))
    }

    /// Key for the full collection of a namespace.
    #[must_use]
    pub fn collection(namespace: CacheNamespace) -> Self {
        Self(format!("{}:all", namespace.as_str()))
    }

    /// Key for the collection belonging to one owner.
    pub fn owned_collection(namespace: CacheNamespace, owner: impl fmt::Display) -> Self {
        Self(format!("{}:all:{owner}", namespace.as_str()))
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
