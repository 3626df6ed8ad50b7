//! In-memory store adapter.
//!
//! Implements every repository port and [`UserRoleStore`] over one shared
//! state guarded by an async mutex. It mirrors the PostgreSQL constraints the
//! services rely on (unique email, owner references, cascading deletes) so
//! that service behaviour can be exercised without a database.
//!
//! [`UserRoleStore`]: crate::domain::ports::UserRoleStore

mod store;

pub use store::InMemoryStore;
