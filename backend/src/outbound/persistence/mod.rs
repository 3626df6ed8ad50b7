//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the store ports backed by PostgreSQL via
//! `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: every Diesel and pool failure is mapped to
//!   [`StoreError`](crate::domain::ports::StoreError).
//!
//! # Example
//!
//! ```ignore
//! use todo_backend::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/todos")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_role_repository;
mod diesel_todo_repository;
mod diesel_user_repository;
mod diesel_user_role_store;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_role_repository::DieselRoleRepository;
pub use diesel_todo_repository::DieselTodoRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_user_role_store::DieselUserRoleStore;
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
