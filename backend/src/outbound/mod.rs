//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories and the transactional role
//!   store, using Diesel
//! - **cache**: Redis cache, plus an in-process cache for development
//! - **memory**: in-process store implementing every persistence port
//! - **security**: Argon2 password hashing and JWT access tokens
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod memory;
pub mod persistence;
pub mod security;
