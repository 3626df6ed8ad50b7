//! Embedded schema migrations applied at start-up.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tokio::task;
use tracing::info;

use crate::domain::ports::StoreError;

/// Migrations from the `backend/migrations` directory.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration to the database at `url`.
///
/// Runs on a blocking thread with a synchronous connection.
///
/// # Errors
///
/// Returns [`StoreError::Connection`] when the database is unreachable and
/// [`StoreError::Query`] when a migration fails.
pub async fn run_migrations(url: &str) -> Result<(), StoreError> {
    let url = url.to_owned();
    task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url)
            .map_err(|err| StoreError::connection(err.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| StoreError::query(format!("migration: {err}")))?;
        info!(applied = applied.len(), "database migrations applied");
        Ok(())
    })
    .await
    .map_err(|err| StoreError::query(format!("migration task failed: {err}")))?
}
