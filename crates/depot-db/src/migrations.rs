//! # Database Migrations
//!
//! Embedded SQL migrations for Depot.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  Database::new                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table                                          │
//! │       │                                                                 │
//! │       ├── Table doesn't exist? Create it                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs applied                                │
//! │       │                                                                 │
//! │       └── 0001_initial_schema.sql  (categories, products, users)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Run pending migrations in order, record in _sqlx_migrations           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNNN_description.sql`
//! 3. **NEVER** modify existing migrations - always add new ones

use sqlx::SqliteConnection;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations on the given connection.
///
/// Each migration runs in its own transaction; re-running is a no-op.
pub async fn run_migrations(conn: &mut SqliteConnection) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(conn).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
///
/// A database that was never migrated reports zero applied. Any other
/// failure is returned.
pub async fn migration_status(conn: &mut SqliteConnection) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(&mut *conn)
    .await?;
    if tracked == 0 {
        return Ok((total, 0));
    }

    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(&mut *conn)
            .await?;

    Ok((total, applied.max(0) as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{
        release, remove_database_files, ConnectionFactory, DbConfig, ScratchDatabase,
        SqliteConnector,
    };
    use crate::error::DbError;

    #[tokio::test]
    async fn test_status_before_and_after_migrating() {
        let config = DbConfig::temporary();
        let path = config.database_path.clone();
        let mut conn = SqliteConnector::new(&config).connect().await.unwrap();

        let (total, applied) = migration_status(&mut conn).await.unwrap();
        assert_eq!((total, applied), (MIGRATOR.migrations.len(), 0));

        run_migrations(&mut conn).await.unwrap();
        assert_eq!(migration_status(&mut conn).await.unwrap(), (total, total));

        release(conn).await;
        remove_database_files(&path);
    }

    #[tokio::test]
    async fn test_status_reports_unreadable_database() {
        let db = ScratchDatabase::open().await.unwrap();
        let mut conn = db.factory().connect().await.unwrap();
        sqlx::query("DROP TABLE _sqlx_migrations")
            .execute(&mut conn)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE _sqlx_migrations (version INTEGER)")
            .execute(&mut conn)
            .await
            .unwrap();

        // The bookkeeping table exists but cannot be counted.
        let err = migration_status(&mut conn).await.unwrap_err();
        assert!(matches!(err, DbError::QueryFailed(_)));
        release(conn).await;
    }
}
