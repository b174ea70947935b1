//! # Database Connections
//!
//! Connection configuration and the per-call connection factory for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Per-Call Connections                               │
//! │                                                                         │
//! │  Application Startup                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure file, busy timeout, migrations        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Build connector + run migrations        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │  Arc<dyn ConnectionFactory>             │                           │
//! │  │  (shared by every repository)           │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  repository call ──► connect ──► one statement ──► close               │
//! │  (nothing is pooled or held between calls)                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## SQLite Settings
//! Every connection enables foreign keys (off by default in SQLite) and
//! waits on a busy timeout instead of failing immediately when another
//! connection holds the write lock. File databases use WAL journaling.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqliteSynchronous};
use sqlx::{ConnectOptions, Connection};
use std::fmt;
use std::fs;
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::{CategoryRepository, ProductRepository, UserRepository};

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust
/// use depot_db::DbConfig;
/// use std::time::Duration;
///
/// let config = DbConfig::new("./data/depot.db")
///     .busy_timeout(Duration::from_secs(10))
///     .run_migrations(false);
/// assert!(!config.run_migrations);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// How long a connection waits for a lock before failing.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Create the file on first connect.
    /// Default: true
    pub create_if_missing: bool,

    /// Whether to run migrations when the database is opened.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            busy_timeout: Duration::from_secs(5),
            create_if_missing: true,
            run_migrations: true,
        }
    }

    /// Sets the busy timeout.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether a missing database file is created.
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Sets whether to run migrations on open.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// A configuration pointing at a fresh, uniquely named file in the
    /// system temp directory.
    ///
    /// Every call opens its own connection, so `:memory:` databases would
    /// vanish between calls. Nothing removes the file afterwards; see
    /// [`ScratchDatabase`] for a handle that does.
    pub fn temporary() -> Self {
        let file = format!("depot-{}.db", Uuid::new_v4());
        DbConfig::new(std::env::temp_dir().join(file))
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.database_path)
            .create_if_missing(self.create_if_missing)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout)
    }
}

// =============================================================================
// Connection Factory
// =============================================================================

/// Supplies a live connection for a single repository call.
///
/// The caller owns the connection and must close it when the call is done.
#[async_trait]
pub trait ConnectionFactory: Send + Sync + fmt::Debug {
    async fn connect(&self) -> DbResult<SqliteConnection>;
}

/// Opens a new SQLite connection for every request.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    options: SqliteConnectOptions,
}

impl SqliteConnector {
    pub fn new(config: &DbConfig) -> Self {
        SqliteConnector {
            options: config.connect_options(),
        }
    }
}

#[async_trait]
impl ConnectionFactory for SqliteConnector {
    async fn connect(&self) -> DbResult<SqliteConnection> {
        self.options
            .connect()
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))
    }
}

/// Closes a connection, logging (not propagating) failures.
///
/// Called on every exit path once a statement has finished, so a failed
/// close never masks the statement's own result.
pub(crate) async fn release(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close connection");
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cloning is cheap; all clones share one connection factory.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./depot.db")).await?;
/// let low = db.products().find_low_stock().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    factory: Arc<dyn ConnectionFactory>,
}

impl Database {
    /// Opens the database described by `config`.
    ///
    /// ## What This Does
    /// 1. Builds the connection options (foreign keys, WAL, busy timeout)
    /// 2. Verifies a connection can be opened
    /// 3. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let db = Database::with_factory(Arc::new(SqliteConnector::new(&config)));

        if config.run_migrations {
            db.run_migrations().await?;
        } else if !db.health_check().await {
            return Err(DbError::ConnectionFailed(format!(
                "cannot open {}",
                config.database_path.display()
            )));
        }

        Ok(db)
    }

    /// Wraps an existing connection factory without touching the database.
    pub fn with_factory(factory: Arc<dyn ConnectionFactory>) -> Self {
        Database { factory }
    }

    /// Runs database migrations on a dedicated connection.
    ///
    /// Idempotent: already applied migrations are skipped.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        let mut conn = self.factory.connect().await?;
        let result = migrations::run_migrations(&mut conn).await;
        release(conn).await;
        result?;
        info!("Migrations complete");
        Ok(())
    }

    /// The shared connection factory.
    pub fn factory(&self) -> Arc<dyn ConnectionFactory> {
        Arc::clone(&self.factory)
    }

    /// Returns the category repository.
    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.factory())
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.factory())
    }

    /// Returns the user repository.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.factory())
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        let mut conn = match self.factory.connect().await {
            Ok(conn) => conn,
            Err(e) => {
                debug!(error = %e, "Health check could not connect");
                return false;
            }
        };
        let ok = sqlx::query("SELECT 1").execute(&mut conn).await.is_ok();
        release(conn).await;
        ok
    }
}

// =============================================================================
// Scratch Database
// =============================================================================

/// A migrated database in a fresh temp file, removed on drop together with
/// its `-wal` and `-shm` siblings.
///
/// Derefs to [`Database`]. Clones of the inner handle must not outlive it.
///
/// ## Example
/// ```rust,ignore
/// let db = ScratchDatabase::open().await?;
/// db.categories().find_all().await?;
/// // file deleted here
/// ```
#[derive(Debug)]
pub struct ScratchDatabase {
    database: Database,
    path: PathBuf,
}

impl ScratchDatabase {
    pub async fn open() -> DbResult<Self> {
        let config = DbConfig::temporary();
        let path = config.database_path.clone();
        match Database::new(config).await {
            Ok(database) => Ok(ScratchDatabase { database, path }),
            Err(e) => {
                remove_database_files(&path);
                Err(e)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Deref for ScratchDatabase {
    type Target = Database;

    fn deref(&self) -> &Database {
        &self.database
    }
}

impl Drop for ScratchDatabase {
    fn drop(&mut self) {
        remove_database_files(&self.path);
    }
}

/// Deletes a database file and the journal files WAL mode leaves next to it.
pub(crate) fn remove_database_files(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        match fs::remove_file(&file) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(file = ?file, error = %e, "Failed to remove scratch database file"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
