//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so that the bill history
//! screen can read while checkout writes.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::bill::BillRepository;
use crate::repository::settings::SettingsRepository;

// =============================================================================
// Configuration
// =============================================================================

/// How long a query waits for a free connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle connections are closed after this long.
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Where the bill store lives and how it is opened.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("/path/to/annabill.db")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, created on first open. `:memory:` for a throwaway store.
    pub database_path: PathBuf,

    /// One counter rarely needs more than a handful. Default: 5
    pub max_connections: u32,

    /// Apply pending migrations on open. Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Private in-memory store for tests.
    ///
    /// Every connection to `:memory:` opens a separate database, so the pool
    /// is held to one connection.
    pub fn in_memory() -> Self {
        DbConfig::new(":memory:").max_connections(1)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone: clones share the same pool.
///
/// ## Usage in Commands
/// ```rust,ignore
/// async fn todays_bills(db: &DbState) -> Result<Vec<Bill>, ApiError> {
///     Ok(db.bills().todays_bills().await?)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    /// The SQLite connection pool.
    pool: SqlitePool,

    /// Prefix handed to every bill repository.
    bill_prefix: String,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite: WAL, NORMAL synchronous, foreign keys on
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        // sqlite://path creates file if not exists
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .idle_timeout(Some(IDLE_TIMEOUT))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database {
            pool,
            bill_prefix: annabill_core::DEFAULT_BILL_PREFIX.to_string(),
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Sets the prefix used for bill numbers from now on.
    ///
    /// Existing bills keep their numbers.
    pub fn with_bill_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.bill_prefix = prefix.into();
        self
    }

    pub fn bill_prefix(&self) -> &str {
        &self.bill_prefix
    }

    /// Runs database migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// Prefer repository methods when available.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the bill repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let bill = db.bills().save_bill(&new_bill).await?;
    /// ```
    pub fn bills(&self) -> BillRepository {
        BillRepository::new(self.pool.clone()).with_prefix(self.bill_prefix.clone())
    }

    /// Returns the settings repository.
    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.pool.clone())
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn answers(db: &Database) -> bool {
        sqlx::query("SELECT 1").execute(db.pool()).await.is_ok()
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(answers(&db).await);
        assert_eq!(db.bill_prefix(), "AB");
        assert!(db.bills().todays_bills().await.unwrap().is_empty());
    }

    #[test]
    fn test_config_defaults() {
        let config = DbConfig::new("/tmp/annabill-test.db");
        assert_eq!(config.max_connections, 5);
        assert!(config.run_migrations);
        assert_eq!(DbConfig::in_memory().max_connections, 1);
    }

    #[tokio::test]
    async fn test_skipping_migrations_leaves_schema_empty() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();
        assert!(db.bills().todays_bills().await.is_err());

        db.run_migrations().await.unwrap();
        assert!(db.bills().todays_bills().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closed_pool_stops_answering() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        assert!(!answers(&db).await);
    }
}
