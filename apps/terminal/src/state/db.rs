//! # Database State
//!
//! Wraps the `Database` connection for use in commands.
//!
//! ## Thread Safety
//! The `Database` struct from `annabill-db` contains a `SqlitePool` which
//! is inherently thread-safe. Bill history can be read while a checkout is
//! writing without explicit locking.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn todays_bills(db: &DbState) -> Result<Vec<Bill>, ApiError> {
//!     Ok(db.inner().bills().todays_bills().await?)
//! }
//! ```

use annabill_db::Database;

/// Wrapper around `Database` handed to commands.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
