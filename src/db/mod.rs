//! SQLite storage for survey results, assessments, challenges and journals
//!
//! Repository functions take `&mut SqliteConnection` and are scoped by
//! `user_id`; services borrow a pooled connection through
//! [`Database::with_conn`].
//!
//! ## Tables
//!
//! - `survey_results` - raw answer sets (JSON)
//! - `compass_data` - one assessment per survey row
//! - `skill_progress` - challenge records, at most one `active` per user
//! - `journal_entries` - private journal
//! - `user_settings` - notification toggles

pub mod account;
pub mod diesel_schema;
pub mod journal_entries;
pub mod metrics;
pub mod models;
pub mod schema;
pub mod skill_progress;
pub mod surveys;
pub mod user_settings;

use std::path::Path;
use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use tracing::{debug, info};

use crate::error::GenmaveError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const DB_FILE_NAME: &str = "genmave.db";

/// Per-connection pragmas
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Pooled SQLite database
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open or create the database under `data_dir`
    pub fn open(data_dir: &Path, pool_size: u32) -> Result<Self, GenmaveError> {
        std::fs::create_dir_all(data_dir)?;
        let db_path = data_dir.join(DB_FILE_NAME);
        info!("Opening SQLite database at {:?}", db_path);

        let manager = ConnectionManager::<SqliteConnection>::new(db_path.to_string_lossy());
        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .connection_customizer(Box::new(ConnectionOptions))
            .build(manager)?;

        let db = Self { pool };
        db.with_conn(|conn| {
            conn.batch_execute("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")
                .map_err(|e| GenmaveError::Internal(format!("Failed to set PRAGMA: {}", e)))
        })?;
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    ///
    /// Every `:memory:` connection is its own database, so the pool holds
    /// exactly one connection and never recycles it.
    pub fn open_in_memory() -> Result<Self, GenmaveError> {
        debug!("Opening in-memory SQLite database");

        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = Pool::builder()
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(Duration::from_secs(5))
            .connection_customizer(Box::new(ConnectionOptions))
            .build(manager)?;

        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<(), GenmaveError> {
        self.with_conn(schema::init_schema)
    }

    /// Get a connection from the pool
    fn conn(&self) -> Result<DbConn, GenmaveError> {
        self.pool
            .get()
            .map_err(|e| GenmaveError::Pool(format!("Failed to get connection: {}", e)))
    }

    /// Run `f` with a pooled connection. Do not nest calls: the in-memory
    /// pool has a single connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, GenmaveError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, GenmaveError>,
    {
        let mut conn = self.conn()?;
        f(&mut conn)
    }

    /// Cheap round trip for health checks
    pub fn ping(&self) -> Result<(), GenmaveError> {
        self.with_conn(|conn| {
            conn.batch_execute("SELECT 1")?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        db.ping().unwrap();
    }

    #[test]
    fn test_open_on_disk_is_idempotent() {
        let dir = TempDir::new().unwrap();
        Database::open(dir.path(), 2).unwrap();
        let db = Database::open(dir.path(), 2).unwrap();
        db.ping().unwrap();
        assert!(dir.path().join(DB_FILE_NAME).exists());
    }
}
