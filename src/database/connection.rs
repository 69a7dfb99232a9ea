/*!
 * Database connection management.
 *
 * This module opens the CMS SQLite database and hands out guarded access
 * to the single connection the migration jobs share.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::errors::MigrationError;

/// Database connection wrapper with thread-safe access
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Path to the database file
    db_path: PathBuf,
    /// Thread-safe connection wrapped in Arc<Mutex>
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open an existing database at the specified path
    ///
    /// The file is never created: a mistyped path must not silently migrate
    /// an empty database.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if !db_path.is_file() {
            return Err(anyhow::anyhow!("Database file does not exist: {:?}", db_path));
        }

        info!("Opening database at: {:?}", db_path);

        let conn = Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory database");

        let conn =
            Connection::open_in_memory().context("Failed to create in-memory database")?;

        Ok(Self {
            db_path: PathBuf::from(":memory:"),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Execute a database operation with the connection
    ///
    /// This method acquires the mutex lock and executes the provided closure
    /// with access to the connection.
    pub fn execute<F, T>(&self, f: F) -> Result<T, MigrationError>
    where
        F: FnOnce(&Connection) -> Result<T, MigrationError>,
    {
        let conn = self
            .connection
            .lock()
            .map_err(|e| MigrationError::Backend(format!("Failed to acquire database lock: {}", e)))?;

        f(&conn)
    }

    /// Execute a mutable database operation with the connection
    pub fn execute_mut<F, T>(&self, f: F) -> Result<T, MigrationError>
    where
        F: FnOnce(&mut Connection) -> Result<T, MigrationError>,
    {
        let mut conn = self
            .connection
            .lock()
            .map_err(|e| MigrationError::Backend(format!("Failed to acquire database lock: {}", e)))?;

        f(&mut conn)
    }

    /// Begin a transaction and execute operations within it
    ///
    /// The transaction rolls back when the closure fails.
    pub fn transaction<F, T>(&self, f: F) -> Result<T, MigrationError>
    where
        F: FnOnce(&rusqlite::Transaction) -> Result<T, MigrationError>,
    {
        self.execute_mut(|conn| {
            let tx = conn.transaction()?;
            let result = f(&tx)?;
            tx.commit()?;

            Ok(result)
        })
    }
}
