/*!
 * Error types for the cms-migrate application.
 *
 * This module contains custom error types for the migration jobs and the
 * storage layer, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by the storage collaborators and the preflight checks.
///
/// An unresolved asset is not an error: it is recovered inside the rewriter
/// and only shows up in the run report.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// Error returned by the SQLite engine
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Error returned by a non-SQLite store implementation
    #[error("Backend error: {0}")]
    Backend(String),

    /// A configured table or column name is not a plain SQL identifier
    #[error("Invalid SQL identifier: '{0}'")]
    InvalidIdentifier(String),

    /// A configured table does not exist in the database
    #[error("Table not found: {0}")]
    MissingTable(String),

    /// A required column is missing from an existing table
    #[error("Column '{column}' not found in table '{table}'")]
    MissingColumn {
        /// Table that was inspected
        table: String,
        /// Column that was expected
        column: String,
    },

    /// A record vanished between listing and publishing
    #[error("Record {id} not found in table '{table}'")]
    RecordNotFound {
        /// Draft table name
        table: String,
        /// Record ID
        id: i64,
    },
}

/// Errors from loading and saving the configuration file
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

// Utility functions for error conversion
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
