/*!
 * Database module for the CMS SQLite database.
 *
 * This module provides:
 * - Connection handling for an existing database file
 * - Schema inspection and identifier quoting
 * - The `Repository` that implements the storage traits
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use repository::Repository;
