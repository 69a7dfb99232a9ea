/*!
 * Repository layer for database operations.
 *
 * This module implements the storage traits on top of the CMS SQLite
 * database, keeping all SQL in one place.
 */

use log::debug;
use rusqlite::{params, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{AssetMatch, AssetRecord, ContentRow, VersionedRecord};
use super::schema::{self, quote_identifier, ID_COLUMN, LIVE_SUFFIX, VERSIONS_SUFFIX};
use crate::app_config::AssetTableConfig;
use crate::errors::MigrationError;
use crate::store::{AssetRegistry, ContentStore, VersionedStore};

/// Marker that selects rows for image migration
const IMAGE_MARKER: &str = "<img ";

/// Default name of the HTML content column
const DEFAULT_CONTENT_COLUMN: &str = "Content";

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
    /// Column holding HTML content in content tables
    content_column: String,
    /// Where assets are registered
    assets: AssetTableConfig,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            content_column: DEFAULT_CONTENT_COLUMN.to_string(),
            assets: AssetTableConfig::default(),
        }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> anyhow::Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Use a different content column
    pub fn with_content_column(mut self, column: impl Into<String>) -> Self {
        self.content_column = column.into();
        self
    }

    /// Use a different asset table layout
    pub fn with_asset_table(mut self, assets: AssetTableConfig) -> Self {
        self.assets = assets;
        self
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Preflight
    // =========================================================================

    /// Check that every content table and the asset table are usable
    pub fn verify_image_migration(&self, tables: &[String]) -> Result<(), MigrationError> {
        self.db.execute(|conn| {
            for table in tables {
                schema::require_columns(conn, table, &[ID_COLUMN, self.content_column.as_str()])?;
            }
            schema::require_columns(
                conn,
                &self.assets.table,
                &[
                    ID_COLUMN,
                    self.assets.filename_column.as_str(),
                    self.assets.hash_column.as_str(),
                ],
            )
        })
    }

    /// Check that the draft, live and versions tables exist for every type
    pub fn verify_version_migration(&self, record_types: &[String]) -> Result<(), MigrationError> {
        self.db.execute(|conn| {
            for record_type in record_types {
                schema::require_versioned_tables(conn, record_type)?;
            }
            Ok(())
        })
    }
}

// =========================================================================
// Content Operations
// =========================================================================

impl ContentStore for Repository {
    fn rows_with_images(&self, table: &str) -> Result<Vec<ContentRow>, MigrationError> {
        let sql = format!(
            "SELECT {id}, {col} FROM {table} WHERE instr({col}, ?1) > 0 ORDER BY {id}",
            id = quote_identifier(ID_COLUMN)?,
            col = quote_identifier(&self.content_column)?,
            table = quote_identifier(table)?,
        );

        self.db.execute(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([IMAGE_MARKER], |row| {
                    Ok(ContentRow {
                        id: row.get(0)?,
                        content: row.get(1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            debug!("Found {} rows with images in {}", rows.len(), table);
            Ok(rows)
        })
    }

    fn update_content(&self, table: &str, id: i64, content: &str) -> Result<(), MigrationError> {
        let sql = format!(
            "UPDATE {table} SET {col} = ?1 WHERE {id} = ?2",
            table = quote_identifier(table)?,
            col = quote_identifier(&self.content_column)?,
            id = quote_identifier(ID_COLUMN)?,
        );

        self.db.execute(|conn| {
            conn.execute(&sql, params![content, id])?;
            Ok(())
        })
    }
}

// =========================================================================
// Asset Operations
// =========================================================================

impl AssetRegistry for Repository {
    fn find_by_filename(&self, fragment: &str) -> Result<Option<AssetMatch>, MigrationError> {
        let sql = format!(
            "SELECT {id}, {name}, {hash} FROM {table} WHERE instr({name}, ?1) > 0 ORDER BY {id}",
            id = quote_identifier(ID_COLUMN)?,
            name = quote_identifier(&self.assets.filename_column)?,
            hash = quote_identifier(&self.assets.hash_column)?,
            table = quote_identifier(&self.assets.table)?,
        );

        self.db.execute(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let assets = stmt
                .query_map([fragment], |row| {
                    Ok(AssetRecord {
                        id: row.get(0)?,
                        filename: row.get(1)?,
                        file_hash: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let candidates = assets.len();
            Ok(assets
                .into_iter()
                .next()
                .map(|asset| AssetMatch { asset, candidates }))
        })
    }
}

// =========================================================================
// Versioned Operations
// =========================================================================

/// Draft, live and versions table names of a record type, already quoted
struct StageTables {
    draft: String,
    live: String,
    versions: String,
}

impl StageTables {
    fn for_type(record_type: &str) -> Result<Self, MigrationError> {
        Ok(Self {
            draft: quote_identifier(record_type)?,
            live: quote_identifier(&format!("{}{}", record_type, LIVE_SUFFIX))?,
            versions: quote_identifier(&format!("{}{}", record_type, VERSIONS_SUFFIX))?,
        })
    }
}

impl VersionedStore for Repository {
    fn list_records(&self, record_type: &str) -> Result<Vec<VersionedRecord>, MigrationError> {
        let tables = StageTables::for_type(record_type)?;
        let sql = format!("SELECT ID, ClassName FROM {} ORDER BY ID", tables.draft);

        self.db.execute(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let records = stmt
                .query_map([], |row| {
                    Ok(VersionedRecord {
                        id: row.get(0)?,
                        class_name: row
                            .get::<_, Option<String>>(1)?
                            .unwrap_or_else(|| record_type.to_string()),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(records)
        })
    }

    fn has_live_version(&self, record_type: &str, id: i64) -> Result<bool, MigrationError> {
        let tables = StageTables::for_type(record_type)?;
        let sql = format!("SELECT 1 FROM {} WHERE ID = ?1", tables.live);

        self.db.execute(|conn| {
            let found: Option<i64> = conn.query_row(&sql, [id], |row| row.get(0)).optional()?;
            Ok(found.is_some())
        })
    }

    fn write_to_draft(&self, record_type: &str, id: i64) -> Result<(), MigrationError> {
        let tables = StageTables::for_type(record_type)?;

        self.db.transaction(|tx| {
            let next_version: i64 = tx.query_row(
                &format!(
                    "SELECT MAX(
                        COALESCE((SELECT MAX(Version) FROM {versions} WHERE RecordID = ?1), 0),
                        COALESCE((SELECT Version FROM {draft} WHERE ID = ?1), 0)
                     ) + 1",
                    versions = tables.versions,
                    draft = tables.draft,
                ),
                [id],
                |row| row.get(0),
            )?;

            let updated = tx.execute(
                &format!("UPDATE {} SET Version = ?1 WHERE ID = ?2", tables.draft),
                params![next_version, id],
            )?;
            if updated == 0 {
                return Err(MigrationError::RecordNotFound {
                    table: record_type.to_string(),
                    id,
                });
            }

            tx.execute(
                &format!(
                    "INSERT INTO {} (RecordID, Version, WasPublished) VALUES (?1, ?2, 0)",
                    tables.versions
                ),
                params![id, next_version],
            )?;

            debug!("Wrote {} {} to draft as version {}", record_type, id, next_version);
            Ok(())
        })
    }

    fn publish(&self, record_type: &str, id: i64) -> Result<(), MigrationError> {
        let tables = StageTables::for_type(record_type)?;

        self.db.transaction(|tx| {
            let copied = tx.execute(
                &format!(
                    "INSERT OR REPLACE INTO {} SELECT * FROM {} WHERE ID = ?1",
                    tables.live, tables.draft
                ),
                [id],
            )?;
            if copied == 0 {
                return Err(MigrationError::RecordNotFound {
                    table: record_type.to_string(),
                    id,
                });
            }

            tx.execute(
                &format!(
                    "UPDATE {versions} SET WasPublished = 1
                     WHERE RecordID = ?1 AND Version = (SELECT Version FROM {draft} WHERE ID = ?1)",
                    versions = tables.versions,
                    draft = tables.draft,
                ),
                [id],
            )?;
            Ok(())
        })
    }
}
