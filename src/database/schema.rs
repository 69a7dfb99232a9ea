/*!
 * Schema inspection for the CMS database.
 *
 * The migrations run against a database they do not own, so before touching
 * anything they check that every configured table and column is present.
 * Table and column names are interpolated into SQL, which is why they must
 * pass `quote_identifier` first.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::Connection;

use crate::errors::MigrationError;

/// Suffix of the live-stage table of a versioned record type
pub const LIVE_SUFFIX: &str = "_Live";

/// Suffix of the version-history table of a versioned record type
pub const VERSIONS_SUFFIX: &str = "_Versions";

/// Primary key column shared by every CMS table
pub const ID_COLUMN: &str = "ID";

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Whether a name is a plain SQL identifier
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Validate a name and return it double-quoted for use in SQL
pub fn quote_identifier(name: &str) -> Result<String, MigrationError> {
    if !is_valid_identifier(name) {
        return Err(MigrationError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("\"{}\"", name))
}

/// Whether a table exists
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool, MigrationError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Column names of a table, in declaration order
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, MigrationError> {
    let sql = format!("PRAGMA table_info({})", quote_identifier(table)?);
    let mut stmt = conn.prepare(&sql)?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Require a table to exist and carry the given columns
pub fn require_columns(
    conn: &Connection,
    table: &str,
    columns: &[&str],
) -> Result<(), MigrationError> {
    quote_identifier(table)?;
    if !table_exists(conn, table)? {
        return Err(MigrationError::MissingTable(table.to_string()));
    }

    let existing = table_columns(conn, table)?;
    for column in columns {
        quote_identifier(column)?;
        if !existing.iter().any(|c| c.eq_ignore_ascii_case(column)) {
            return Err(MigrationError::MissingColumn {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
    }

    debug!("Table {} has columns {:?}", table, columns);
    Ok(())
}

/// Check the draft, live and versions tables of a versioned record type
pub fn require_versioned_tables(conn: &Connection, record_type: &str) -> Result<(), MigrationError> {
    require_columns(conn, record_type, &[ID_COLUMN, "ClassName", "Version"])?;
    require_columns(conn, &format!("{}{}", record_type, LIVE_SUFFIX), &[ID_COLUMN])?;
    require_columns(
        conn,
        &format!("{}{}", record_type, VERSIONS_SUFFIX),
        &["RecordID", "Version", "WasPublished"],
    )?;
    Ok(())
}
