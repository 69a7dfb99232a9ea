/*!
 * Storage seams used by the migration jobs.
 *
 * The jobs only ever talk to the CMS through these traits. The SQLite
 * `Repository` implements all three; tests plug in in-memory stores.
 */

use crate::database::models::{AssetMatch, ContentRow, VersionedRecord};
use crate::errors::MigrationError;

/// Rows of content-bearing tables
pub trait ContentStore {
    /// Fetch every row of `table` whose content contains `<img `
    fn rows_with_images(&self, table: &str) -> Result<Vec<ContentRow>, MigrationError>;

    /// Overwrite the content field of one row
    fn update_content(&self, table: &str, id: i64, content: &str) -> Result<(), MigrationError>;
}

/// Read-only registry of stored files
pub trait AssetRegistry {
    /// Find the first asset (ascending ID) whose filename contains `fragment`
    fn find_by_filename(&self, fragment: &str) -> Result<Option<AssetMatch>, MigrationError>;
}

/// Records with a draft/live duality
pub trait VersionedStore {
    /// List every record of a record type in ascending ID order
    fn list_records(&self, record_type: &str) -> Result<Vec<VersionedRecord>, MigrationError>;

    /// Whether the record already exists on the live stage
    fn has_live_version(&self, record_type: &str, id: i64) -> Result<bool, MigrationError>;

    /// Write the record to the draft stage, creating a new version
    fn write_to_draft(&self, record_type: &str, id: i64) -> Result<(), MigrationError>;

    /// Copy the draft stage of the record to the live stage
    fn publish(&self, record_type: &str, id: i64) -> Result<(), MigrationError>;
}

impl<T: ContentStore + ?Sized> ContentStore for &T {
    fn rows_with_images(&self, table: &str) -> Result<Vec<ContentRow>, MigrationError> {
        (**self).rows_with_images(table)
    }

    fn update_content(&self, table: &str, id: i64, content: &str) -> Result<(), MigrationError> {
        (**self).update_content(table, id, content)
    }
}

impl<T: AssetRegistry + ?Sized> AssetRegistry for &T {
    fn find_by_filename(&self, fragment: &str) -> Result<Option<AssetMatch>, MigrationError> {
        (**self).find_by_filename(fragment)
    }
}

impl<T: VersionedStore + ?Sized> VersionedStore for &T {
    fn list_records(&self, record_type: &str) -> Result<Vec<VersionedRecord>, MigrationError> {
        (**self).list_records(record_type)
    }

    fn has_live_version(&self, record_type: &str, id: i64) -> Result<bool, MigrationError> {
        (**self).has_live_version(record_type, id)
    }

    fn write_to_draft(&self, record_type: &str, id: i64) -> Result<(), MigrationError> {
        (**self).write_to_draft(record_type, id)
    }

    fn publish(&self, record_type: &str, id: i64) -> Result<(), MigrationError> {
        (**self).publish(record_type, id)
    }
}
