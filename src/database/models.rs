/*!
 * Database entity models.
 *
 * These structures map to rows of the CMS tables the migrations read and
 * write. They are plain data; the stores own all behaviour.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// A row of a content-bearing table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRow {
    /// Row primary key
    pub id: i64,
    /// HTML content field
    pub content: String,
}

impl ContentRow {
    /// Create a content row
    pub fn new(id: i64, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// A file registered in the asset store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Numeric asset ID, emitted as the shortcode `id`
    pub id: i64,
    /// Stored filename (may include folders)
    pub filename: String,
    /// Content hash of the current file version
    pub file_hash: String,
}

impl AssetRecord {
    /// Create an asset record
    pub fn new(id: i64, filename: impl Into<String>, file_hash: impl Into<String>) -> Self {
        Self {
            id,
            filename: filename.into(),
            file_hash: file_hash.into(),
        }
    }

    /// Leading part of the hash used as the storage subfolder
    pub fn hash_prefix(&self, len: usize) -> &str {
        match self.file_hash.char_indices().nth(len) {
            Some((idx, _)) => &self.file_hash[..idx],
            None => &self.file_hash,
        }
    }
}

/// Result of an asset lookup by filename fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMatch {
    /// First matching asset in ascending ID order
    pub asset: AssetRecord,
    /// Number of assets whose filename contained the fragment
    pub candidates: usize,
}

impl AssetMatch {
    /// Whether more than one asset matched the fragment
    pub fn is_ambiguous(&self) -> bool {
        self.candidates > 1
    }
}

/// A record of a versioned type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedRecord {
    /// Record primary key
    pub id: i64,
    /// Concrete class name stored on the record
    pub class_name: String,
}

impl VersionedRecord {
    /// Create a versioned record
    pub fn new(id: i64, class_name: impl Into<String>) -> Self {
        Self {
            id,
            class_name: class_name.into(),
        }
    }
}

impl fmt::Display for VersionedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.class_name, self.id)
    }
}
