use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::database::schema::is_valid_identifier;
use crate::errors::AppError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Path to the CMS SQLite database
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Image reference migration settings
    #[serde(default)]
    pub image_migration: ImageMigrationConfig,

    /// Versioned record publishing settings
    #[serde(default)]
    pub version_migration: VersionMigrationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for rewriting `<img>` tags into shortcodes
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImageMigrationConfig {
    /// Content tables to scan, in order
    #[serde(default = "default_content_tables")]
    pub content_tables: Vec<String>,

    /// Column holding the HTML content
    #[serde(default = "default_content_column")]
    pub content_column: String,

    /// Asset registry layout
    #[serde(default)]
    pub assets: AssetTableConfig,
}

impl Default for ImageMigrationConfig {
    fn default() -> Self {
        Self {
            content_tables: default_content_tables(),
            content_column: default_content_column(),
            assets: AssetTableConfig::default(),
        }
    }
}

/// Where registered files live
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AssetTableConfig {
    // @field: Asset table name
    #[serde(default = "default_asset_table")]
    pub table: String,

    // @field: Column with the stored filename
    #[serde(default = "default_filename_column")]
    pub filename_column: String,

    // @field: Column with the content hash
    #[serde(default = "default_hash_column")]
    pub hash_column: String,
}

impl Default for AssetTableConfig {
    fn default() -> Self {
        Self {
            table: default_asset_table(),
            filename_column: default_filename_column(),
            hash_column: default_hash_column(),
        }
    }
}

/// Settings for publishing draft-only versioned records
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VersionMigrationConfig {
    /// Record types to sweep, in order
    #[serde(default = "default_record_types")]
    pub record_types: Vec<String>,
}

impl Default for VersionMigrationConfig {
    fn default() -> Self {
        Self {
            record_types: default_record_types(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log target of the per-item job lines: updated rows, unresolved links and
/// published records. These pass every configured level.
pub const REPORT_TARGET: &str = "cms_migrate::report";

impl LogLevel {
    /// Global `log` filter; never below `Info` so report lines reach the logger
    pub fn max_filter(self) -> log::LevelFilter {
        log::LevelFilter::from(self).max(log::LevelFilter::Info)
    }

    /// Whether a record at this level should be written
    pub fn allows(self, metadata: &log::Metadata) -> bool {
        metadata.target() == REPORT_TARGET || metadata.level() <= log::LevelFilter::from(self)
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("cms.db")
}

fn default_content_tables() -> Vec<String> {
    vec![
        "SiteTree_Live".to_string(),
        "SiteTree".to_string(),
        "SiteTree_Versions".to_string(),
    ]
}

fn default_content_column() -> String {
    "Content".to_string()
}

fn default_asset_table() -> String {
    "File".to_string()
}

fn default_filename_column() -> String {
    "FileFilename".to_string()
}

fn default_hash_column() -> String {
    "FileHash".to_string()
}

fn default_record_types() -> Vec<String> {
    vec![
        "CarouselItem".to_string(),
        "WidgetArea".to_string(),
        "Widget".to_string(),
    ]
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let config = serde_json::from_reader(reader)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let image = &self.image_migration;
        if image.content_tables.is_empty() {
            return Err(anyhow!("At least one content table is required"));
        }

        let identifiers = image
            .content_tables
            .iter()
            .chain(std::iter::once(&image.content_column))
            .chain([
                &image.assets.table,
                &image.assets.filename_column,
                &image.assets.hash_column,
            ])
            .chain(self.version_migration.record_types.iter());

        for name in identifiers {
            if !is_valid_identifier(name) {
                return Err(anyhow!("Invalid table or column name: '{}'", name));
            }
        }

        if self.version_migration.record_types.is_empty() {
            return Err(anyhow!("At least one versioned record type is required"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            image_migration: ImageMigrationConfig::default(),
            version_migration: VersionMigrationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
