/*!
 * Publishes draft-only versioned records.
 *
 * Records created before their type became versioned exist only on the
 * draft stage. Every such record is written to draft (creating a version)
 * and then published, so it gets a live row.
 */

use log::{debug, info};
use std::fmt;

use crate::app_config::REPORT_TARGET;
use crate::errors::MigrationError;
use crate::store::VersionedStore;

/// A record that was published during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRecord {
    /// Configured record type the record was found under
    pub record_type: String,
    /// Concrete class name stored on the record
    pub class_name: String,
    /// Record ID
    pub id: i64,
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub published: Vec<PublishedRecord>,
    pub skipped: usize,
}

impl fmt::Display for PublishReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Published: {}, already live: {}",
            self.published.len(),
            self.skipped
        )
    }
}

/// Batch job that gives every draft-only record a live version
pub struct VersionPublisher<S> {
    store: S,
    record_types: Vec<String>,
}

impl<S: VersionedStore> VersionPublisher<S> {
    /// Create a publisher over the given record types, swept in order
    pub fn new(store: S, record_types: Vec<String>) -> Self {
        Self {
            store,
            record_types,
        }
    }

    /// Publish every record that has no live version
    ///
    /// The first store failure stops the sweep.
    pub fn run(&self) -> Result<PublishReport, MigrationError> {
        let mut report = PublishReport::default();

        for record_type in &self.record_types {
            self.publish_type(record_type, &mut report)?;
        }

        info!("{}", report);
        Ok(report)
    }

    fn publish_type(&self, record_type: &str, report: &mut PublishReport) -> Result<(), MigrationError> {
        let records = self.store.list_records(record_type)?;
        debug!("{} records of type {}", records.len(), record_type);

        for record in records {
            if self.store.has_live_version(record_type, record.id)? {
                report.skipped += 1;
                continue;
            }

            info!(target: REPORT_TARGET, "Publishing {}", record);
            self.store.write_to_draft(record_type, record.id)?;
            self.store.publish(record_type, record.id)?;

            report.published.push(PublishedRecord {
                record_type: record_type.to_string(),
                class_name: record.class_name,
                id: record.id,
            });
        }
        Ok(())
    }
}
