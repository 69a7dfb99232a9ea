/*!
 * Rewrites `<img>` tags in content tables into `[image]` shortcodes.
 *
 * Each tag's filename is resolved against the asset registry and its path
 * is rebuilt for hash-partitioned storage. Tags whose asset cannot be found
 * are left untouched and reported; the rest of the row is still written.
 */

use log::{debug, info, warn};
use std::fmt;

use super::image_tag::{find_image_tags, ImageReference};
use super::shortcode::{filename_of, hashed_src, ImageShortcode, HASH_PREFIX_LEN};
use crate::app_config::REPORT_TARGET;
use crate::errors::MigrationError;
use crate::store::{AssetRegistry, ContentStore};

/// How a single tag was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Tag becomes this shortcode
    Rewritten(ImageShortcode),
    /// No asset matched; the tag stays as-is
    Unresolved {
        /// The src value, or the raw tag when no src could be read
        src: String,
    },
}

/// Outcome of rewriting one content field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// New content
    pub content: String,
    /// Tags replaced with shortcodes
    pub rewritten: usize,
    /// Sources that could not be resolved
    pub unresolved: Vec<String>,
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub rows_scanned: usize,
    pub rows_updated: usize,
    pub tags_rewritten: usize,
    pub unresolved: Vec<String>,
}

impl RewriteReport {
    fn absorb(&mut self, outcome: &RewriteOutcome) {
        self.tags_rewritten += outcome.rewritten;
        self.unresolved.extend(outcome.unresolved.iter().cloned());
    }
}

impl fmt::Display for RewriteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rows scanned: {}, rows updated: {}, images rewritten: {}, unresolved links: {}",
            self.rows_scanned,
            self.rows_updated,
            self.tags_rewritten,
            self.unresolved.len()
        )
    }
}

/// Batch job that migrates image references in content tables
pub struct ContentImageRewriter<C, A> {
    content: C,
    assets: A,
    tables: Vec<String>,
    dry_run: bool,
}

impl<C: ContentStore, A: AssetRegistry> ContentImageRewriter<C, A> {
    /// Create a rewriter over the given tables, scanned in order
    pub fn new(content: C, assets: A, tables: Vec<String>) -> Self {
        Self {
            content,
            assets,
            tables,
            dry_run: false,
        }
    }

    /// Compute and log rewrites without persisting them
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Rewrite every row with images in every configured table
    ///
    /// Storage failures abort the run; rows already written stay written.
    pub fn run(&self) -> Result<RewriteReport, MigrationError> {
        let mut report = RewriteReport::default();

        for table in &self.tables {
            info!("Scanning {} for image tags", table);
            self.process_table(table, &mut report)?;
        }

        info!("{}", report);
        Ok(report)
    }

    fn process_table(&self, table: &str, report: &mut RewriteReport) -> Result<(), MigrationError> {
        for row in self.content.rows_with_images(table)? {
            report.rows_scanned += 1;

            let outcome = self.rewrite_content(&row.content)?;
            report.absorb(&outcome);

            if self.dry_run {
                info!(target: REPORT_TARGET, "Would update {} row with ID {}", table, row.id);
                continue;
            }

            info!(target: REPORT_TARGET, "Updating {} row with ID {}", table, row.id);
            self.content.update_content(table, row.id, &outcome.content)?;
            report.rows_updated += 1;
        }
        Ok(())
    }

    /// Rewrite all image tags in one content field
    pub fn rewrite_content(&self, content: &str) -> Result<RewriteOutcome, MigrationError> {
        let references = find_image_tags(content);
        let mut outcome = RewriteOutcome {
            content: String::with_capacity(content.len()),
            ..Default::default()
        };

        let mut cursor = 0;
        for reference in &references {
            outcome.content.push_str(&content[cursor..reference.start]);
            match self.resolve(reference)? {
                Resolution::Rewritten(shortcode) => {
                    outcome.content.push_str(&shortcode.to_string());
                    outcome.rewritten += 1;
                }
                Resolution::Unresolved { src } => {
                    outcome.content.push_str(&reference.tag);
                    outcome.unresolved.push(src);
                }
            }
            cursor = reference.end();
        }
        outcome.content.push_str(&content[cursor..]);

        Ok(outcome)
    }

    /// Resolve one tag against the asset registry
    pub fn resolve(&self, reference: &ImageReference) -> Result<Resolution, MigrationError> {
        let Some(src) = reference.src() else {
            warn!("Image tag without a quoted src: {}", reference.tag);
            return Ok(Resolution::Unresolved {
                src: reference.tag.clone(),
            });
        };

        let filename = filename_of(src);
        let found = if filename.is_empty() {
            // An empty fragment is a substring of every filename; never look it up
            None
        } else {
            self.assets.find_by_filename(filename)?
        };

        let Some(found) = found else {
            warn!(target: REPORT_TARGET, "Link with no file found:{}", src);
            return Ok(Resolution::Unresolved {
                src: src.to_string(),
            });
        };

        if found.is_ambiguous() {
            warn!(
                "{} assets match '{}', using ID {} ({})",
                found.candidates, filename, found.asset.id, found.asset.filename
            );
        }

        let new_src = hashed_src(src, found.asset.hash_prefix(HASH_PREFIX_LEN));
        debug!("{} -> {}", src, new_src);

        Ok(Resolution::Rewritten(ImageShortcode {
            src: new_src,
            attributes: reference.attributes(),
            id: found.asset.id,
        }))
    }
}
